// Static reaction-classification tables and physical constants.
//
// MT numbers follow the evaluated nuclear-data standard: 2 is elastic,
// 18-21/38 the fission family, 102-117 neutron disappearance, and 200+
// lumped gas-production channels that carry no transportable secondary.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Elastic scattering.
pub const MT_ELASTIC: i32 = 2;
/// Synthetic total-inelastic channel; never sampled directly, its
/// constituents (MT 50-91) are.
pub const MT_N_LEVEL: i32 = 4;
/// Total fission.
pub const MT_FISSION: i32 = 18;
/// First lumped gas-production MT; these and everything above are skipped
/// during reaction sampling.
pub const MT_GAS_PRODUCTION: i32 = 200;

/// Fission family: total fission plus the partial channels (n,f), (n,nf),
/// (n,2nf), (n,3nf).
pub const FISSION_MTS: [i32; 5] = [18, 19, 20, 21, 38];

/// Neutron-producing scattering MTs outside the discrete-level inelastic
/// range, e.g. (n,2n), (n,3n), (n,n'alpha).
const SCATTERING_MTS: [i32; 21] = [
    5, 11, 16, 17, 22, 23, 24, 25, 28, 29, 30, 32, 33, 34, 35, 36, 37, 41, 42, 44, 45,
];

/// Particle energies below this floor (MeV) are treated as numerical
/// underflow and the particle is killed.
pub const ENERGY_FLOOR: f64 = 1e-100;

/// Upper bound (MeV) on sampled fission-daughter energies; spectra are
/// resampled above it.
pub const MAX_DAUGHTER_ENERGY: f64 = 20.0;

#[inline]
pub fn is_fission(mt: i32) -> bool {
    FISSION_MTS.contains(&mt)
}

/// Neutron disappearance: (n,gamma) through (n,t2alpha). The neutron is
/// absorbed and no secondary neutron is emitted.
#[inline]
pub fn is_disappearance(mt: i32) -> bool {
    (102..=117).contains(&mt)
}

/// Scattering channels with secondary-neutron emission other than elastic:
/// the discrete-level and continuum inelastic range (MT 50-91) plus the
/// multi-neutron and charged-particle-accompanied channels.
#[inline]
pub fn is_inelastic_scatter(mt: i32) -> bool {
    (50..92).contains(&mt) || SCATTERING_MTS.contains(&mt)
}

/// Human-readable names for the MT numbers the core dispatches on, used in
/// diagnostics.
pub static REACTION_NAMES: Lazy<HashMap<i32, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(1, "(n,total)");
    m.insert(2, "(n,elastic)");
    m.insert(4, "(n,level)");
    m.insert(5, "(n,anything)");
    m.insert(11, "(n,2nd)");
    m.insert(16, "(n,2n)");
    m.insert(17, "(n,3n)");
    m.insert(18, "(n,fission)");
    m.insert(19, "(n,f)");
    m.insert(20, "(n,nf)");
    m.insert(21, "(n,2nf)");
    m.insert(22, "(n,n'alpha)");
    m.insert(28, "(n,n'p)");
    m.insert(32, "(n,n'd)");
    m.insert(33, "(n,n't)");
    m.insert(37, "(n,4n)");
    m.insert(38, "(n,3nf)");
    m.insert(51, "(n,n'1)");
    m.insert(91, "(n,n'c)");
    m.insert(102, "(n,gamma)");
    m.insert(103, "(n,p)");
    m.insert(104, "(n,d)");
    m.insert(105, "(n,t)");
    m.insert(106, "(n,He-3)");
    m.insert(107, "(n,alpha)");
    m
});

/// Name for an MT number, falling back to the bare number.
pub fn reaction_name(mt: i32) -> String {
    match REACTION_NAMES.get(&mt) {
        Some(name) => (*name).to_string(),
        None if (50..92).contains(&mt) => format!("(n,n'{})", mt - 50),
        None => format!("MT={}", mt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fission_family() {
        for mt in [18, 19, 20, 21, 38] {
            assert!(is_fission(mt));
        }
        assert!(!is_fission(2));
        assert!(!is_fission(102));
    }

    #[test]
    fn test_disappearance_range() {
        assert!(is_disappearance(102));
        assert!(is_disappearance(117));
        assert!(!is_disappearance(101));
        assert!(!is_disappearance(118));
    }

    #[test]
    fn test_inelastic_family_excludes_synthetic() {
        assert!(is_inelastic_scatter(51));
        assert!(is_inelastic_scatter(91));
        assert!(is_inelastic_scatter(16));
        assert!(!is_inelastic_scatter(MT_N_LEVEL));
        assert!(!is_inelastic_scatter(MT_ELASTIC));
        assert!(!is_inelastic_scatter(18));
    }

    #[test]
    fn test_reaction_names() {
        assert_eq!(reaction_name(2), "(n,elastic)");
        assert_eq!(reaction_name(53), "(n,n'3)");
        assert_eq!(reaction_name(999), "MT=999");
    }
}
