use serde::{Deserialize, Serialize};

use crate::angle_distribution::AngleDistribution;
use crate::energy_distribution::EnergyDistribution;

/// A single reaction channel of a nuclide, identified by its MT number.
///
/// The cross-section array is threshold-aligned: `cross_section[j]`
/// corresponds to the owning nuclide's grid point `threshold_idx + j`.
/// The signed `multiplicity` carries both the secondary yield (magnitude)
/// and the reference frame of the secondary distributions (negative means
/// center-of-mass).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    /// ENDF/MT reaction identifier.
    pub mt: i32,
    /// Q-value in MeV.
    #[serde(default)]
    pub q_value: f64,
    /// Index into the owning nuclide's grid where this channel opens.
    pub threshold_idx: usize,
    /// Cross section in barns, aligned to the nuclide grid at
    /// `threshold_idx`.
    pub cross_section: Vec<f64>,
    /// Signed secondary-neutron yield; sign < 0 marks center-of-mass
    /// distributions.
    pub multiplicity: i32,
    /// Angular distribution; `None` falls back to isotropic.
    #[serde(default)]
    pub angle: Option<AngleDistribution>,
    /// Secondary-energy distribution, absent for channels with no
    /// transportable secondary.
    #[serde(default)]
    pub energy: Option<EnergyDistribution>,
}

impl Reaction {
    /// True when the secondary distributions are given in the
    /// center-of-mass frame.
    #[inline]
    pub fn in_cm_frame(&self) -> bool {
        self.multiplicity < 0
    }

    /// Secondary-neutron yield per reaction.
    #[inline]
    pub fn secondary_yield(&self) -> f64 {
        self.multiplicity.unsigned_abs() as f64
    }

    /// Cross section at the nuclide-grid point `grid_index` with
    /// interpolation fraction `f`, zero below threshold.
    pub fn cross_section_at(&self, grid_index: usize, f: f64) -> f64 {
        if grid_index < self.threshold_idx || self.cross_section.is_empty() {
            return 0.0;
        }
        let j = grid_index - self.threshold_idx;
        if j + 1 < self.cross_section.len() {
            (1.0 - f) * self.cross_section[j] + f * self.cross_section[j + 1]
        } else {
            self.cross_section[self.cross_section.len() - 1]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold_reaction() -> Reaction {
        Reaction {
            mt: 16,
            q_value: -10.0,
            threshold_idx: 2,
            cross_section: vec![0.0, 1.0, 2.0],
            multiplicity: 2,
            angle: None,
            energy: None,
        }
    }

    #[test]
    fn test_cross_section_below_threshold() {
        let r = threshold_reaction();
        assert_eq!(r.cross_section_at(0, 0.5), 0.0);
        assert_eq!(r.cross_section_at(1, 0.5), 0.0);
    }

    #[test]
    fn test_cross_section_interpolates() {
        let r = threshold_reaction();
        assert_eq!(r.cross_section_at(2, 0.0), 0.0);
        assert_eq!(r.cross_section_at(2, 0.5), 0.5);
        assert_eq!(r.cross_section_at(3, 0.25), 1.25);
    }

    #[test]
    fn test_cross_section_clamps_past_end() {
        let r = threshold_reaction();
        assert_eq!(r.cross_section_at(4, 0.9), 2.0);
        assert_eq!(r.cross_section_at(40, 0.0), 2.0);
    }

    #[test]
    fn test_frame_and_yield() {
        let mut r = threshold_reaction();
        assert!(!r.in_cm_frame());
        assert_eq!(r.secondary_yield(), 2.0);
        r.multiplicity = -1;
        assert!(r.in_cm_frame());
        assert_eq!(r.secondary_yield(), 1.0);
    }
}
