//! Property-based tests for the scattering kinematics: direction rotation
//! and the elastic center-of-mass transform must preserve the unit-vector
//! and positive-energy invariants for any inputs.

use neutron_mc::{elastic_scatter, rotate_angle, FastRng, Nuclide, Particle, Reaction};
use proptest::prelude::*;

fn unit_direction(theta: f64, phi: f64) -> [f64; 3] {
    [
        theta.sin() * phi.cos(),
        theta.sin() * phi.sin(),
        theta.cos(),
    ]
}

fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn elastic_nuclide(awr: f64) -> (Nuclide, Reaction) {
    let nuc = Nuclide::new(
        "T",
        awr,
        vec![1e-5, 20.0],
        vec![1.0, 1.0],
        vec![1.0, 1.0],
        vec![0.0, 0.0],
    );
    let rxn = Reaction {
        mt: 2,
        q_value: 0.0,
        threshold_idx: 0,
        cross_section: vec![1.0, 1.0],
        multiplicity: -1,
        angle: None,
        energy: None,
    };
    (nuc, rxn)
}

proptest! {
    /// Rotation by any cosine about any starting direction yields a unit
    /// vector whose dot product with the original equals the cosine.
    #[test]
    fn rotate_angle_preserves_unit_norm(
        theta in 0.0..std::f64::consts::PI,
        phi in 0.0..(2.0 * std::f64::consts::PI),
        mu in -1.0f64..=1.0,
        seed in 0u64..u64::MAX,
    ) {
        let d = unit_direction(theta, phi);
        let mut rng = FastRng::new(seed);
        let out = rotate_angle(d, mu, &mut rng);
        prop_assert!((norm(out) - 1.0).abs() < 1e-10,
            "norm {} after rotation", norm(out));
        let dot = d[0] * out[0] + d[1] * out[1] + d[2] * out[2];
        prop_assert!((dot - mu).abs() < 1e-8,
            "polar cosine {} sampled as {}", mu, dot);
    }

    /// Directions arbitrarily close to the poles take the pivot branch and
    /// still come out unit length.
    #[test]
    fn rotate_angle_near_pole(
        eps in 0.0f64..1e-10,
        mu in -1.0f64..=1.0,
        seed in 0u64..u64::MAX,
    ) {
        let d = [eps, 0.0, (1.0 - eps * eps).sqrt()];
        let mut rng = FastRng::new(seed);
        let out = rotate_angle(d, mu, &mut rng);
        prop_assert!((norm(out) - 1.0).abs() < 1e-10);
    }

    /// Elastic scattering keeps the direction unit length, the energy
    /// positive, and never gains energy off a stationary target.
    #[test]
    fn elastic_scatter_invariants(
        awr in 0.99f64..250.0,
        e_in in 1e-6f64..19.0,
        theta in 0.0..std::f64::consts::PI,
        phi in 0.0..(2.0 * std::f64::consts::PI),
        seed in 0u64..u64::MAX,
    ) {
        let (nuc, rxn) = elastic_nuclide(awr);
        let mut rng = FastRng::new(seed);
        let mut p = Particle::new([0.0; 3], unit_direction(theta, phi), e_in);
        elastic_scatter(&mut p, &nuc, &rxn, &mut rng);
        prop_assert!((norm(p.direction) - 1.0).abs() < 1e-10,
            "direction norm {}", norm(p.direction));
        prop_assert!(p.energy > 0.0, "energy {} must stay positive", p.energy);
        prop_assert!(p.energy <= e_in * (1.0 + 1e-12),
            "energy gained: {} -> {}", e_in, p.energy);
        // Two-body bound: E_out >= alpha E_in with alpha = ((A-1)/(A+1))^2
        let alpha = ((awr - 1.0) / (awr + 1.0)).powi(2);
        prop_assert!(p.energy >= alpha * e_in * (1.0 - 1e-12),
            "energy {} below the backscatter bound {}", p.energy, alpha * e_in);
    }
}
