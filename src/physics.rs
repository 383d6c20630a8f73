// Scattering kinematics.
//
// Elastic scattering boosts into the center-of-mass frame, samples the
// scattering cosine there, and boosts back; the target is taken at rest
// (free-gas thermal motion is a known limitation). Inelastic channels
// sample the outgoing energy from the reaction's evaluated law and convert
// CM results to the laboratory frame when the distribution frame demands
// it.

use nalgebra::Vector3;
use rand::Rng;

use crate::angle_distribution::{clamp_mu, sample_reaction_mu};
use crate::error::Result;
use crate::nuclide::Nuclide;
use crate::particle::Particle;
use crate::reaction::Reaction;

/// Rotate direction cosines by polar cosine `mu` about a uniformly random
/// azimuth. Unit norm is preserved analytically; near the z-axis
/// (1 - w^2 below 1e-20) the formula pivots on v to keep the denominator
/// away from zero.
pub fn rotate_angle<R: Rng + ?Sized>(direction: [f64; 3], mu: f64, rng: &mut R) -> [f64; 3] {
    let [u, v, w] = direction;
    let phi = 2.0 * std::f64::consts::PI * rng.gen::<f64>();
    let a = (1.0 - mu * mu).max(0.0).sqrt();
    let cos_phi = phi.cos();
    let sin_phi = phi.sin();

    let b = (1.0 - w * w).max(0.0).sqrt();
    if b > 1e-10 {
        [
            mu * u + a * (u * w * cos_phi - v * sin_phi) / b,
            mu * v + a * (v * w * cos_phi + u * sin_phi) / b,
            mu * w - a * b * cos_phi,
        ]
    } else {
        let b = (1.0 - v * v).max(0.0).sqrt();
        [
            mu * u + a * (u * v * cos_phi + w * sin_phi) / b,
            mu * v - a * b * cos_phi,
            mu * w + a * (v * w * cos_phi - u * sin_phi) / b,
        ]
    }
}

/// Elastic scattering off a stationary target of weight ratio `awr`.
///
/// The neutron velocity is split into the center-of-mass velocity and the
/// relative part; the relative part is rotated by the sampled CM cosine
/// and the boost is undone. Updates energy, direction, and the particle's
/// last sampled cosine.
pub fn elastic_scatter<R: Rng + ?Sized>(
    p: &mut Particle,
    nuclide: &Nuclide,
    reaction: &Reaction,
    rng: &mut R,
) {
    let awr = nuclide.awr;
    let vel = p.energy.sqrt();
    let v_n = vel * Vector3::from_row_slice(&p.direction);

    // Center-of-mass velocity for a target at rest
    let v_cm = v_n / (awr + 1.0);

    // Neutron velocity in the CM frame
    let mut v_rel = v_n - v_cm;
    let speed_cm = v_rel.norm();

    let mu_cm = sample_reaction_mu(reaction.angle.as_ref(), p.energy, rng);
    let dir_cm = [
        v_rel.x / speed_cm,
        v_rel.y / speed_cm,
        v_rel.z / speed_cm,
    ];
    let rotated = rotate_angle(dir_cm, mu_cm, rng);
    v_rel = speed_cm * Vector3::from_row_slice(&rotated);

    // Back to the laboratory frame
    let v_out = v_rel + v_cm;
    let speed = v_out.norm();

    p.energy = speed * speed;
    p.direction = [v_out.x / speed, v_out.y / speed, v_out.z / speed];
    p.mu = mu_cm;
}

/// Convert a CM outgoing energy and cosine to the laboratory frame for a
/// two-body channel with target weight ratio `awr`.
pub fn cm_to_lab(e_in: f64, e_cm: f64, mu_cm: f64, awr: f64) -> (f64, f64) {
    let a1 = awr + 1.0;
    let e_lab = e_cm + (e_in + 2.0 * mu_cm * a1 * (e_in * e_cm).sqrt()) / (a1 * a1);
    let mu_lab = mu_cm * (e_cm / e_lab).sqrt() + (e_in / e_lab).sqrt() / a1;
    (e_lab, clamp_mu(mu_lab))
}

/// Inelastic-family scattering: sample the outgoing energy (and, for
/// correlated laws, the cosine) from the reaction's distributions, convert
/// to the laboratory frame when the data is CM, rotate the direction, and
/// apply the secondary-neutron yield to the weight.
pub fn inelastic_scatter<R: Rng + ?Sized>(
    p: &mut Particle,
    nuclide: &Nuclide,
    reaction: &Reaction,
    rng: &mut R,
) -> Result<()> {
    let e_in = p.energy;
    let mut mu = f64::NAN;

    let e_out = match &reaction.energy {
        Some(dist) if dist.is_correlated() => dist.sample(e_in, rng, Some(&mut mu))?,
        Some(dist) => {
            mu = sample_reaction_mu(reaction.angle.as_ref(), e_in, rng);
            dist.sample(e_in, rng, None)?
        }
        // No energy data: the channel degrades to a pure direction change
        None => {
            mu = sample_reaction_mu(reaction.angle.as_ref(), e_in, rng);
            e_in
        }
    };

    let (e_lab, mu_lab) = if reaction.in_cm_frame() {
        cm_to_lab(e_in, e_out, mu, nuclide.awr)
    } else {
        (e_out, mu)
    };

    p.energy = e_lab;
    p.mu = mu_lab;
    p.direction = rotate_angle(p.direction, mu_lab, rng);
    p.weight *= reaction.secondary_yield();
    Ok(())
}
