// Source sampling for fixed-source runs and the first generation of a
// criticality run.

use rand::Rng;

use crate::particle::Particle;

/// Angular distribution of source emissions.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceAngle {
    Isotropic,
    Monodirectional([f64; 3]),
}

/// Monoenergetic point source.
#[derive(Debug, Clone)]
pub struct IndependentSource {
    pub position: [f64; 3],
    pub angle: SourceAngle,
    /// Emission energy in MeV.
    pub energy: f64,
}

impl IndependentSource {
    /// Sample a new history with the given id.
    pub fn sample<R: Rng + ?Sized>(&self, id: u64, rng: &mut R) -> Particle {
        let direction = match &self.angle {
            SourceAngle::Isotropic => {
                let mu = 2.0 * rng.gen::<f64>() - 1.0;
                let phi = 2.0 * std::f64::consts::PI * rng.gen::<f64>();
                let sin_theta = (1.0 - mu * mu).sqrt();
                [sin_theta * phi.cos(), sin_theta * phi.sin(), mu]
            }
            SourceAngle::Monodirectional(uvw) => {
                let mag = (uvw[0] * uvw[0] + uvw[1] * uvw[1] + uvw[2] * uvw[2]).sqrt();
                [uvw[0] / mag, uvw[1] / mag, uvw[2] / mag]
            }
        };
        let mut p = Particle::new(self.position, direction, self.energy);
        p.id = id;
        p
    }
}
