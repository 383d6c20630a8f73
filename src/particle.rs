use crate::data::ENERGY_FLOOR;

/// Transient state of a single neutron history.
///
/// Created by source sampling or fission banking; destroyed by absorption,
/// leakage, weight-cutoff kill, or the energy floor. Direction cosines
/// satisfy u^2 + v^2 + w^2 = 1; energy is in MeV and strictly positive
/// while the particle is alive.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: [f64; 3],
    pub direction: [f64; 3],
    /// Energy in MeV.
    pub energy: f64,
    /// Statistical weight.
    pub weight: f64,
    pub alive: bool,
    /// Unique history id.
    pub id: u64,
    /// Current cell index, if located.
    pub cell: Option<usize>,
    /// Cell the history started in.
    pub cell_born: Option<usize>,
    /// Current material index; `None` in void.
    pub material: Option<usize>,
    /// Material at the last cross-section evaluation.
    pub last_material: Option<usize>,
    /// Energy at the last cross-section evaluation; together with
    /// `last_material` this gates the lookup short-circuit.
    pub last_energy_xs: f64,
    /// Most recently crossed surface.
    pub surface: Option<usize>,
    pub n_collisions: u32,
    /// Cached unionized-grid index for the current energy.
    pub grid_index: usize,
    /// Interpolation fraction on the unionized grid; outside [0, 1) when
    /// the energy is off-grid.
    pub interp: f64,
    /// Weight entering the most recent collision.
    pub last_weight: f64,
    /// Energy entering the most recent collision.
    pub last_energy: f64,
    /// Most recently sampled scattering cosine.
    pub mu: f64,
}

impl Particle {
    pub fn new(position: [f64; 3], direction: [f64; 3], energy: f64) -> Self {
        Self {
            position,
            direction,
            energy,
            weight: 1.0,
            alive: true,
            id: 0,
            cell: None,
            cell_born: None,
            material: None,
            last_material: None,
            last_energy_xs: 0.0,
            surface: None,
            n_collisions: 0,
            grid_index: 0,
            interp: 0.0,
            last_weight: 1.0,
            last_energy: energy,
            mu: 0.0,
        }
    }

    /// Advance the particle along its direction by `distance`.
    pub fn move_by(&mut self, distance: f64) {
        for i in 0..3 {
            self.position[i] += self.direction[i] * distance;
        }
    }

    /// True when the energy has underflowed below the transportable floor.
    pub fn below_energy_floor(&self) -> bool {
        self.energy < ENERGY_FLOOR
    }
}
