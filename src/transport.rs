// Per-particle transport loop.
//
// A `Worker` owns everything one thread of histories mutates: the random
// stream, the cross-section scratch, and a local fission bank. Nuclear
// data and settings are borrowed immutably, so workers share nothing and
// the hot path takes no locks.

use crate::bank::FissionBank;
use crate::error::{Result, TransportError};
use crate::fast_rng::FastRng;
use crate::geometry::Geometry;
use crate::grid::NuclearData;
use crate::particle::Particle;
use crate::settings::Settings;
use crate::tally::Tally;
use crate::xs::{calculate_xs, MacroXs, MicroXs};

/// Mutable per-worker context threaded through transport.
pub struct Worker<'a> {
    pub data: &'a NuclearData,
    pub settings: &'a Settings,
    /// Current k-effective estimate, updated by the driver between
    /// generations; read-only during transport.
    pub keff: f64,
    pub rng: FastRng,
    /// Scratch microscopic cross sections, indexed by nuclide arena index.
    pub micro_xs: Vec<MicroXs>,
    /// Macroscopic cross sections of the current material.
    pub macro_xs: MacroXs,
    /// Worker-local fission bank; merged by the driver at generation
    /// boundaries.
    pub bank: FissionBank,
}

impl<'a> Worker<'a> {
    pub fn new(data: &'a NuclearData, settings: &'a Settings, keff: f64) -> Self {
        Self {
            data,
            settings,
            keff,
            rng: FastRng::new(settings.seed),
            micro_xs: vec![MicroXs::default(); data.n_nuclides()],
            macro_xs: MacroXs::default(),
            bank: FissionBank::for_generation(settings.particles),
        }
    }

    /// Position the random stream at the substream of history `id`.
    pub fn begin_history(&mut self, id: u64) {
        self.rng = FastRng::for_history(self.settings.seed, id);
    }

    /// Refresh the cross-section caches for the particle's current
    /// material and energy.
    pub fn calculate_xs(&mut self, p: &mut Particle) -> Result<()> {
        calculate_xs(p, self.data, &mut self.micro_xs, &mut self.macro_xs)
    }

    /// Run one history to completion: locate, look up cross sections,
    /// sample the collision distance, and move to whichever of collision
    /// and boundary comes first.
    pub fn transport(
        &mut self,
        p: &mut Particle,
        geometry: &dyn Geometry,
        tally: &mut dyn Tally,
    ) -> Result<()> {
        if p.cell.is_none() {
            if !geometry.find_cell(p) {
                return Err(TransportError::ParticleLost {
                    id: p.id,
                    x: p.position[0],
                    y: p.position[1],
                    z: p.position[2],
                });
            }
            p.cell_born = p.cell;
        }

        while p.alive {
            self.calculate_xs(p)?;

            let boundary = geometry.distance_to_boundary(p);
            let d_collision = if self.macro_xs.total > 0.0 {
                -self.rng.random().ln() / self.macro_xs.total
            } else {
                f64::INFINITY
            };
            let distance = d_collision.min(boundary.distance);

            if !distance.is_finite() {
                // Streaming in void with no boundary ahead: the history
                // cannot terminate
                log::warn!(
                    "particle {} streaming to infinity at ({:.3e}, {:.3e}, {:.3e}); killed",
                    p.id,
                    p.position[0],
                    p.position[1],
                    p.position[2]
                );
                p.alive = false;
                break;
            }

            p.move_by(distance);

            if d_collision > boundary.distance {
                let last_cell = p.cell.take();
                p.surface = boundary.surface;
                if boundary.in_lattice {
                    geometry.cross_lattice(p);
                } else {
                    geometry.cross_surface(p, last_cell);
                }
                if p.alive && p.cell.is_none() {
                    if !geometry.find_cell(p) {
                        return Err(TransportError::ParticleLost {
                            id: p.id,
                            x: p.position[0],
                            y: p.position[1],
                            z: p.position[2],
                        });
                    }
                }
            } else {
                self.collision(p, tally)?;
            }
        }
        Ok(())
    }
}
