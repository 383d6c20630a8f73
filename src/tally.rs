// Tally interface consumed by the collision engine, plus a simple
// collision counter with batch statistics.

use crate::particle::Particle;

/// Observer notified once per collision, after the physics has been
/// applied. `scattered` distinguishes scattering events from absorptions
/// and fissions.
pub trait Tally {
    fn score_collision(&mut self, p: &Particle, scattered: bool);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTally;

impl Tally for NoTally {
    fn score_collision(&mut self, _p: &Particle, _scattered: bool) {}
}

/// Collision counter with per-batch mean and standard deviation.
#[derive(Debug, Clone, Default)]
pub struct CollisionTally {
    pub collisions: u64,
    pub scatters: u64,
    /// Pre-collision weight summed over events.
    pub weight_scored: f64,
    batch_means: Vec<f64>,
}

impl CollisionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the counts accumulated since the previous batch boundary into
    /// the batch series, normalized per source particle.
    pub fn end_batch(&mut self, n_particles: usize) {
        self.batch_means
            .push(self.collisions as f64 / n_particles as f64);
        self.collisions = 0;
        self.scatters = 0;
        self.weight_scored = 0.0;
    }

    pub fn n_batches(&self) -> usize {
        self.batch_means.len()
    }

    /// Mean collisions per source particle over completed batches.
    pub fn mean(&self) -> f64 {
        if self.batch_means.is_empty() {
            return 0.0;
        }
        self.batch_means.iter().sum::<f64>() / self.batch_means.len() as f64
    }

    /// Standard deviation of the batch means.
    pub fn std_dev(&self) -> f64 {
        let n = self.batch_means.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .batch_means
            .iter()
            .map(|m| (m - mean) * (m - mean))
            .sum::<f64>()
            / (n - 1) as f64;
        (var / n as f64).sqrt()
    }

    /// Merge the live counters of another tally (used when reducing
    /// worker-local tallies).
    pub fn absorb(&mut self, other: &CollisionTally) {
        self.collisions += other.collisions;
        self.scatters += other.scatters;
        self.weight_scored += other.weight_scored;
    }
}

impl Tally for CollisionTally {
    fn score_collision(&mut self, p: &Particle, scattered: bool) {
        self.collisions += 1;
        if scattered {
            self.scatters += 1;
        }
        self.weight_scored += p.last_weight;
    }
}
