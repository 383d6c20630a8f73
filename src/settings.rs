use serde::{Deserialize, Serialize};

/// Run configuration read by the transport core.
///
/// `weight_cutoff` and `weight_survive` drive the Russian-roulette game
/// under survival biasing; histories are reproducible for a fixed `seed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Histories per generation; also sizes the fission bank (3x).
    pub particles: usize,
    /// Master seed for the per-history random-number substreams.
    pub seed: u64,
    /// Replace analog capture with weight attenuation plus roulette.
    pub survival_biasing: bool,
    /// Weight below which Russian roulette is played.
    pub weight_cutoff: f64,
    /// Weight assigned to roulette survivors.
    pub weight_survive: f64,
    /// Particles below this energy (MeV) are killed; the 1e-100 underflow
    /// floor applies regardless.
    pub energy_cutoff: f64,
    /// Forward collision events to the tally observer.
    pub tallies_on: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: 1000,
            seed: 1,
            survival_biasing: false,
            weight_cutoff: 0.25,
            weight_survive: 1.0,
            energy_cutoff: 0.0,
            tallies_on: false,
        }
    }
}
