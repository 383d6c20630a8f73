// Single-process generation driver.
//
// Histories are trivially parallel: each worker owns its particle, random
// stream, scratch caches, and bank slice, and the only cross-worker object
// is the next-generation fission source, merged here at the generation
// boundary. Worker count does not change results because every history
// has its own random substream and banks are merged in worker order.

use rayon::prelude::*;

use crate::bank::FissionBank;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::grid::NuclearData;
use crate::settings::Settings;
use crate::source::IndependentSource;
use crate::tally::CollisionTally;
use crate::transport::Worker;

/// A transportable problem: data, configuration, and the starting source.
#[derive(Debug, Clone)]
pub struct Model {
    pub data: NuclearData,
    pub settings: Settings,
    pub source: IndependentSource,
}

/// Running k-effective estimate over completed generations. The transport
/// core reads only the current mean; the driver updates it between
/// generations.
#[derive(Debug, Clone, Default)]
pub struct Keff {
    estimates: Vec<f64>,
}

impl Keff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one generation's estimate.
    pub fn update(&mut self, estimate: f64) {
        self.estimates.push(estimate);
    }

    /// Current mean; 1.0 before any generation has completed.
    pub fn mean(&self) -> f64 {
        if self.estimates.is_empty() {
            return 1.0;
        }
        self.estimates.iter().sum::<f64>() / self.estimates.len() as f64
    }

    /// Standard error of the mean over completed generations.
    pub fn std_error(&self) -> f64 {
        let n = self.estimates.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .estimates
            .iter()
            .map(|k| (k - mean) * (k - mean))
            .sum::<f64>()
            / (n - 1) as f64;
        (var / n as f64).sqrt()
    }

    pub fn n_generations(&self) -> usize {
        self.estimates.len()
    }
}

/// Outcome of one generation of histories.
#[derive(Debug)]
pub struct GenerationResult {
    /// Merged next-generation fission source.
    pub bank: FissionBank,
    /// Fission-source estimate of k-effective: the parent generation's k
    /// times banked sites per started history (site production is
    /// normalized by the parent k).
    pub keff_estimate: f64,
    /// Merged collision tally (live counters only).
    pub tally: CollisionTally,
}

impl Model {
    /// Run one generation of `settings.particles` histories from the
    /// independent source under the given k-effective estimate.
    pub fn run_generation<G: Geometry + Sync>(
        &self,
        geometry: &G,
        keff: f64,
    ) -> Result<GenerationResult> {
        let n = self.settings.particles;
        let n_workers = rayon::current_num_threads().max(1);
        let chunk = n.div_ceil(n_workers);

        let outputs: Result<Vec<(FissionBank, CollisionTally)>> = (0..n_workers)
            .into_par_iter()
            .map(|w| {
                let mut worker = Worker::new(&self.data, &self.settings, keff);
                let mut tally = CollisionTally::new();
                let lo = w * chunk;
                let hi = ((w + 1) * chunk).min(n);
                for id in lo..hi {
                    worker.begin_history(id as u64);
                    let mut p = self.source.sample(id as u64, &mut worker.rng);
                    worker.transport(&mut p, geometry, &mut tally)?;
                }
                Ok((worker.bank, tally))
            })
            .collect();

        let mut bank = FissionBank::for_generation(n);
        let mut tally = CollisionTally::new();
        for (mut worker_bank, worker_tally) in outputs? {
            bank.merge(&mut worker_bank);
            tally.absorb(&worker_tally);
        }
        let keff_estimate = keff * bank.len() as f64 / n as f64;
        Ok(GenerationResult {
            bank,
            keff_estimate,
            tally,
        })
    }

    /// Run a generation seeded from banked fission sites instead of the
    /// independent source, consuming up to `settings.particles` sites.
    pub fn run_generation_from_sites<G: Geometry + Sync>(
        &self,
        geometry: &G,
        sites: &[crate::bank::FissionSite],
        keff: f64,
    ) -> Result<GenerationResult> {
        if sites.is_empty() {
            return Ok(GenerationResult {
                bank: FissionBank::for_generation(self.settings.particles),
                keff_estimate: 0.0,
                tally: CollisionTally::new(),
            });
        }
        let n = sites.len().min(self.settings.particles);
        let n_workers = rayon::current_num_threads().max(1);
        let chunk = n.div_ceil(n_workers);

        let outputs: Result<Vec<(FissionBank, CollisionTally)>> = (0..n_workers)
            .into_par_iter()
            .map(|w| {
                let mut worker = Worker::new(&self.data, &self.settings, keff);
                let mut tally = CollisionTally::new();
                let lo = w * chunk;
                let hi = ((w + 1) * chunk).min(n);
                for id in lo..hi {
                    let site = &sites[id % sites.len()];
                    worker.begin_history(id as u64);
                    let mut p =
                        crate::particle::Particle::new(site.position, site.direction, site.energy);
                    p.id = id as u64;
                    worker.transport(&mut p, geometry, &mut tally)?;
                }
                Ok((worker.bank, tally))
            })
            .collect();

        let mut bank = FissionBank::for_generation(self.settings.particles);
        let mut tally = CollisionTally::new();
        for (mut worker_bank, worker_tally) in outputs? {
            bank.merge(&mut worker_bank);
            tally.absorb(&worker_tally);
        }
        let keff_estimate = keff * bank.len() as f64 / n as f64;
        Ok(GenerationResult {
            bank,
            keff_estimate,
            tally,
        })
    }
}
