// Fission-site banking for the next-generation source.
//
// The bank is a bounded, append-only buffer. Saturation is silent by
// design: generation-size stability is a correctness property of the outer
// power iteration, so the buffer never grows past its capacity and excess
// daughters are discarded.

use serde::{Deserialize, Serialize};

/// A banked next-generation source site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FissionSite {
    /// Id of the parent history that produced the site.
    pub uid: u64,
    pub position: [f64; 3],
    pub direction: [f64; 3],
    /// Energy in MeV.
    pub energy: f64,
}

/// Bounded buffer of fission sites with saturating writes.
#[derive(Debug, Clone)]
pub struct FissionBank {
    sites: Vec<FissionSite>,
    capacity: usize,
}

impl FissionBank {
    pub fn new(capacity: usize) -> Self {
        Self {
            sites: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Bank sized for a generation of `n_particles` histories. The 3x
    /// headroom absorbs super-critical fluctuations within a generation.
    pub fn for_generation(n_particles: usize) -> Self {
        Self::new(3 * n_particles)
    }

    /// Append a site. Returns `false` (and drops the site) once the bank
    /// is at capacity.
    pub fn push(&mut self, site: FissionSite) -> bool {
        if self.sites.len() >= self.capacity {
            return false;
        }
        self.sites.push(site);
        true
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.sites.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.sites.clear();
    }

    pub fn sites(&self) -> &[FissionSite] {
        &self.sites
    }

    /// Move all sites out of `other` into this bank, saturating at
    /// capacity. Used by the driver when merging worker banks at a
    /// generation boundary.
    pub fn merge(&mut self, other: &mut FissionBank) {
        for site in other.sites.drain(..) {
            if self.sites.len() >= self.capacity {
                break;
            }
            self.sites.push(site);
        }
    }
}
