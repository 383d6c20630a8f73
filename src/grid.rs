// Unionized energy grid and the shared nuclear-data arena.
//
// Every nuclide's grid is merged into one strictly increasing grid so the
// transport loop does a single binary search per energy lookup; per-nuclide
// index maps translate unionized indices back to each nuclide's own grid.

use serde::{Deserialize, Serialize};

use crate::material::Material;
use crate::nuclide::Nuclide;

/// Shared read-only tables for a run: nuclides, materials, and the
/// unionized grid. Built once by the data-loading layer, borrowed
/// immutably by every worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NuclearData {
    pub nuclides: Vec<Nuclide>,
    pub materials: Vec<Material>,
    /// Unionized energy grid in MeV, strictly increasing, covering every
    /// nuclide's range.
    pub e_grid: Vec<f64>,
}

impl NuclearData {
    /// Assemble the arena: validate each nuclide, build the unionized
    /// grid, and fill in every nuclide's `grid_index` map.
    pub fn new(
        mut nuclides: Vec<Nuclide>,
        materials: Vec<Material>,
    ) -> std::result::Result<Self, String> {
        for nuc in &nuclides {
            nuc.validate()?;
        }
        for mat in &materials {
            for mn in &mat.nuclides {
                if mn.nuclide >= nuclides.len() {
                    return Err(format!(
                        "material {:?} references nuclide index {} out of {}",
                        mat.name,
                        mn.nuclide,
                        nuclides.len()
                    ));
                }
            }
        }
        let e_grid = unionized_grid(&nuclides);
        for nuc in &mut nuclides {
            nuc.grid_index = grid_index_map(&nuc.energy, &e_grid);
        }
        Ok(Self {
            nuclides,
            materials,
            e_grid,
        })
    }

    pub fn n_grid(&self) -> usize {
        self.e_grid.len()
    }

    pub fn n_nuclides(&self) -> usize {
        self.nuclides.len()
    }
}

/// Merge all nuclide grids into one sorted, deduplicated grid.
fn unionized_grid(nuclides: &[Nuclide]) -> Vec<f64> {
    let mut grid: Vec<f64> = nuclides
        .iter()
        .flat_map(|n| n.energy.iter().copied())
        .collect();
    grid.sort_by(f64::total_cmp);
    grid.dedup();
    grid
}

/// For each unionized point e_grid[k], the nuclide-grid index i with
/// energy[i] <= e_grid[k] < energy[i+1], clamped to [0, n-2] at the ends.
/// The result is monotone non-decreasing.
fn grid_index_map(energy: &[f64], e_grid: &[f64]) -> Vec<usize> {
    let n = energy.len();
    let mut map = Vec::with_capacity(e_grid.len());
    let mut i = 0usize;
    for &e in e_grid {
        while i + 2 < n && energy[i + 1] <= e {
            i += 1;
        }
        map.push(i);
    }
    map
}
