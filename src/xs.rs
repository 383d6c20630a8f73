// Cross-section lookup on the unionized grid.
//
// `MicroXs` entries are per-worker scratch, overwritten for each material
// evaluation; `MacroXs` is the atom-density-weighted aggregate over the
// particle's current material. A lookup is skipped only when both the
// material and the energy are unchanged since the previous one.

use crate::error::Result;
use crate::grid::NuclearData;
use crate::interpolate::binary_search;
use crate::particle::Particle;

/// Microscopic cross sections of one nuclide at the particle's energy,
/// barns, plus the cached own-grid position.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroXs {
    pub total: f64,
    pub elastic: f64,
    pub absorption: f64,
    pub fission: f64,
    pub nu_fission: f64,
    /// Index into the nuclide's own grid.
    pub grid_index: usize,
    /// Interpolation fraction on the nuclide's own grid; outside [0, 1)
    /// when the energy is off-grid.
    pub interp: f64,
}

/// Macroscopic cross sections of the particle's material, 1/cm.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroXs {
    pub total: f64,
    pub elastic: f64,
    pub absorption: f64,
    pub fission: f64,
    pub nu_fission: f64,
}

/// Locate the particle's energy on the unionized grid and refresh the
/// cached index and fraction. Under-range energies clamp to the first
/// bracket (fraction < 0), over-range to the last (fraction > 1).
pub fn find_energy_index(p: &mut Particle, e_grid: &[f64]) {
    let ie = binary_search(e_grid, p.energy);
    p.grid_index = ie;
    p.interp = (p.energy - e_grid[ie]) / (e_grid[ie + 1] - e_grid[ie]);
}

/// Evaluate microscopic cross sections for every nuclide of the particle's
/// material and accumulate the macroscopic sums.
///
/// Results land in `micro` (indexed by nuclide arena index) and `macro_xs`;
/// the per-nuclide grid positions are cached for reuse by collision
/// sampling. A particle in void (no material) zeroes the macroscopic
/// values.
pub fn calculate_xs(
    p: &mut Particle,
    data: &NuclearData,
    micro: &mut [MicroXs],
    macro_xs: &mut MacroXs,
) -> Result<()> {
    // Both conditions: cross sections depend on energy as well as material
    if p.material == p.last_material && p.energy == p.last_energy_xs {
        return Ok(());
    }

    *macro_xs = MacroXs::default();
    find_energy_index(p, &data.e_grid);

    let material = match p.material {
        Some(m) => &data.materials[m],
        None => {
            p.last_material = None;
            p.last_energy_xs = p.energy;
            return Ok(());
        }
    };

    let e = p.energy;
    for mn in &material.nuclides {
        let nuc = &data.nuclides[mn.nuclide];
        let ie_n = nuc.grid_index[p.grid_index];
        let f = (e - nuc.energy[ie_n]) / (nuc.energy[ie_n + 1] - nuc.energy[ie_n]);
        let (total, elastic, absorption, fission) = nuc.micro_xs_at(ie_n, f);
        let nu_fission = if nuc.fissionable {
            nuc.nu_total(e)? * fission
        } else {
            0.0
        };
        micro[mn.nuclide] = MicroXs {
            total,
            elastic,
            absorption,
            fission,
            nu_fission,
            grid_index: ie_n,
            interp: f,
        };
        macro_xs.total += mn.atom_density * total;
        macro_xs.elastic += mn.atom_density * elastic;
        macro_xs.absorption += mn.atom_density * absorption;
        macro_xs.fission += mn.atom_density * fission;
        macro_xs.nu_fission += mn.atom_density * nu_fission;
    }

    p.last_material = p.material;
    p.last_energy_xs = e;
    Ok(())
}
