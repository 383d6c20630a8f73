// Collision engine: nuclide selection, reaction selection, and dispatch to
// the scattering, absorption, and fission handlers.
//
// Two sampling modes. Analog transport samples one reaction from the full
// microscopic total and lets absorption kill the particle. Under survival
// biasing, capture becomes deterministic weight attenuation, fission
// contributes sites in expectation, low weights play Russian roulette, and
// the surviving particle always scatters.

use crate::data::{
    is_disappearance, is_fission, is_inelastic_scatter, reaction_name, MT_ELASTIC,
    MT_GAS_PRODUCTION, MT_N_LEVEL,
};
use crate::error::{Result, TransportError};
use crate::fission::create_fission_sites;
use crate::particle::Particle;
use crate::physics::{elastic_scatter, inelastic_scatter};
use crate::reaction::Reaction;
use crate::tally::Tally;
use crate::transport::Worker;
use crate::xs::find_energy_index;

impl<'a> Worker<'a> {
    /// Process a collision at the particle's current position.
    pub fn collision(&mut self, p: &mut Particle, tally: &mut dyn Tally) -> Result<()> {
        let data = self.data;
        p.last_weight = p.weight;
        p.last_energy = p.energy;
        p.n_collisions += 1;

        let i_mat = p.material.ok_or(TransportError::MissingMaterial)?;
        let material = &data.materials[i_mat];

        // Select the target nuclide from the cumulative density-weighted
        // totals; falling off the end means the macroscopic total is
        // inconsistent with the microscopic values.
        let cutoff = self.rng.random() * self.macro_xs.total;
        let mut cumulative = 0.0;
        let mut selected = None;
        for mn in &material.nuclides {
            cumulative += mn.atom_density * self.micro_xs[mn.nuclide].total;
            if cutoff < cumulative {
                selected = Some(mn.nuclide);
                break;
            }
        }
        let i_nuc = selected.ok_or(TransportError::NuclideSamplingExhausted {
            material: i_mat,
            macro_total: self.macro_xs.total,
        })?;
        let nuclide = &data.nuclides[i_nuc];
        let micro = self.micro_xs[i_nuc];

        let mut scattered = false;

        if self.settings.survival_biasing {
            // Implicit capture
            p.weight *= 1.0 - micro.absorption / micro.total;

            // Implicit fission-site production
            if nuclide.fissionable {
                if let Some(i_fission) = nuclide.index_fission {
                    create_fission_sites(
                        p,
                        nuclide,
                        &nuclide.reactions[i_fission],
                        &micro,
                        self.keff,
                        false,
                        &mut self.bank,
                        &mut self.rng,
                    )?;
                }
            }

            // Weight cutoff: Russian roulette
            if p.weight < self.settings.weight_cutoff {
                if self.rng.random() < p.weight / self.settings.weight_survive {
                    p.weight = self.settings.weight_survive;
                } else {
                    p.alive = false;
                }
            }

            if p.alive {
                let sigma_scatter = micro.total - micro.absorption;
                if sigma_scatter <= 0.0 {
                    // Nothing to scatter into; the weight was fully
                    // absorbed above
                    p.alive = false;
                } else if self.rng.random() < micro.elastic / sigma_scatter {
                    let rxn = nuclide.elastic_reaction().ok_or_else(|| {
                        TransportError::ReactionSamplingExhausted {
                            nuclide: nuclide.name.clone(),
                            energy: p.energy,
                        }
                    })?;
                    elastic_scatter(p, nuclide, rxn, &mut self.rng);
                    scattered = true;
                } else {
                    let rxn = sample_inelastic_reaction(
                        nuclide,
                        &micro,
                        sigma_scatter - micro.elastic,
                        self.rng.random(),
                    )
                    .ok_or_else(|| TransportError::ReactionSamplingExhausted {
                        nuclide: nuclide.name.clone(),
                        energy: p.energy,
                    })?;
                    inelastic_scatter(p, nuclide, rxn, &mut self.rng)?;
                    scattered = true;
                }
            }
        } else {
            // Analog: one reaction from the full microscopic total,
            // skipping the lumped gas-production channels and the
            // synthetic total-inelastic
            let cutoff = self.rng.random() * micro.total;
            let mut cumulative = 0.0;
            let mut chosen = None;
            for rxn in &nuclide.reactions {
                if rxn.mt >= MT_GAS_PRODUCTION || rxn.mt == MT_N_LEVEL {
                    continue;
                }
                cumulative += rxn.cross_section_at(micro.grid_index, micro.interp);
                if cutoff < cumulative {
                    chosen = Some(rxn);
                    break;
                }
            }
            // Rounding can leave the scan just short of the summed total;
            // keep the last transportable candidate
            let rxn = match chosen {
                Some(r) => r,
                None => nuclide
                    .reactions
                    .iter()
                    .rev()
                    .find(|r| r.mt < MT_GAS_PRODUCTION && r.mt != MT_N_LEVEL)
                    .ok_or_else(|| TransportError::ReactionSamplingExhausted {
                        nuclide: nuclide.name.clone(),
                        energy: p.energy,
                    })?,
            };

            match rxn.mt {
                MT_ELASTIC => {
                    elastic_scatter(p, nuclide, rxn, &mut self.rng);
                    scattered = true;
                }
                mt if is_inelastic_scatter(mt) => {
                    inelastic_scatter(p, nuclide, rxn, &mut self.rng)?;
                    scattered = true;
                }
                mt if is_fission(mt) => {
                    create_fission_sites(
                        p,
                        nuclide,
                        rxn,
                        &micro,
                        self.keff,
                        true,
                        &mut self.bank,
                        &mut self.rng,
                    )?;
                }
                mt if is_disappearance(mt) => {
                    p.alive = false;
                }
                mt => {
                    log::warn!(
                        "reaction {} of {} not modelled; particle continues",
                        reaction_name(mt),
                        nuclide.name
                    );
                }
            }
        }

        if p.alive && (p.below_energy_floor() || p.energy < self.settings.energy_cutoff) {
            log::warn!(
                "particle {} killed at {:.3e} MeV after collision {}",
                p.id,
                p.energy,
                p.n_collisions
            );
            p.alive = false;
        }

        if self.settings.tallies_on {
            tally.score_collision(p, scattered);
        }

        if p.alive {
            find_energy_index(p, &data.e_grid);
        }
        Ok(())
    }
}

/// Invert the cumulative over the inelastic-scattering channels. Skips
/// elastic, the fission family, disappearance, the synthetic
/// total-inelastic, and gas production; each open channel contributes its
/// threshold-aligned cross section at the cached grid position.
fn sample_inelastic_reaction<'r>(
    nuclide: &'r crate::nuclide::Nuclide,
    micro: &crate::xs::MicroXs,
    total_inelastic: f64,
    xi: f64,
) -> Option<&'r Reaction> {
    if total_inelastic <= 0.0 {
        return None;
    }
    let cutoff = xi * total_inelastic;
    let mut cumulative = 0.0;
    for rxn in &nuclide.reactions {
        if rxn.mt == MT_ELASTIC
            || rxn.mt == MT_N_LEVEL
            || rxn.mt >= MT_GAS_PRODUCTION
            || is_fission(rxn.mt)
            || is_disappearance(rxn.mt)
        {
            continue;
        }
        cumulative += rxn.cross_section_at(micro.grid_index, micro.interp);
        if cutoff < cumulative {
            return Some(rxn);
        }
    }
    None
}
