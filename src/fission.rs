// Fission-site production.
//
// Banks next-generation source sites at a fission event. Under survival
// biasing the expected daughter count uses the pre-collision weight and
// the fission-to-total ratio; at an analog fission event it uses the
// current weight and the parent is killed. Daughter directions are
// referenced to the laboratory axes, which is acceptable for an isotropic
// fission source.

use rand::Rng;

use crate::angle_distribution::sample_reaction_mu;
use crate::bank::{FissionBank, FissionSite};
use crate::data::MAX_DAUGHTER_ENERGY;
use crate::energy_distribution::EnergyDistribution;
use crate::error::{Result, TransportError};
use crate::nuclide::Nuclide;
use crate::particle::Particle;
use crate::reaction::Reaction;
use crate::xs::MicroXs;

/// Sample fission daughters for the current collision and bank them.
///
/// `actual_event` marks an analog fission (the sampled reaction was a
/// fission channel): the expectation is (w / k) nu-bar and the parent dies.
/// Otherwise the call is the implicit-fission step of survival biasing and
/// the expectation is (w_last sigma_f / (k sigma_t)) nu-bar.
pub fn create_fission_sites<R: Rng + ?Sized>(
    p: &mut Particle,
    nuclide: &Nuclide,
    reaction: &Reaction,
    micro: &MicroXs,
    keff: f64,
    actual_event: bool,
    bank: &mut FissionBank,
    rng: &mut R,
) -> Result<()> {
    if !nuclide.fissionable {
        return Err(TransportError::NotFissionable(nuclide.name.clone()));
    }

    let e = p.energy;
    let nu_t = nuclide.nu_total(e)?;
    let nu_d = nuclide.nu_delayed(e)?;
    let beta = if nu_t > 0.0 { nu_d / nu_t } else { 0.0 };

    let expected = if actual_event {
        p.weight / keff * nu_t
    } else {
        p.last_weight * micro.fission / (keff * micro.total) * nu_t
    };

    // Stochastic rounding to an integer daughter count
    let mut n = expected.floor() as usize;
    if rng.gen::<f64>() < expected - expected.floor() {
        n += 1;
    }

    for _ in 0..n {
        if bank.is_full() {
            // Saturation is silent; excess daughters are discarded
            break;
        }
        let mu = sample_reaction_mu(reaction.angle.as_ref(), e, rng);

        let energy = if rng.gen::<f64>() < beta {
            let group = sample_precursor_group(nuclide, e, rng)?;
            sample_daughter_energy(&nuclide.delayed_spectra[group], e, rng)?
        } else {
            match &reaction.energy {
                Some(dist) => sample_daughter_energy(dist, e, rng)?,
                None => {
                    return Err(TransportError::MissingFissionSpectrum { mt: reaction.mt })
                }
            }
        };

        let phi = 2.0 * std::f64::consts::PI * rng.gen::<f64>();
        let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();
        bank.push(FissionSite {
            uid: p.id,
            position: p.position,
            direction: [mu, sin_theta * phi.cos(), sin_theta * phi.sin()],
            energy,
        });
    }

    if actual_event {
        p.alive = false;
    }
    Ok(())
}

/// Sample a daughter energy, resampling while the spectrum returns values
/// at or above the transportable maximum.
fn sample_daughter_energy<R: Rng + ?Sized>(
    dist: &EnergyDistribution,
    e_in: f64,
    rng: &mut R,
) -> Result<f64> {
    let mut mu_scratch = f64::NAN;
    loop {
        let e = dist.sample(e_in, rng, Some(&mut mu_scratch))?;
        if e < MAX_DAUGHTER_ENERGY {
            return Ok(e);
        }
    }
}

/// Pick a delayed-neutron precursor group by inverting the cumulative
/// group-yield table at the incident energy.
fn sample_precursor_group<R: Rng + ?Sized>(
    nuclide: &Nuclide,
    e: f64,
    rng: &mut R,
) -> Result<usize> {
    let n_groups = nuclide.precursors.len();
    if n_groups == 0 || nuclide.delayed_spectra.len() < n_groups {
        return Err(TransportError::NotFissionable(nuclide.name.clone()));
    }
    let mut yields = Vec::with_capacity(n_groups);
    let mut total = 0.0;
    for group in &nuclide.precursors {
        let y = group.yield_fraction.evaluate(e)?;
        total += y;
        yields.push(y);
    }
    if total <= 0.0 {
        return Ok(n_groups - 1);
    }
    let xi = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (j, y) in yields.iter().enumerate() {
        cumulative += y;
        if xi < cumulative {
            return Ok(j);
        }
    }
    Ok(n_groups - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_rng::FastRng;
    use crate::interpolate::Tabulated1D;
    use crate::nuclide::{NuBar, PrecursorGroup};

    fn fissionable_nuclide(nu: f64, beta: f64) -> (Nuclide, Reaction) {
        let mut nuc = Nuclide::new(
            "U235",
            233.0,
            vec![1e-5, 20.0],
            vec![2.0, 2.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
        );
        nuc.fission = vec![1.0, 1.0];
        nuc.fissionable = true;
        nuc.nu_total = Some(NuBar::Polynomial {
            coefficients: vec![nu],
        });
        if beta > 0.0 {
            nuc.nu_delayed = Some(NuBar::Polynomial {
                coefficients: vec![nu * beta],
            });
            nuc.precursors = vec![
                PrecursorGroup {
                    decay_constant: 0.0124,
                    yield_fraction: Tabulated1D::new(vec![0.0, 20.0], vec![0.25, 0.25]),
                },
                PrecursorGroup {
                    decay_constant: 0.0305,
                    yield_fraction: Tabulated1D::new(vec![0.0, 20.0], vec![0.75, 0.75]),
                },
            ];
            nuc.delayed_spectra = vec![
                EnergyDistribution::MaxwellFission {
                    theta: Tabulated1D::new(vec![0.0, 20.0], vec![0.3, 0.3]),
                },
                EnergyDistribution::MaxwellFission {
                    theta: Tabulated1D::new(vec![0.0, 20.0], vec![0.5, 0.5]),
                },
            ];
        }
        let rxn = Reaction {
            mt: 18,
            q_value: 193.0,
            threshold_idx: 0,
            cross_section: vec![1.0, 1.0],
            multiplicity: 0,
            angle: None,
            energy: Some(EnergyDistribution::MaxwellFission {
                theta: Tabulated1D::new(vec![0.0, 20.0], vec![1.3, 1.3]),
            }),
        };
        (nuc, rxn)
    }

    fn micro() -> MicroXs {
        MicroXs {
            total: 2.0,
            elastic: 1.0,
            absorption: 1.0,
            fission: 1.0,
            nu_fission: 2.5,
            grid_index: 0,
            interp: 0.0,
        }
    }

    #[test]
    fn test_analog_event_kills_parent_and_banks() {
        let (nuc, rxn) = fissionable_nuclide(2.5, 0.0);
        let mut bank = FissionBank::new(1000);
        let mut rng = FastRng::new(1);
        let mut p = Particle::new([1.0, 2.0, 3.0], [0.0, 0.0, 1.0], 2.0);
        p.id = 77;
        create_fission_sites(&mut p, &nuc, &rxn, &micro(), 1.0, true, &mut bank, &mut rng)
            .unwrap();
        assert!(!p.alive);
        assert!(!bank.is_empty());
        for site in bank.sites() {
            assert_eq!(site.uid, 77);
            assert_eq!(site.position, [1.0, 2.0, 3.0]);
            assert!(site.energy < MAX_DAUGHTER_ENERGY);
            let norm = (site.direction[0].powi(2)
                + site.direction[1].powi(2)
                + site.direction[2].powi(2))
            .sqrt();
            assert!((norm - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_mean_daughter_count() {
        let (nuc, rxn) = fissionable_nuclide(2.5, 0.0);
        let mut rng = FastRng::new(2);
        let n_events = 100_000;
        let mut total = 0usize;
        for i in 0..n_events {
            let mut bank = FissionBank::new(64);
            let mut p = Particle::new([0.0; 3], [0.0, 0.0, 1.0], 2.0);
            p.id = i;
            create_fission_sites(&mut p, &nuc, &rxn, &micro(), 1.0, true, &mut bank, &mut rng)
                .unwrap();
            total += bank.len();
        }
        let mean = total as f64 / n_events as f64;
        // Stochastic rounding of 2.5 has sd 0.5; 3 sigma over 1e5 trials
        assert!(
            (mean - 2.5).abs() < 3.0 * 0.5 / (n_events as f64).sqrt(),
            "mean daughters {} deviates from 2.5",
            mean
        );
    }

    #[test]
    fn test_implicit_fission_uses_last_weight() {
        let (nuc, rxn) = fissionable_nuclide(2.0, 0.0);
        let mut rng = FastRng::new(3);
        let n_events = 50_000;
        let mut total = 0usize;
        for i in 0..n_events {
            let mut bank = FissionBank::new(64);
            let mut p = Particle::new([0.0; 3], [0.0, 0.0, 1.0], 2.0);
            p.id = i;
            p.last_weight = 0.5;
            // weight already attenuated by implicit capture; expectation
            // uses the pre-collision weight
            p.weight = 0.25;
            create_fission_sites(&mut p, &nuc, &rxn, &micro(), 1.0, false, &mut bank, &mut rng)
                .unwrap();
            assert!(p.alive, "implicit fission must not kill the parent");
            total += bank.len();
        }
        let mean = total as f64 / n_events as f64;
        // nu_eff = w_last * sigma_f / sigma_t * nu = 0.5 * 0.5 * 2.0 = 0.5
        assert!(
            (mean - 0.5).abs() < 0.02,
            "implicit fission mean {} deviates from 0.5",
            mean
        );
    }

    #[test]
    fn test_bank_saturation() {
        let (nuc, rxn) = fissionable_nuclide(1000.0, 0.0);
        let mut bank = FissionBank::new(8);
        let mut rng = FastRng::new(4);
        let mut p = Particle::new([0.0; 3], [0.0, 0.0, 1.0], 2.0);
        create_fission_sites(&mut p, &nuc, &rxn, &micro(), 1.0, true, &mut bank, &mut rng)
            .unwrap();
        assert_eq!(bank.len(), 8);
    }

    #[test]
    fn test_delayed_fraction() {
        let beta = 0.4;
        let (nuc, rxn) = fissionable_nuclide(2.5, beta);
        let mut rng = FastRng::new(5);
        // Delayed spectra are much softer than the prompt 1.3 MeV Maxwell;
        // check the banked mean energy drops when beta is large.
        let sample_mean = |nuc: &Nuclide, rng: &mut FastRng| -> f64 {
            let mut total = 0.0;
            let mut count = 0usize;
            for i in 0..20_000 {
                let mut bank = FissionBank::new(64);
                let mut p = Particle::new([0.0; 3], [0.0, 0.0, 1.0], 2.0);
                p.id = i;
                create_fission_sites(&mut p, nuc, &rxn, &micro(), 1.0, true, &mut bank, rng)
                    .unwrap();
                for site in bank.sites() {
                    total += site.energy;
                    count += 1;
                }
            }
            total / count as f64
        };
        let mean_with_delayed = sample_mean(&nuc, &mut rng);
        let (nuc_prompt, _) = fissionable_nuclide(2.5, 0.0);
        let mean_prompt = sample_mean(&nuc_prompt, &mut rng);
        assert!(
            mean_with_delayed < mean_prompt,
            "delayed emission should soften the spectrum: {} vs {}",
            mean_with_delayed,
            mean_prompt
        );
    }

    #[test]
    fn test_non_fissionable_is_error() {
        let nuc = Nuclide::new(
            "Fe56",
            55.5,
            vec![1e-5, 20.0],
            vec![2.0, 2.0],
            vec![2.0, 2.0],
            vec![0.0, 0.0],
        );
        let rxn = Reaction {
            mt: 18,
            q_value: 0.0,
            threshold_idx: 0,
            cross_section: vec![],
            multiplicity: 0,
            angle: None,
            energy: None,
        };
        let mut bank = FissionBank::new(8);
        let mut rng = FastRng::new(6);
        let mut p = Particle::new([0.0; 3], [0.0, 0.0, 1.0], 2.0);
        assert!(create_fission_sites(
            &mut p, &nuc, &rxn, &micro(), 1.0, true, &mut bank, &mut rng
        )
        .is_err());
    }
}
