// Secondary-energy distributions for the evaluated-data emission laws.
//
// Each law is a tagged variant; the flat-blob offsets of the evaluated
// format are unpacked by the data loader before transport. Laws 44 and 61
// are correlated in energy and angle and require a cosine output slot from
// the caller; laws 5 and 67 are recognized but not implemented.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::angle_distribution::{
    clamp_mu, continuous_inversion, invert_cdf, sample_isotropic, Interpolation, TabularAngle,
};
use crate::error::{Result, TransportError};
use crate::interpolate::{binary_search, Tabulated1D};
use crate::sampling::{maxwell, watt};

/// Outgoing-energy table at one incident-energy breakpoint (continuous
/// tabular form): NP energies with pdf and running cdf.
///
/// `n_discrete` counts leading discrete lines; the transport core rejects
/// tables that carry any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumTable {
    pub e_out: Vec<f64>,
    pub pdf: Vec<f64>,
    pub cdf: Vec<f64>,
    pub interpolation: Interpolation,
    #[serde(default)]
    pub n_discrete: usize,
}

/// Law 4: continuous tabular spectrum over an incident-energy grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousTabular {
    pub energy: Vec<f64>,
    pub tables: Vec<SpectrumTable>,
}

/// Law 44 table: a spectrum plus the Kalbach precompound fraction `r` and
/// slope `a` at each outgoing-energy point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KalbachTable {
    pub spectrum: SpectrumTable,
    pub km_r: Vec<f64>,
    pub km_a: Vec<f64>,
}

/// Law 44: Kalbach-Mann correlated energy-angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KalbachMann {
    pub energy: Vec<f64>,
    pub tables: Vec<KalbachTable>,
}

/// Law 61 table: a spectrum with a per-outgoing-bin angular distribution;
/// `None` is the isotropic shortcut (zero offset in the packed format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedTable {
    pub spectrum: SpectrumTable,
    pub angle: Vec<Option<TabularAngle>>,
}

/// Law 61: correlated energy-angle with tabulated angular distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedAngleEnergy {
    pub energy: Vec<f64>,
    pub tables: Vec<CorrelatedTable>,
}

/// Secondary-energy distribution of a reaction, tagged by evaluated-data
/// law number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "law")]
pub enum EnergyDistribution {
    /// Law 1: tabular equiprobable energy bins. Each row holds NET
    /// outgoing energies delimiting equally probable bins.
    Equiprobable {
        energy: Vec<f64>,
        tables: Vec<Vec<f64>>,
    },
    /// Law 3: inelastic discrete-level scattering,
    /// E_out = mass_ratio * (E_in - threshold).
    LevelInelastic { mass_ratio: f64, threshold: f64 },
    /// Law 4: continuous tabular.
    ContinuousTabular(ContinuousTabular),
    /// Law 5: general evaporation (extension point).
    GeneralEvaporation { theta: Tabulated1D, g: Vec<f64> },
    /// Law 7: Maxwell fission spectrum with tabulated temperature.
    MaxwellFission { theta: Tabulated1D },
    /// Law 9: evaporation spectrum with restriction energy.
    Evaporation { theta: Tabulated1D, restriction: f64 },
    /// Law 11: energy-dependent Watt spectrum.
    Watt { a: Tabulated1D, b: Tabulated1D },
    /// Law 44: Kalbach-Mann correlated energy-angle.
    KalbachMann(KalbachMann),
    /// Law 61: correlated energy-angle with tabulated angle tables.
    CorrelatedAngleEnergy(CorrelatedAngleEnergy),
    /// Law 66: N-body phase space.
    NBodyPhaseSpace {
        n_bodies: u32,
        /// Total mass ratio Ap of the N-body system.
        total_mass_ratio: f64,
        /// Atomic weight ratio of the target.
        awr: f64,
        /// Reaction Q-value in MeV.
        q_value: f64,
    },
    /// Law 67: laboratory energy-angle (extension point).
    LabAngleEnergy,
}

impl EnergyDistribution {
    /// Evaluated-data law number of this variant.
    pub fn law(&self) -> i32 {
        match self {
            EnergyDistribution::Equiprobable { .. } => 1,
            EnergyDistribution::LevelInelastic { .. } => 3,
            EnergyDistribution::ContinuousTabular(_) => 4,
            EnergyDistribution::GeneralEvaporation { .. } => 5,
            EnergyDistribution::MaxwellFission { .. } => 7,
            EnergyDistribution::Evaporation { .. } => 9,
            EnergyDistribution::Watt { .. } => 11,
            EnergyDistribution::KalbachMann(_) => 44,
            EnergyDistribution::CorrelatedAngleEnergy(_) => 61,
            EnergyDistribution::NBodyPhaseSpace { .. } => 66,
            EnergyDistribution::LabAngleEnergy => 67,
        }
    }

    /// True for laws that produce a correlated scattering cosine along
    /// with the outgoing energy.
    pub fn is_correlated(&self) -> bool {
        matches!(
            self,
            EnergyDistribution::KalbachMann(_) | EnergyDistribution::CorrelatedAngleEnergy(_)
        )
    }

    /// Sample an outgoing energy (MeV) for incident energy `e_in`.
    ///
    /// Correlated laws (44, 61) also produce a scattering cosine and
    /// require `mu` to be `Some`; invoking them without a slot is fatal.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        e_in: f64,
        rng: &mut R,
        mut mu: Option<&mut f64>,
    ) -> Result<f64> {
        match self {
            EnergyDistribution::Equiprobable { energy, tables } => {
                sample_equiprobable(energy, tables, e_in, rng)
            }
            EnergyDistribution::LevelInelastic {
                mass_ratio,
                threshold,
            } => Ok(mass_ratio * (e_in - threshold)),
            EnergyDistribution::ContinuousTabular(dist) => {
                let pick = pick_incident_table(&dist.energy, e_in, rng);
                let (e_out, _) = sample_spectrum(&dist.tables[pick.table], rng)?;
                Ok(scale_interpolate(|j| &dist.tables[j].e_out, &pick, e_out))
            }
            EnergyDistribution::GeneralEvaporation { .. } => {
                Err(TransportError::UnsupportedLaw { law: 5 })
            }
            EnergyDistribution::MaxwellFission { theta } => {
                let t = theta.evaluate(e_in)?;
                Ok(maxwell(t, rng))
            }
            EnergyDistribution::Evaporation { theta, restriction } => {
                let t = theta.evaluate(e_in)?;
                // Below the restriction energy the channel is closed
                if e_in <= *restriction {
                    return Ok(0.0);
                }
                // Rejection on the restricted range E_out <= E_in - U
                loop {
                    let xi1: f64 = rng.gen();
                    let xi2: f64 = rng.gen();
                    let e_out = -t * (xi1 * xi2).ln();
                    if e_out <= e_in - restriction {
                        return Ok(e_out);
                    }
                }
            }
            EnergyDistribution::Watt { a, b } => {
                let a = a.evaluate(e_in)?;
                let b = b.evaluate(e_in)?;
                Ok(watt(a, b, rng))
            }
            EnergyDistribution::KalbachMann(dist) => {
                let slot = mu
                    .as_deref_mut()
                    .ok_or(TransportError::MissingCosineSlot { law: 44 })?;
                sample_kalbach_mann(dist, e_in, rng, slot)
            }
            EnergyDistribution::CorrelatedAngleEnergy(dist) => {
                let slot = mu
                    .as_deref_mut()
                    .ok_or(TransportError::MissingCosineSlot { law: 61 })?;
                sample_correlated(dist, e_in, rng, slot)
            }
            EnergyDistribution::NBodyPhaseSpace {
                n_bodies,
                total_mass_ratio,
                awr,
                q_value,
            } => sample_n_body(*n_bodies, *total_mass_ratio, *awr, *q_value, e_in, rng),
            EnergyDistribution::LabAngleEnergy => Err(TransportError::UnsupportedLaw { law: 67 }),
        }
    }
}

/// Result of locating the incident-energy bin: the bracketing bin, its
/// interpolation fraction, and the stochastically chosen table.
struct IncidentPick {
    /// Lower bracketing breakpoint index.
    bin: usize,
    /// Fraction of the way from `bin` to `bin + 1`; 0 or 1 off-grid.
    r: f64,
    /// Table actually sampled: `bin` with probability 1 - r, else `bin + 1`.
    table: usize,
}

/// Locate the incident bin and stochastically pick between the bracketing
/// tables, clamping at the ends of the grid.
fn pick_incident_table<R: Rng + ?Sized>(energy: &[f64], e_in: f64, rng: &mut R) -> IncidentPick {
    if energy.len() < 2 {
        return IncidentPick {
            bin: 0,
            r: 0.0,
            table: 0,
        };
    }
    let i = binary_search(energy, e_in);
    let r = if e_in <= energy[i] {
        0.0
    } else if e_in >= energy[i + 1] {
        1.0
    } else {
        (e_in - energy[i]) / (energy[i + 1] - energy[i])
    };
    let table = if rng.gen::<f64>() < r { i + 1 } else { i };
    IncidentPick { bin: i, r, table }
}

/// Invert a spectrum table's CDF; returns (raw outgoing energy, bin index).
fn sample_spectrum<R: Rng + ?Sized>(table: &SpectrumTable, rng: &mut R) -> Result<(f64, usize)> {
    if table.n_discrete > 0 {
        return Err(TransportError::DiscreteLines {
            nd: table.n_discrete,
        });
    }
    if table.e_out.len() < 2 {
        return Err(TransportError::EmptyTabulation);
    }
    let xi: f64 = rng.gen();
    let k = invert_cdf(&table.cdf, xi);
    let e = continuous_inversion(
        table.interpolation,
        &table.e_out,
        &table.pdf,
        &table.cdf,
        k,
        xi,
    );
    Ok((e, k))
}

/// Scale-interpolate a raw outgoing energy sampled from the chosen table
/// onto the support implied by the interpolated endpoints of the two
/// bracketing tables.
fn scale_interpolate<'a, F>(table_e_out: F, pick: &IncidentPick, e_raw: f64) -> f64
where
    F: Fn(usize) -> &'a Vec<f64>,
{
    // Off-grid incident energies use the nearest table unscaled
    if pick.r <= 0.0 || pick.r >= 1.0 {
        return e_raw;
    }
    let lo = table_e_out(pick.bin);
    let hi = table_e_out(pick.bin + 1);
    let sampled = table_e_out(pick.table);
    let e_min = lo[0] + pick.r * (hi[0] - lo[0]);
    let e_max = lo[lo.len() - 1] + pick.r * (hi[hi.len() - 1] - lo[lo.len() - 1]);
    let s_min = sampled[0];
    let s_max = sampled[sampled.len() - 1];
    if s_max == s_min {
        return e_raw;
    }
    e_min + (e_raw - s_min) * (e_max - e_min) / (s_max - s_min)
}

/// Law 1: pick a row, pick an equiprobable bin, sample uniformly inside.
fn sample_equiprobable<R: Rng + ?Sized>(
    energy: &[f64],
    tables: &[Vec<f64>],
    e_in: f64,
    rng: &mut R,
) -> Result<f64> {
    if tables.is_empty() {
        return Err(TransportError::EmptyTabulation);
    }
    let pick = pick_incident_table(energy, e_in, rng);
    let row = &tables[pick.table];
    if row.len() < 2 {
        return Err(TransportError::EmptyTabulation);
    }
    let net = row.len();
    let xi: f64 = rng.gen();
    let k = ((net as f64 * xi) as usize).min(net - 2);
    let xi2: f64 = rng.gen();
    Ok(row[k] + xi2 * (row[k + 1] - row[k]))
}

/// Law 44 sampling: energy by CDF inversion plus scale interpolation, then
/// the correlated cosine from the Kalbach (r, a) systematics.
fn sample_kalbach_mann<R: Rng + ?Sized>(
    dist: &KalbachMann,
    e_in: f64,
    rng: &mut R,
    mu: &mut f64,
) -> Result<f64> {
    let pick = pick_incident_table(&dist.energy, e_in, rng);
    let table = &dist.tables[pick.table];
    let (e_raw, k) = sample_spectrum(&table.spectrum, rng)?;

    // Precompound fraction and slope at the sampled outgoing energy
    let (km_r, km_a) = match table.spectrum.interpolation {
        Interpolation::Histogram => (table.km_r[k], table.km_a[k]),
        Interpolation::LinLin => {
            let e_k = table.spectrum.e_out[k];
            let e_k1 = table.spectrum.e_out[k + 1];
            let f = if e_k1 > e_k {
                ((e_raw - e_k) / (e_k1 - e_k)).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (
                table.km_r[k] + f * (table.km_r[k + 1] - table.km_r[k]),
                table.km_a[k] + f * (table.km_a[k + 1] - table.km_a[k]),
            )
        }
    };

    let e_out = scale_interpolate(|j| &dist.tables[j].spectrum.e_out, &pick, e_raw);

    let xi3: f64 = rng.gen();
    let xi4: f64 = rng.gen();
    let sampled = if xi3 > km_r {
        let t = (2.0 * xi4 - 1.0) * km_a.sinh();
        t.asinh() / km_a
    } else {
        (xi4 * km_a.exp() + (1.0 - xi4) * (-km_a).exp()).ln() / km_a
    };
    *mu = clamp_mu(sampled);
    Ok(e_out)
}

/// Law 61 sampling: energy as in law 4, then the cosine from the angular
/// table attached to the sampled outgoing-energy bin.
fn sample_correlated<R: Rng + ?Sized>(
    dist: &CorrelatedAngleEnergy,
    e_in: f64,
    rng: &mut R,
    mu: &mut f64,
) -> Result<f64> {
    let pick = pick_incident_table(&dist.energy, e_in, rng);
    let table = &dist.tables[pick.table];
    let (e_raw, k) = sample_spectrum(&table.spectrum, rng)?;
    let e_out = scale_interpolate(|j| &dist.tables[j].spectrum.e_out, &pick, e_raw);

    *mu = match table.angle.get(k).and_then(|a| a.as_ref()) {
        Some(tab) => tab.sample(rng),
        None => sample_isotropic(rng),
    };
    Ok(e_out)
}

/// Law 66: N-body phase space for 3, 4, or 5 bodies.
fn sample_n_body<R: Rng + ?Sized>(
    n_bodies: u32,
    total_mass_ratio: f64,
    awr: f64,
    q_value: f64,
    e_in: f64,
    rng: &mut R,
) -> Result<f64> {
    let ap = total_mass_ratio;
    let e_max = (ap - 1.0) / ap * (awr / (awr + 1.0) * e_in + q_value);
    let x = maxwell(1.0, rng);
    let y = match n_bodies {
        3 => maxwell(1.0, rng),
        4 => {
            let xi1: f64 = rng.gen();
            let xi2: f64 = rng.gen();
            let xi3: f64 = rng.gen();
            -(xi1 * xi2 * xi3).ln()
        }
        5 => {
            let xi1: f64 = rng.gen();
            let xi2: f64 = rng.gen();
            let xi3: f64 = rng.gen();
            let xi4: f64 = rng.gen();
            let xi5: f64 = rng.gen();
            let xi6: f64 = rng.gen();
            let c = (std::f64::consts::FRAC_PI_2 * xi6).cos();
            -(xi1 * xi2 * xi3 * xi4).ln() - xi5.ln() * c * c
        }
        other => return Err(TransportError::InvalidBodyCount(other)),
    };
    Ok(e_max * x / (x + y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fast_rng::FastRng;

    fn uniform_spectrum(lo: f64, hi: f64) -> SpectrumTable {
        let p = 1.0 / (hi - lo);
        SpectrumTable {
            e_out: vec![lo, hi],
            pdf: vec![p, p],
            cdf: vec![0.0, 1.0],
            interpolation: Interpolation::Histogram,
            n_discrete: 0,
        }
    }

    #[test]
    fn test_level_inelastic() {
        let dist = EnergyDistribution::LevelInelastic {
            mass_ratio: 0.25,
            threshold: 2.0,
        };
        let mut rng = FastRng::new(1);
        let e = dist.sample(6.0, &mut rng, None).unwrap();
        assert!((e - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_law_number_mapping() {
        let dist = EnergyDistribution::LevelInelastic {
            mass_ratio: 1.0,
            threshold: 0.0,
        };
        assert_eq!(dist.law(), 3);
        assert!(!dist.is_correlated());
        let km = EnergyDistribution::KalbachMann(KalbachMann {
            energy: vec![],
            tables: vec![],
        });
        assert_eq!(km.law(), 44);
        assert!(km.is_correlated());
    }

    #[test]
    fn test_equiprobable_bins_within_range() {
        let dist = EnergyDistribution::Equiprobable {
            energy: vec![1.0, 10.0],
            tables: vec![vec![0.0, 0.5, 1.0, 2.0], vec![0.0, 1.0, 2.0, 4.0]],
        };
        let mut rng = FastRng::new(2);
        for _ in 0..1000 {
            let e = dist.sample(5.0, &mut rng, None).unwrap();
            assert!((0.0..=4.0).contains(&e));
        }
    }

    #[test]
    fn test_continuous_tabular_single_table() {
        let dist = EnergyDistribution::ContinuousTabular(ContinuousTabular {
            energy: vec![1.0],
            tables: vec![uniform_spectrum(0.0, 2.0)],
        });
        let mut rng = FastRng::new(3);
        let n = 100_000;
        let mean: f64 = (0..n)
            .map(|_| dist.sample(1.0, &mut rng, None).unwrap())
            .sum::<f64>()
            / n as f64;
        assert!((mean - 1.0).abs() < 0.01, "uniform mean {} near 1", mean);
    }

    #[test]
    fn test_continuous_tabular_rejects_discrete_lines() {
        let mut table = uniform_spectrum(0.0, 2.0);
        table.n_discrete = 2;
        let dist = EnergyDistribution::ContinuousTabular(ContinuousTabular {
            energy: vec![1.0],
            tables: vec![table],
        });
        let mut rng = FastRng::new(3);
        assert_eq!(
            dist.sample(1.0, &mut rng, None),
            Err(TransportError::DiscreteLines { nd: 2 })
        );
    }

    #[test]
    fn test_continuous_tabular_scale_interpolation_bounds() {
        // Tables at 1 and 3 MeV with shifted supports; at 2 MeV the sampled
        // energy must land within the interpolated support [0.5, 2.5].
        let dist = EnergyDistribution::ContinuousTabular(ContinuousTabular {
            energy: vec![1.0, 3.0],
            tables: vec![uniform_spectrum(0.0, 2.0), uniform_spectrum(1.0, 3.0)],
        });
        let mut rng = FastRng::new(4);
        for _ in 0..2000 {
            let e = dist.sample(2.0, &mut rng, None).unwrap();
            assert!(
                (0.5..=2.5).contains(&e),
                "scaled sample {} outside interpolated support",
                e
            );
        }
    }

    #[test]
    fn test_maxwell_fission_law() {
        let dist = EnergyDistribution::MaxwellFission {
            theta: Tabulated1D::new(vec![0.0, 20.0], vec![1.3, 1.3]),
        };
        let mut rng = FastRng::new(5);
        let n = 100_000;
        let mean: f64 = (0..n)
            .map(|_| dist.sample(2.0, &mut rng, None).unwrap())
            .sum::<f64>()
            / n as f64;
        assert!((mean - 1.95).abs() < 0.03, "Maxwell mean {} near 1.95", mean);
    }

    #[test]
    fn test_evaporation_respects_restriction() {
        let dist = EnergyDistribution::Evaporation {
            theta: Tabulated1D::new(vec![0.0, 20.0], vec![1.0, 1.0]),
            restriction: 0.5,
        };
        let mut rng = FastRng::new(6);
        for _ in 0..2000 {
            let e = dist.sample(3.0, &mut rng, None).unwrap();
            assert!(e <= 2.5, "evaporation sample {} above E_in - U", e);
        }
    }

    #[test]
    fn test_watt_law_positive() {
        let dist = EnergyDistribution::Watt {
            a: Tabulated1D::new(vec![0.0, 20.0], vec![0.988, 0.988]),
            b: Tabulated1D::new(vec![0.0, 20.0], vec![2.249, 2.249]),
        };
        let mut rng = FastRng::new(7);
        for _ in 0..1000 {
            assert!(dist.sample(1.0, &mut rng, None).unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_kalbach_requires_mu_slot() {
        let dist = EnergyDistribution::KalbachMann(KalbachMann {
            energy: vec![1.0],
            tables: vec![KalbachTable {
                spectrum: uniform_spectrum(0.0, 2.0),
                km_r: vec![0.5, 0.5],
                km_a: vec![1.0, 1.0],
            }],
        });
        let mut rng = FastRng::new(8);
        assert_eq!(
            dist.sample(1.0, &mut rng, None),
            Err(TransportError::MissingCosineSlot { law: 44 })
        );
        let mut mu = f64::NAN;
        let e = dist.sample(1.0, &mut rng, Some(&mut mu)).unwrap();
        assert!((0.0..=2.0).contains(&e));
        assert!((-1.0..=1.0).contains(&mu));
    }

    #[test]
    fn test_kalbach_mu_moments() {
        // With r = 1 the cosine density is a e^{a mu} / (2 sinh a); its mean
        // is coth(a) - 1/a.
        let a = 2.0f64;
        let dist = EnergyDistribution::KalbachMann(KalbachMann {
            energy: vec![1.0],
            tables: vec![KalbachTable {
                spectrum: uniform_spectrum(0.0, 2.0),
                km_r: vec![1.0, 1.0],
                km_a: vec![a, a],
            }],
        });
        let mut rng = FastRng::new(9);
        let n = 200_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let mut mu = f64::NAN;
            dist.sample(1.0, &mut rng, Some(&mut mu)).unwrap();
            sum += mu;
        }
        let mean = sum / n as f64;
        let expected = 1.0 / a.tanh() - 1.0 / a;
        assert!(
            (mean - expected).abs() < 0.01,
            "Kalbach mean cosine {} vs analytic {}",
            mean,
            expected
        );
    }

    #[test]
    fn test_correlated_isotropic_shortcut() {
        let dist = EnergyDistribution::CorrelatedAngleEnergy(CorrelatedAngleEnergy {
            energy: vec![1.0],
            tables: vec![CorrelatedTable {
                spectrum: uniform_spectrum(0.0, 2.0),
                angle: vec![None, None],
            }],
        });
        let mut rng = FastRng::new(10);
        let mut mu = f64::NAN;
        let e = dist.sample(1.0, &mut rng, Some(&mut mu)).unwrap();
        assert!((0.0..=2.0).contains(&e));
        assert!((-1.0..1.0).contains(&mu));
    }

    #[test]
    fn test_correlated_uses_bin_angle_table() {
        // Forward-pinned tabular angle in every bin
        let forward = TabularAngle {
            mu: vec![0.9, 1.0],
            pdf: vec![10.0, 10.0],
            cdf: vec![0.0, 1.0],
            interpolation: Interpolation::Histogram,
        };
        let dist = EnergyDistribution::CorrelatedAngleEnergy(CorrelatedAngleEnergy {
            energy: vec![1.0],
            tables: vec![CorrelatedTable {
                spectrum: uniform_spectrum(0.0, 2.0),
                angle: vec![Some(forward.clone()), Some(forward)],
            }],
        });
        let mut rng = FastRng::new(11);
        for _ in 0..500 {
            let mut mu = f64::NAN;
            dist.sample(1.0, &mut rng, Some(&mut mu)).unwrap();
            assert!(mu >= 0.9, "cosine {} should stay in the forward bin", mu);
        }
    }

    #[test]
    fn test_n_body_phase_space() {
        let dist = EnergyDistribution::NBodyPhaseSpace {
            n_bodies: 3,
            total_mass_ratio: 5.0,
            awr: 4.0,
            q_value: 1.0,
        };
        let mut rng = FastRng::new(12);
        let e_in = 10.0;
        let e_max = 4.0 / 5.0 * (4.0 / 5.0 * e_in + 1.0);
        for _ in 0..2000 {
            let e = dist.sample(e_in, &mut rng, None).unwrap();
            assert!((0.0..=e_max).contains(&e), "{} outside [0, {}]", e, e_max);
        }
    }

    #[test]
    fn test_n_body_rejects_bad_count() {
        let dist = EnergyDistribution::NBodyPhaseSpace {
            n_bodies: 6,
            total_mass_ratio: 5.0,
            awr: 4.0,
            q_value: 0.0,
        };
        let mut rng = FastRng::new(13);
        assert_eq!(
            dist.sample(1.0, &mut rng, None),
            Err(TransportError::InvalidBodyCount(6))
        );
    }

    #[test]
    fn test_extension_laws_are_fatal() {
        let mut rng = FastRng::new(14);
        let law5 = EnergyDistribution::GeneralEvaporation {
            theta: Tabulated1D::new(vec![0.0, 1.0], vec![1.0, 1.0]),
            g: vec![0.0, 1.0],
        };
        assert_eq!(
            law5.sample(1.0, &mut rng, None),
            Err(TransportError::UnsupportedLaw { law: 5 })
        );
        assert_eq!(
            EnergyDistribution::LabAngleEnergy.sample(1.0, &mut rng, None),
            Err(TransportError::UnsupportedLaw { law: 67 })
        );
    }
}
