// Angular distributions for scattering cosines.
//
// A reaction carries one table per incoming-energy breakpoint. The table
// for a collision is chosen stochastically between the two bracketing
// breakpoints, then sampled according to its representation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::interpolate::binary_search;

static MU_RANGE_WARNED: AtomicBool = AtomicBool::new(false);

/// Interpolation scheme within a tabulated distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    Histogram,
    LinLin,
}

/// Tabulated cosine distribution: NP cosines with pdf and running cdf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularAngle {
    pub mu: Vec<f64>,
    pub pdf: Vec<f64>,
    pub cdf: Vec<f64>,
    pub interpolation: Interpolation,
}

impl TabularAngle {
    /// Invert the stored CDF at a uniform variate.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let xi: f64 = rng.gen();
        let k = invert_cdf(&self.cdf, xi);
        let mu = continuous_inversion(
            self.interpolation,
            &self.mu,
            &self.pdf,
            &self.cdf,
            k,
            xi,
        );
        clamp_mu(mu)
    }
}

/// Locate the CDF bin: largest k with cdf[k] <= xi, clamped to [0, n-2].
pub(crate) fn invert_cdf(cdf: &[f64], xi: f64) -> usize {
    let n = cdf.len();
    let mut k = 0;
    for j in 0..n.saturating_sub(1) {
        if xi >= cdf[j + 1] {
            k = j + 1;
        } else {
            break;
        }
    }
    k.min(n.saturating_sub(2))
}

/// Continuous CDF inversion within bin k under histogram or lin-lin pdf.
///
/// Histogram: x = x_k + (xi - c_k)/p_k. Lin-lin solves
/// p_k (x - x_k) + m/2 (x - x_k)^2 = xi - c_k with m the pdf slope; the
/// m = 0 degenerate case falls back to the histogram form.
pub(crate) fn continuous_inversion(
    interpolation: Interpolation,
    x: &[f64],
    pdf: &[f64],
    cdf: &[f64],
    k: usize,
    xi: f64,
) -> f64 {
    let x_k = x[k];
    let p_k = pdf[k];
    let c_k = cdf[k];
    match interpolation {
        Interpolation::Histogram => {
            if p_k > 0.0 {
                x_k + (xi - c_k) / p_k
            } else {
                x_k
            }
        }
        Interpolation::LinLin => {
            let m = (pdf[k + 1] - p_k) / (x[k + 1] - x_k);
            if m == 0.0 {
                if p_k > 0.0 {
                    x_k + (xi - c_k) / p_k
                } else {
                    x_k
                }
            } else {
                let discriminant = (p_k * p_k + 2.0 * m * (xi - c_k)).max(0.0);
                x_k + (discriminant.sqrt() - p_k) / m
            }
        }
    }
}

/// Snap a sampled cosine into [-1, 1], warning the first time a sample
/// strays.
pub(crate) fn clamp_mu(mu: f64) -> f64 {
    if mu.abs() > 1.0 {
        if !MU_RANGE_WARNED.swap(true, Ordering::Relaxed) {
            log::warn!("sampled scattering cosine {} outside [-1, 1]; snapping", mu);
        }
        mu.clamp(-1.0, 1.0)
    } else {
        mu
    }
}

/// One angular table at a single incoming-energy breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AngleTable {
    Isotropic,
    /// 33 cosine boundaries delimiting 32 equally probable bins.
    Equiprobable32 { bins: Vec<f64> },
    Tabular(TabularAngle),
}

impl AngleTable {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            AngleTable::Isotropic => sample_isotropic(rng),
            AngleTable::Equiprobable32 { bins } => {
                let xi: f64 = rng.gen();
                let scaled = 32.0 * xi;
                let k = (scaled as usize).min(31);
                let f = scaled - k as f64;
                clamp_mu(bins[k] + f * (bins[k + 1] - bins[k]))
            }
            AngleTable::Tabular(tab) => tab.sample(rng),
        }
    }
}

/// Uniform cosine on [-1, 1).
#[inline]
pub fn sample_isotropic<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    2.0 * rng.gen::<f64>() - 1.0
}

/// Angular distribution over incoming energy for one reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleDistribution {
    /// Incoming-energy breakpoints (MeV), strictly increasing.
    pub energy: Vec<f64>,
    /// One table per breakpoint.
    pub tables: Vec<AngleTable>,
}

impl AngleDistribution {
    /// Sample a scattering cosine for incoming energy `e_in`.
    ///
    /// The bracketing breakpoint is chosen stochastically with probability
    /// proportional to the distance from `e_in`; at either end of the grid
    /// the nearest table is used.
    pub fn sample<R: Rng + ?Sized>(&self, e_in: f64, rng: &mut R) -> f64 {
        if self.tables.is_empty() {
            return sample_isotropic(rng);
        }
        if self.tables.len() == 1 {
            return self.tables[0].sample(rng);
        }
        let i = binary_search(&self.energy, e_in);
        let frac = if e_in <= self.energy[i] {
            0.0
        } else if e_in >= self.energy[i + 1] {
            1.0
        } else {
            (e_in - self.energy[i]) / (self.energy[i + 1] - self.energy[i])
        };
        let l = if rng.gen::<f64>() < frac { i + 1 } else { i };
        self.tables[l].sample(rng)
    }
}

/// Cosine for a reaction that may lack angular data entirely; the fallback
/// is isotropic.
pub fn sample_reaction_mu<R: Rng + ?Sized>(
    adist: Option<&AngleDistribution>,
    e_in: f64,
    rng: &mut R,
) -> f64 {
    match adist {
        Some(dist) => dist.sample(e_in, rng),
        None => sample_isotropic(rng),
    }
}
