// Direct sampling of the analytic spectra used by the fission and
// resonance helpers.

use rand::Rng;
use std::f64::consts::FRAC_PI_2;

/// Sample a Maxwell spectrum with nuclear temperature `t` (MeV).
///
/// Direct three-variate scheme: E = -T (ln xi1 + ln xi2 cos^2(pi/2 xi3)).
pub fn maxwell<R: Rng + ?Sized>(t: f64, rng: &mut R) -> f64 {
    let xi1: f64 = rng.gen();
    let xi2: f64 = rng.gen();
    let xi3: f64 = rng.gen();
    let c = (FRAC_PI_2 * xi3).cos();
    -t * (xi1.ln() + xi2.ln() * c * c)
}

/// Sample a Watt fission spectrum with parameters `a` (MeV) and `b` (1/MeV).
pub fn watt<R: Rng + ?Sized>(a: f64, b: f64, rng: &mut R) -> f64 {
    let w = maxwell(a, rng);
    let xi: f64 = rng.gen();
    w + a * a * b / 4.0 + (2.0 * xi - 1.0) * (a * a * b * w).sqrt()
}

/// Sample a level spacing from the Wigner surmise with mean spacing `d_avg`.
pub fn wigner<R: Rng + ?Sized>(d_avg: f64, rng: &mut R) -> f64 {
    let xi: f64 = rng.gen();
    (-(4.0 * d_avg * d_avg / std::f64::consts::PI) * xi.ln()).sqrt()
}

/// Sample a mean-one chi-squared variate with `n` degrees of freedom,
/// optionally scaled by a mean width `g_avg`.
///
/// Even n uses rule C45 (product of n/2 uniforms); odd n uses rule C64,
/// which adds a half-degree cosine-weighted term.
pub fn chi_squared<R: Rng + ?Sized>(n: u32, g_avg: Option<f64>, rng: &mut R) -> f64 {
    assert!(n > 0, "chi_squared requires at least one degree of freedom");
    let x = if n % 2 == 0 {
        // C45
        let mut product = 1.0f64;
        for _ in 0..n / 2 {
            product *= rng.gen::<f64>();
        }
        -(2.0 / n as f64) * product.ln()
    } else {
        // C64
        let mut product = 1.0f64;
        for _ in 0..(n - 1) / 2 {
            product *= rng.gen::<f64>();
        }
        let xi_a: f64 = rng.gen();
        let xi_b: f64 = rng.gen();
        let c = (FRAC_PI_2 * xi_b).cos();
        -(2.0 / n as f64) * (product.ln() + xi_a.ln() * c * c)
    };
    x * g_avg.unwrap_or(1.0)
}
