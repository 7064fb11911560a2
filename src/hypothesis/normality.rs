//! D'Agostino-Pearson omnibus normality test
//!
//! Combines a skewness test and a kurtosis test into K^2 = Z_s^2 + Z_k^2,
//! which is chi-square distributed with 2 degrees of freedom under the null
//! hypothesis of normality.

use super::{
    check_sample, dist_err, tail_pvalue, upper_tail, Alternative, Result, TestStatistic,
};
use statrs::distribution::{ChiSquared, Normal};

/// Smallest sample the skewness test is valid for
pub const MIN_NORMALTEST_SIZE: usize = 8;

/// Biased central moments m2, m3, m4
fn central_moments(x: &[f64]) -> (f64, f64, f64) {
    let n = x.len() as f64;
    let m = super::mean(x);
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in x {
        let d = v - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

/// Test whether the skewness differs from that of a normal distribution
///
/// Two-sided. Needs at least [`MIN_NORMALTEST_SIZE`] observations.
pub fn skewtest(x: &[f64]) -> Result<TestStatistic> {
    check_sample(x, MIN_NORMALTEST_SIZE)?;
    let n = x.len() as f64;
    let (m2, m3, _) = central_moments(x);
    let b2 = m3 / m2.powf(1.5);

    let mut y = b2 * (((n + 1.0) * (n + 3.0)) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = (3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0))
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    if y == 0.0 {
        y = 1.0;
    }
    let z = delta * (y / alpha).asinh();

    let normal = Normal::new(0.0, 1.0).map_err(dist_err)?;
    Ok(TestStatistic {
        statistic: z,
        pvalue: tail_pvalue(&normal, z, Alternative::TwoSided),
    })
}

/// Test whether the kurtosis differs from that of a normal distribution
///
/// Anscombe-Glynn transformation, two-sided.
pub fn kurtosistest(x: &[f64]) -> Result<TestStatistic> {
    check_sample(x, 5)?;
    let n = x.len() as f64;
    let (m2, _, m4) = central_moments(x);
    let b2 = m4 / (m2 * m2);

    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let varb2 = 24.0 * n * (n - 2.0) * (n - 3.0)
        / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let standardized = (b2 - expected) / varb2.sqrt();
    let sqrtbeta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * ((6.0 * (n + 3.0) * (n + 5.0)) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrtbeta1 * (2.0 / sqrtbeta1 + (1.0 + 4.0 / (sqrtbeta1 * sqrtbeta1)).sqrt());
    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + standardized * (2.0 / (a - 4.0)).sqrt();
    let term2 = if denom == 0.0 {
        f64::NAN
    } else {
        denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt()
    };
    let z = (term1 - term2) / (2.0 / (9.0 * a)).sqrt();

    let normal = Normal::new(0.0, 1.0).map_err(dist_err)?;
    Ok(TestStatistic {
        statistic: z,
        pvalue: tail_pvalue(&normal, z, Alternative::TwoSided),
    })
}

/// D'Agostino-Pearson K^2 normality test
///
/// A sample with fewer than [`MIN_NORMALTEST_SIZE`] observations cannot be
/// assessed; the result is then undefined (NaN) rather than an error, which
/// callers read as "normality not established".
pub fn normaltest(x: &[f64]) -> Result<TestStatistic> {
    check_sample(x, 1)?;
    if x.len() < MIN_NORMALTEST_SIZE {
        tracing::debug!(
            "normaltest needs at least {} observations, got {}",
            MIN_NORMALTEST_SIZE,
            x.len()
        );
        return Ok(TestStatistic::undefined());
    }

    let s = skewtest(x)?.statistic;
    let k = kurtosistest(x)?.statistic;
    let k2 = s * s + k * k;
    let chi2 = ChiSquared::new(2.0).map_err(dist_err)?;

    Ok(TestStatistic {
        statistic: k2,
        pvalue: upper_tail(&chi2, k2),
    })
}
