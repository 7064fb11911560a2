//! Two-sample tests for equality of variances
//!
//! Bartlett's test is exact for normal data; Levene's test (centred on the
//! median, i.e. the Brown-Forsythe variant) stays reliable when the samples
//! are not normal.

use super::{check_sample, dist_err, median, upper_tail, variance, Result, TestStatistic};
use statrs::distribution::{ChiSquared, FisherSnedecor};

/// Bartlett's test for equal variances
pub fn bartlett(a: &[f64], b: &[f64]) -> Result<TestStatistic> {
    check_sample(a, 2)?;
    check_sample(b, 2)?;

    let groups = [a, b];
    let k = groups.len() as f64;
    let n_total: f64 = groups.iter().map(|g| g.len() as f64).sum();

    let pooled = groups
        .iter()
        .map(|g| (g.len() as f64 - 1.0) * variance(g))
        .sum::<f64>()
        / (n_total - k);
    let numer = (n_total - k) * pooled.ln()
        - groups
            .iter()
            .map(|g| (g.len() as f64 - 1.0) * variance(g).ln())
            .sum::<f64>();
    let denom = 1.0
        + (groups
            .iter()
            .map(|g| 1.0 / (g.len() as f64 - 1.0))
            .sum::<f64>()
            - 1.0 / (n_total - k))
            / (3.0 * (k - 1.0));
    let statistic = numer / denom;

    let chi2 = ChiSquared::new(k - 1.0).map_err(dist_err)?;
    Ok(TestStatistic {
        statistic,
        pvalue: upper_tail(&chi2, statistic),
    })
}

/// Levene's test for equal variances, centred on each sample's median
pub fn levene(a: &[f64], b: &[f64]) -> Result<TestStatistic> {
    check_sample(a, 2)?;
    check_sample(b, 2)?;

    let deviations: Vec<Vec<f64>> = [a, b]
        .iter()
        .map(|g| {
            let center = median(g);
            g.iter().map(|v| (v - center).abs()).collect()
        })
        .collect();

    let k = deviations.len() as f64;
    let n_total: f64 = deviations.iter().map(|z| z.len() as f64).sum();
    let group_means: Vec<f64> = deviations.iter().map(|z| super::mean(z)).collect();
    let grand_mean = deviations.iter().flatten().sum::<f64>() / n_total;

    let between: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.len() as f64 * (zm - grand_mean).powi(2))
        .sum();
    let within: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.iter().map(|v| (v - zm).powi(2)).sum::<f64>())
        .sum();
    let statistic = (n_total - k) / (k - 1.0) * between / within;

    let f = FisherSnedecor::new(k - 1.0, n_total - k).map_err(dist_err)?;
    Ok(TestStatistic {
        statistic,
        pvalue: upper_tail(&f, statistic),
    })
}
