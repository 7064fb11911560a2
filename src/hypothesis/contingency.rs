//! Mood's median test
//!
//! Builds a 2x2 contingency table counting, per sample, the observations
//! above and at-or-below the grand median of the pooled data, then applies
//! Pearson's chi-square test with Yates' continuity correction.

use super::{check_sample, dist_err, median, upper_tail, HypothesisError, Result};
use serde::Serialize;
use statrs::distribution::ChiSquared;

/// Result of Mood's median test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedianTestResult {
    /// Chi-square statistic (Yates-corrected)
    pub statistic: f64,
    /// Two-sided p-value
    pub pvalue: f64,
    /// Median of the pooled samples
    pub grand_median: f64,
    /// `table[0]` counts values above the grand median, `table[1]` the rest;
    /// columns follow the argument order
    pub table: [[usize; 2]; 2],
}

/// Mood's median test for two samples
pub fn median_test(a: &[f64], b: &[f64]) -> Result<MedianTestResult> {
    check_sample(a, 1)?;
    check_sample(b, 1)?;

    let pooled: Vec<f64> = a.iter().chain(b).copied().collect();
    let grand_median = median(&pooled);

    let above = |x: &[f64]| x.iter().filter(|&&v| v > grand_median).count();
    let (above_a, above_b) = (above(a), above(b));
    let table = [
        [above_a, above_b],
        [a.len() - above_a, b.len() - above_b],
    ];

    if table[0].iter().sum::<usize>() == 0 {
        return Err(HypothesisError::DegenerateContingency(format!(
            "no observation lies above the grand median {}",
            grand_median
        )));
    }
    if table[1].iter().sum::<usize>() == 0 {
        return Err(HypothesisError::DegenerateContingency(format!(
            "no observation lies at or below the grand median {}",
            grand_median
        )));
    }

    let total = pooled.len() as f64;
    let row_sums = [
        (table[0][0] + table[0][1]) as f64,
        (table[1][0] + table[1][1]) as f64,
    ];
    let col_sums = [a.len() as f64, b.len() as f64];

    let mut statistic = 0.0;
    for (r, row) in table.iter().enumerate() {
        for (c, &count) in row.iter().enumerate() {
            let expected = row_sums[r] * col_sums[c] / total;
            let observed = count as f64;
            let diff = expected - observed;
            let corrected = observed + diff.signum() * diff.abs().min(0.5);
            statistic += (corrected - expected).powi(2) / expected;
        }
    }

    let chi2 = ChiSquared::new(1.0).map_err(dist_err)?;
    Ok(MedianTestResult {
        statistic,
        pvalue: upper_tail(&chi2, statistic),
        grand_median,
        table,
    })
}
