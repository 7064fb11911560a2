//! Statistical primitives for two-sample benchmark comparisons
//!
//! Hypothesis tests and interval estimators built on `statrs` distributions.
//! Every test returns a statistic and a p-value. Degenerate inputs (zero
//! variance, a diagnostic that needs more observations than it was given)
//! yield a NaN p-value instead of an error, so `pvalue < alpha` and
//! `pvalue > alpha` are both false for them.

mod bootstrap;
mod contingency;
mod dispersion;
mod intervals;
mod location;
mod normality;
mod shape;

pub use bootstrap::{
    bootstrap_interval, BootstrapConfig, BootstrapStatistic, DEFAULT_BOOTSTRAP_RESAMPLES,
};
pub use contingency::{median_test, MedianTestResult};
pub use dispersion::{bartlett, levene};
pub use intervals::{
    median_interval, normal_interval, t_interval, ConfidenceInterval, OrderStatisticInterval,
};
pub use location::{mann_whitney_u, ttest_ind, TTestResult};
pub use normality::{kurtosistest, normaltest, skewtest, MIN_NORMALTEST_SIZE};
pub use shape::ks_2samp;

use serde::Serialize;
use statrs::distribution::ContinuousCDF;
use thiserror::Error;

/// Errors raised by the statistical primitives
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HypothesisError {
    #[error("Not enough observations: got {got}, need at least {min}")]
    InsufficientData { got: usize, min: usize },

    #[error("Sample contains a non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    #[error("Invalid probability: {0} (must be strictly between 0 and 1)")]
    InvalidProbability(f64),

    #[error("Degenerate contingency table: {0}")]
    DegenerateContingency(String),

    #[error("Distribution error: {0}")]
    Distribution(String),
}

pub type Result<T> = std::result::Result<T, HypothesisError>;

/// Alternative hypothesis for a two-sample test on `(x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alternative {
    /// `x` and `y` differ in location
    TwoSided,
    /// `x` is located below `y`
    Less,
    /// `x` is located above `y`
    Greater,
}

/// Statistic and p-value of a hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestStatistic {
    pub statistic: f64,
    pub pvalue: f64,
}

impl TestStatistic {
    pub(crate) fn undefined() -> Self {
        Self {
            statistic: f64::NAN,
            pvalue: f64::NAN,
        }
    }
}

/// Arithmetic mean (NaN for an empty sample)
pub fn mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// Unbiased sample variance (n - 1 denominator)
pub fn variance(x: &[f64]) -> f64 {
    if x.len() < 2 {
        return f64::NAN;
    }
    let m = mean(x);
    x.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (x.len() - 1) as f64
}

/// Standard error of the mean
pub fn sem(x: &[f64]) -> f64 {
    (variance(x) / x.len() as f64).sqrt()
}

/// Median, averaging the two middle values for even-length samples
pub fn median(x: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    median_of_sorted(&sorted(x))
}

pub(crate) fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

pub(crate) fn sorted(x: &[f64]) -> Vec<f64> {
    let mut v = x.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Reject samples that are too small or contain NaN/infinite values
pub(crate) fn check_sample(x: &[f64], min: usize) -> Result<()> {
    if x.len() < min {
        return Err(HypothesisError::InsufficientData {
            got: x.len(),
            min,
        });
    }
    if let Some(index) = x.iter().position(|v| !v.is_finite()) {
        return Err(HypothesisError::NonFiniteValue { index });
    }
    Ok(())
}

pub(crate) fn check_probability(p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(HypothesisError::InvalidProbability(p))
    }
}

pub(crate) fn dist_err<E: std::fmt::Display>(e: E) -> HypothesisError {
    HypothesisError::Distribution(e.to_string())
}

/// Lower tail probability with infinities and NaN resolved up front
pub(crate) fn lower_tail<D: ContinuousCDF<f64, f64>>(dist: &D, x: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else if x == f64::INFINITY {
        1.0
    } else if x == f64::NEG_INFINITY {
        0.0
    } else {
        dist.cdf(x)
    }
}

/// Upper tail probability with infinities and NaN resolved up front
pub(crate) fn upper_tail<D: ContinuousCDF<f64, f64>>(dist: &D, x: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else if x == f64::INFINITY {
        0.0
    } else if x == f64::NEG_INFINITY {
        1.0
    } else {
        dist.sf(x)
    }
}

/// p-value of a statistic with a symmetric null distribution
pub(crate) fn tail_pvalue<D: ContinuousCDF<f64, f64>>(
    dist: &D,
    statistic: f64,
    alternative: Alternative,
) -> f64 {
    match alternative {
        Alternative::Less => lower_tail(dist, statistic),
        Alternative::Greater => upper_tail(dist, statistic),
        Alternative::TwoSided => clamp_pvalue(2.0 * upper_tail(dist, statistic.abs())),
    }
}

/// Clip to [0, 1], keeping NaN (f64::min would swallow it)
pub(crate) fn clamp_pvalue(p: f64) -> f64 {
    if p.is_nan() {
        p
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Average ranks (1-based) of `values` plus the tie term `sum(t^3 - t)`
pub(crate) fn rank_with_ties(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // positions i..j share ranks i+1..=j
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg_rank;
        }
        let t = (j - i) as f64;
        tie_term += t * t * t - t;
        i = j;
    }

    (ranks, tie_term)
}
