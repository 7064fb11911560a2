//! Confidence intervals for a single sample's mean or median

use super::{check_probability, check_sample, dist_err, mean, sem, sorted, Result};
use serde::Serialize;
use statrs::distribution::{Binomial, ContinuousCDF, DiscreteCDF, Normal, StudentsT};

/// Two-sided confidence interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Nominal coverage, e.g. 0.95
    pub level: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// `(lower, upper)` pair
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

/// Student-t interval for the mean with n - 1 degrees of freedom
pub fn t_interval(x: &[f64], level: f64) -> Result<ConfidenceInterval> {
    check_sample(x, 2)?;
    check_probability(level)?;

    let df = (x.len() - 1) as f64;
    let t = StudentsT::new(0.0, 1.0, df).map_err(dist_err)?;
    let critical = t.inverse_cdf(0.5 + level / 2.0);
    Ok(symmetric(mean(x), critical * sem(x), level))
}

/// Normal (asymptotic) interval for the mean
pub fn normal_interval(x: &[f64], level: f64) -> Result<ConfidenceInterval> {
    check_sample(x, 2)?;
    check_probability(level)?;

    let normal = Normal::new(0.0, 1.0).map_err(dist_err)?;
    let critical = normal.inverse_cdf(0.5 + level / 2.0);
    Ok(symmetric(mean(x), critical * sem(x), level))
}

fn symmetric(center: f64, half_width: f64, level: f64) -> ConfidenceInterval {
    ConfidenceInterval {
        lower: center - half_width,
        upper: center + half_width,
        level,
    }
}

/// Distribution-free median interval built from order statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderStatisticInterval {
    pub interval: ConfidenceInterval,
    /// 1-based rank of the lower bound in the sorted sample
    pub lower_rank: usize,
    /// 1-based rank of the upper bound in the sorted sample
    pub upper_rank: usize,
    /// Coverage actually guaranteed by the chosen ranks
    pub coverage: f64,
}

impl OrderStatisticInterval {
    /// Whether the guaranteed coverage reaches the requested level
    pub fn attains_level(&self) -> bool {
        self.coverage >= self.interval.level
    }
}

/// Confidence interval for the median from order statistics
///
/// The number of observations below the population median is
/// Binomial(n, 1/2), so `[x(j), x(n+1-j)]` covers the median with
/// probability `1 - 2 * P(B <= j - 1)`. The narrowest symmetric pair whose
/// coverage reaches `level` is chosen. When even `[x(1), x(n)]` falls short
/// (n <= 5 at 95%), that full range is returned and
/// [`OrderStatisticInterval::attains_level`] is false.
pub fn median_interval(x: &[f64], level: f64) -> Result<OrderStatisticInterval> {
    check_sample(x, 1)?;
    check_probability(level)?;

    let n = x.len();
    let data = sorted(x);
    let tail = (1.0 - level) / 2.0;
    let binomial = Binomial::new(0.5, n as u64).map_err(dist_err)?;

    let mut j = 0;
    for candidate in 1..=n.div_ceil(2) {
        if binomial.cdf((candidate - 1) as u64) <= tail {
            j = candidate;
        } else {
            break;
        }
    }

    let (lower_rank, coverage) = if j == 0 {
        (1, 1.0 - 2.0 * binomial.cdf(0))
    } else {
        (j, 1.0 - 2.0 * binomial.cdf((j - 1) as u64))
    };
    let upper_rank = n + 1 - lower_rank;

    Ok(OrderStatisticInterval {
        interval: ConfidenceInterval {
            lower: data[lower_rank - 1],
            upper: data[upper_rank - 1],
            level,
        },
        lower_rank,
        upper_rank,
        coverage,
    })
}
