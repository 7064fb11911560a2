//! Bootstrap Resampling
//!
//! BCa (bias-corrected and accelerated) bootstrap confidence intervals for
//! the mean or the median of one sample.

use super::{check_probability, check_sample, dist_err, median, sorted, HypothesisError, Result};
use super::{mean, ConfidenceInterval};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Default number of bootstrap resamples
pub const DEFAULT_BOOTSTRAP_RESAMPLES: usize = 9_999;

/// Bootstrap configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of resamples drawn per sample (default: 9,999)
    pub resamples: usize,
    /// Seed for reproducible intervals; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: DEFAULT_BOOTSTRAP_RESAMPLES,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    /// Random number generator for one analysis run
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Statistic whose sampling distribution is bootstrapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapStatistic {
    Mean,
    Median,
}

impl BootstrapStatistic {
    fn apply(self, x: &[f64]) -> f64 {
        match self {
            BootstrapStatistic::Mean => mean(x),
            BootstrapStatistic::Median => median(x),
        }
    }

    /// Leave-one-out estimates used for the acceleration constant
    fn jackknife(self, x: &[f64]) -> Vec<f64> {
        let n = x.len();
        match self {
            BootstrapStatistic::Mean => {
                let total: f64 = x.iter().sum();
                x.iter().map(|v| (total - v) / (n - 1) as f64).collect()
            }
            BootstrapStatistic::Median => {
                // leave-one-out medians come out in sorted order, not input order
                let data = sorted(x);
                let m = n - 1;
                let kept = |dropped: usize, i: usize| {
                    if i < dropped {
                        data[i]
                    } else {
                        data[i + 1]
                    }
                };
                (0..n)
                    .map(|dropped| {
                        if m % 2 == 1 {
                            kept(dropped, m / 2)
                        } else {
                            (kept(dropped, m / 2 - 1) + kept(dropped, m / 2)) / 2.0
                        }
                    })
                    .collect()
            }
        }
    }
}

/// BCa bootstrap confidence interval of `statistic` over `x`
pub fn bootstrap_interval<R: Rng + ?Sized>(
    x: &[f64],
    statistic: BootstrapStatistic,
    level: f64,
    resamples: usize,
    rng: &mut R,
) -> Result<ConfidenceInterval> {
    check_sample(x, 2)?;
    check_probability(level)?;
    if resamples == 0 {
        return Err(HypothesisError::InsufficientData { got: 0, min: 1 });
    }

    let theta_hat = statistic.apply(x);
    if x.iter().all(|&v| v == x[0]) {
        return Ok(ConfidenceInterval {
            lower: theta_hat,
            upper: theta_hat,
            level,
        });
    }

    let n = x.len();
    let mut buffer = vec![0.0; n];
    let mut replicates: Vec<f64> = (0..resamples)
        .map(|_| {
            for slot in buffer.iter_mut() {
                *slot = x[rng.gen_range(0..n)];
            }
            statistic.apply(&buffer)
        })
        .collect();
    replicates.sort_by(f64::total_cmp);

    let normal = Normal::new(0.0, 1.0).map_err(dist_err)?;
    let b = resamples as f64;

    // Bias correction (z0)
    let below = replicates.iter().filter(|&&t| t < theta_hat).count() as f64;
    let z0 = normal.inverse_cdf((below / b).clamp(1.0 / (b + 1.0), b / (b + 1.0)));

    // Acceleration (a) via jackknife
    let jack = statistic.jackknife(x);
    let jack_mean = mean(&jack);
    let numerator: f64 = jack.iter().map(|t| (jack_mean - t).powi(3)).sum();
    let denominator: f64 = jack.iter().map(|t| (jack_mean - t).powi(2)).sum();
    let a = if denominator.abs() < 1e-12 {
        0.0
    } else {
        numerator / (6.0 * denominator.powf(1.5))
    };

    let tail = (1.0 - level) / 2.0;
    let adjusted = |z: f64| normal.cdf(z0 + (z0 + z) / (1.0 - a * (z0 + z)));
    let alpha1 = adjusted(normal.inverse_cdf(tail));
    let alpha2 = adjusted(normal.inverse_cdf(1.0 - tail));

    let pick = |p: f64| {
        let idx = (p * b).floor();
        let idx = if idx.is_nan() { 0 } else { idx as usize };
        replicates[idx.min(resamples - 1)]
    };
    let (mut lower, mut upper) = (pick(alpha1), pick(alpha2));
    // the BCa mapping is only monotone while 1 - a * (z0 + z) > 0
    if lower > upper {
        std::mem::swap(&mut lower, &mut upper);
    }

    Ok(ConfidenceInterval {
        lower,
        upper,
        level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_mean_interval_contains_estimate() {
        let samples: Vec<f64> = (0..100).map(|x| x as f64).collect();
        let ci = bootstrap_interval(
            &samples,
            BootstrapStatistic::Mean,
            0.95,
            2000,
            &mut seeded(7),
        )
        .unwrap();

        assert!(ci.lower < 49.5 && 49.5 < ci.upper);
        // sem is about 2.9, so the interval spans roughly +/- 5.7
        assert!(ci.width() > 5.0 && ci.width() < 20.0);
    }

    #[test]
    fn test_median_interval_ordered() {
        let samples = [12.0, 10.0, 11.0, 15.0, 9.0, 10.5, 13.0, 11.5, 10.2, 14.0];
        let ci = bootstrap_interval(
            &samples,
            BootstrapStatistic::Median,
            0.95,
            2000,
            &mut seeded(11),
        )
        .unwrap();

        assert!(ci.lower <= ci.upper);
        assert!(ci.lower >= 9.0 && ci.upper <= 15.0);
    }

    #[test]
    fn test_seed_makes_interval_reproducible() {
        let samples = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0, 3.0];
        let config = BootstrapConfig {
            resamples: 500,
            seed: Some(42),
        };
        let first =
            bootstrap_interval(&samples, BootstrapStatistic::Mean, 0.9, 500, &mut config.rng())
                .unwrap();
        let second =
            bootstrap_interval(&samples, BootstrapStatistic::Mean, 0.9, 500, &mut config.rng())
                .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_constant_sample_collapses() {
        let ci = bootstrap_interval(
            &[10.0; 5],
            BootstrapStatistic::Median,
            0.95,
            100,
            &mut seeded(1),
        )
        .unwrap();
        assert_eq!(ci.bounds(), (10.0, 10.0));
    }

    #[test]
    fn test_rejects_zero_resamples() {
        let result =
            bootstrap_interval(&[1.0, 2.0], BootstrapStatistic::Mean, 0.95, 0, &mut seeded(1));
        assert!(matches!(
            result,
            Err(HypothesisError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_jackknife_median_matches_leave_one_out() {
        for x in [
            vec![5.0, 1.0, 4.0, 2.0, 3.0],
            vec![7.0, 3.0, 3.0, 9.0, 1.0, 4.0],
            vec![2.0, 1.0],
        ] {
            let mut expected: Vec<f64> = (0..x.len())
                .map(|i| {
                    let mut rest = x.clone();
                    rest.remove(i);
                    median(&rest)
                })
                .collect();
            expected.sort_by(f64::total_cmp);

            let mut jack = BootstrapStatistic::Median.jackknife(&x);
            jack.sort_by(f64::total_cmp);
            assert_eq!(jack, expected, "sample {:?}", x);
        }
    }

    #[test]
    fn test_jackknife_mean_matches_definition() {
        let jack = BootstrapStatistic::Mean.jackknife(&[1.0, 2.0, 3.0]);
        assert_eq!(jack, vec![2.5, 2.0, 1.5]);
    }
}
