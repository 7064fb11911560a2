// Configuration for speedup significance testing
//
// One significance level drives both the rejection threshold of every
// hypothesis test and the coverage (1 - alpha) of the reported intervals.

use crate::hypothesis::BootstrapConfig;
use serde::{Deserialize, Serialize};

/// Configuration shared by the mean and median speedup analyses
///
/// # Example
/// ```
/// use speedup_stats::speedup::SpeedupConfig;
///
/// let config = SpeedupConfig::default();
/// assert_eq!(config.significance_level, 0.05); // 95% confidence
/// assert_eq!(config.confidence_percent(), 95.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedupConfig {
    /// Significance level (alpha) of every test, strictly between 0 and 1
    ///
    /// - 0.05 (default): 95% confidence intervals
    /// - 0.01: stricter, fewer false speedups
    /// - 0.10: looser, catches smaller speedups on noisy machines
    pub significance_level: f64,

    /// Skip the equal-variance check in the mean analysis
    ///
    /// Variances are then assumed unequal and Welch's t-test is used.
    pub skip_dispersion_test: bool,

    /// Always use Mood's median test in the median analysis, even when the
    /// location-shift hypothesis holds
    pub force_mood: bool,

    /// Report bootstrap intervals instead of parametric/order-statistic ones
    pub bootstrap_ci: bool,

    /// Resampling settings, used when `bootstrap_ci` is set
    pub bootstrap: BootstrapConfig,
}

impl Default for SpeedupConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            skip_dispersion_test: false,
            force_mood: false,
            bootstrap_ci: false,
            bootstrap: BootstrapConfig::default(),
        }
    }
}

impl SpeedupConfig {
    /// 99% confidence: fewer false speedups, more missed ones
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            ..Self::default()
        }
    }

    /// 90% confidence: flags smaller speedups at the cost of false positives
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            ..Self::default()
        }
    }

    /// Same configuration with bootstrap intervals from a fixed seed
    pub fn with_bootstrap(mut self, resamples: usize, seed: u64) -> Self {
        self.bootstrap_ci = true;
        self.bootstrap = BootstrapConfig {
            resamples,
            seed: Some(seed),
        };
        self
    }

    /// Interval coverage as a fraction, `1 - alpha`
    pub fn confidence_level(&self) -> f64 {
        1.0 - self.significance_level
    }

    /// Interval coverage as a percentage, `100 * (1 - alpha)`
    pub fn confidence_percent(&self) -> f64 {
        100.0 * (1.0 - self.significance_level)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            ));
        }

        if self.bootstrap_ci && self.bootstrap.resamples == 0 {
            return Err("bootstrap.resamples must be > 0 when bootstrap_ci is set".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpeedupConfig::default();
        assert_eq!(config.significance_level, 0.05);
        assert!(!config.skip_dispersion_test);
        assert!(!config.force_mood);
        assert!(!config.bootstrap_ci);
        assert_eq!(config.bootstrap.resamples, 9_999);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_config() {
        let config = SpeedupConfig::strict();
        assert_eq!(config.significance_level, 0.01);
        assert!((config.confidence_percent() - 99.0).abs() < 1e-9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_permissive_config() {
        let config = SpeedupConfig::permissive();
        assert_eq!(config.significance_level, 0.10);
        assert!((config.confidence_level() - 0.9).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_bootstrap() {
        let config = SpeedupConfig::default().with_bootstrap(500, 3);
        assert!(config.bootstrap_ci);
        assert_eq!(config.bootstrap.resamples, 500);
        assert_eq!(config.bootstrap.seed, Some(3));
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_significance_level() {
        let mut config = SpeedupConfig::default();
        config.significance_level = 1.5;
        assert!(config.validate().is_err());

        config.significance_level = 0.0;
        assert!(config.validate().is_err());

        config.significance_level = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_bootstrap_resamples() {
        let config = SpeedupConfig::default().with_bootstrap(0, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = SpeedupConfig::strict().with_bootstrap(1000, 9);
        let json = serde_json::to_string(&config).unwrap();
        let back: SpeedupConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
