// Speedup Significance Testing
//
// Decides whether an optimized program is significantly faster than a
// reference one, from two independent samples of execution times. Fixed
// percentage thresholds ignore run-to-run noise; instead each analysis
// checks the assumptions of its location test first and picks the test
// (and the interval estimator) those assumptions support.
//
// Two analyses:
// - Mean: normality (D'Agostino-Pearson), then equal variances (Bartlett or
//   Levene), then a one-sided Student or Welch t-test.
// - Median: location-shift check (two-sample Kolmogorov-Smirnov on centred
//   samples), then a one-sided Mann-Whitney U test or Mood's median test.
//
// References:
// [1] Le Boudec, J.-Y. (2010). Performance Evaluation of Computer and
//     Communication Systems. EPFL Press. Order-statistic median intervals.
// [2] Efron, B. (1987). Better bootstrap confidence intervals. JASA 82(397).

mod config;
mod mean;
mod median;
mod outcome;
mod plan;
mod report;

pub use config::SpeedupConfig;
pub use mean::mean_speedup_test;
pub use median::median_speedup_test;
pub use outcome::{Caveat, Diagnostics, DispersionCheck, SampleRole, SpeedupOutcome};
pub use plan::{
    select_dispersion_test, select_mean_interval, select_mean_location_test,
    select_median_interval, select_median_location_test, DispersionTest, MeanInterval,
    MeanLocationTest, MedianInterval, MedianLocationTest, TestPlan,
};
pub use report::{report_significance, report_speedup};

use crate::hypothesis::check_sample;
use anyhow::{bail, Context, Result};

/// Both samples need two finite observations
pub(crate) fn validate_samples(t_ref: &[f64], t_opt: &[f64]) -> Result<()> {
    check_sample(t_ref, 2).context("Invalid reference sample")?;
    check_sample(t_opt, 2).context("Invalid optimized sample")?;
    Ok(())
}

/// `1 - optimized / reference`, undefined for a zero reference
pub(crate) fn relative_speedup(reference: f64, optimized: f64, statistic: &str) -> Result<f64> {
    if reference == 0.0 {
        bail!(
            "Reference {} is zero, speedup is undefined (optimized {} = {})",
            statistic,
            statistic,
            optimized
        );
    }
    Ok(1.0 - optimized / reference)
}
