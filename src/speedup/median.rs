// Median-based speedup analysis
//
// Mann-Whitney U compares medians only under the location-shift model
// (both distributions identical up to a shift). The model is checked with a
// Kolmogorov-Smirnov test on median-centred samples; when it is rejected,
// or when Mood is forced, Mood's median test is used instead.

use super::outcome::{Caveat, Diagnostics, SampleRole, SpeedupOutcome};
use super::plan::{
    select_median_interval, select_median_location_test, MedianInterval, MedianLocationTest,
    TestPlan,
};
use super::report::{report_significance, report_speedup};
use super::{relative_speedup, validate_samples, SpeedupConfig};
use crate::hypothesis::{
    bootstrap_interval, ks_2samp, mann_whitney_u, median, median_interval, median_test,
    Alternative, BootstrapStatistic, ConfidenceInterval, MedianTestResult,
};
use anyhow::{anyhow, Context, Result};
use rand::Rng;

/// Test whether `t_opt` has a significantly lower median than `t_ref`
///
/// The speedup is `1 - median(t_opt) / median(t_ref)`. The p-value is the
/// one-sided Mann-Whitney p-value of "optimized < reference", or the
/// one-sided Mood's median test p-value: half the two-sided one when the
/// optimized sample falls below the grand median more often than expected,
/// its complement otherwise.
///
/// # Errors
///
/// Fails on an invalid configuration, on samples with fewer than two
/// observations or non-finite values, on a zero reference median, and when
/// Mood's test meets a degenerate table (every value on one side of the
/// grand median, as with two identical constant samples).
pub fn median_speedup_test(
    t_ref: &[f64],
    t_opt: &[f64],
    config: &SpeedupConfig,
) -> Result<SpeedupOutcome> {
    config.validate().map_err(|e| anyhow!(e))?;
    validate_samples(t_ref, t_opt)?;

    let alpha = config.significance_level;
    let reference_center = median(t_ref);
    let optimized_center = median(t_opt);
    let speedup = relative_speedup(reference_center, optimized_center, "median")?;
    let mut caveats = Vec::new();

    // Step 1: location-shift hypothesis on centred samples
    let centred_ref: Vec<f64> = t_ref.iter().map(|t| t - reference_center).collect();
    let centred_opt: Vec<f64> = t_opt.iter().map(|t| t - optimized_center).collect();
    let shift = ks_2samp(&centred_ref, &centred_opt)
        .context("Failed to test the location shift hypothesis")?;
    let shift_valid = shift.pvalue > alpha;
    if !shift_valid {
        let caveat = Caveat::LocationShiftRejected {
            pvalue: shift.pvalue,
            alpha,
        };
        tracing::warn!("{}", caveat);
        caveats.push(caveat);
    }

    // Step 2: one-sided location test
    let location = select_median_location_test(shift_valid, config.force_mood);
    let pvalue = match location {
        MedianLocationTest::MannWhitney => {
            mann_whitney_u(t_opt, t_ref, Alternative::Less)
                .context("Failed to run the Mann-Whitney U test")?
                .pvalue
        }
        MedianLocationTest::Mood => {
            let mood = median_test(t_opt, t_ref).context("Failed to run Mood's median test")?;
            tracing::debug!(
                grand_median = mood.grand_median,
                two_sided_pvalue = mood.pvalue,
                "Mood's median test"
            );
            mood_less_pvalue(&mood)
        }
    };
    let significant = pvalue < alpha;
    report_significance(significant, pvalue, config.confidence_percent());

    // Step 3: intervals for both medians
    let interval = select_median_interval(config.bootstrap_ci);
    let mut rng = config.bootstrap.rng();
    let reference_ci = median_ci(
        t_ref,
        SampleRole::Reference,
        interval,
        config,
        &mut rng,
        &mut caveats,
    )?;
    let optimized_ci = median_ci(
        t_opt,
        SampleRole::Optimized,
        interval,
        config,
        &mut rng,
        &mut caveats,
    )?;

    report_speedup(speedup);

    Ok(SpeedupOutcome {
        speedup,
        significant,
        pvalue,
        reference_ci,
        optimized_ci,
        reference_center,
        optimized_center,
        significance_level: alpha,
        plan: TestPlan::Median { location, interval },
        diagnostics: Diagnostics::Median {
            shift_pvalue: shift.pvalue,
        },
        caveats,
    })
}

fn median_ci<R: Rng + ?Sized>(
    x: &[f64],
    sample: SampleRole,
    method: MedianInterval,
    config: &SpeedupConfig,
    rng: &mut R,
    caveats: &mut Vec<Caveat>,
) -> Result<ConfidenceInterval> {
    let level = config.confidence_level();
    match method {
        MedianInterval::Bootstrap => bootstrap_interval(
            x,
            BootstrapStatistic::Median,
            level,
            config.bootstrap.resamples,
            rng,
        )
        .with_context(|| format!("Failed to bootstrap the {} median", sample)),
        MedianInterval::OrderStatistic => {
            let order = median_interval(x, level)
                .with_context(|| format!("Failed to compute the {} median interval", sample))?;
            if !order.attains_level() {
                let caveat = Caveat::MedianCoverageUnattainable {
                    sample,
                    size: x.len(),
                    coverage: order.coverage,
                    level,
                };
                tracing::warn!("{}", caveat);
                caveats.push(caveat);
            }
            Ok(order.interval)
        }
    }
}

/// One-sided p-value of "first sample below second" from a two-sided Mood test
///
/// Column 0 of the table is the first sample. It points below when fewer of
/// its values lie above the grand median than the margins predict.
fn mood_less_pvalue(mood: &MedianTestResult) -> f64 {
    let [[above_first, above_second], [below_first, below_second]] = mood.table;
    let first = (above_first + below_first) as f64;
    let total = first + (above_second + below_second) as f64;
    let expected_above = (above_first + above_second) as f64 * first / total;
    if (above_first as f64) < expected_above {
        mood.pvalue / 2.0
    } else {
        1.0 - mood.pvalue / 2.0
    }
}
