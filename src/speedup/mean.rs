// Mean-based speedup analysis
//
// Normality gates the parametric machinery: Bartlett and Student-t
// intervals need normal samples, Levene and normal-approximation intervals
// are the fallbacks. A failed diagnostic is a caveat, never an error.

use super::outcome::{Caveat, Diagnostics, DispersionCheck, SpeedupOutcome};
use super::plan::{
    select_dispersion_test, select_mean_interval, select_mean_location_test, DispersionTest,
    MeanInterval, MeanLocationTest, TestPlan,
};
use super::report::{report_significance, report_speedup};
use super::{relative_speedup, validate_samples, SpeedupConfig};
use crate::hypothesis::{
    bartlett, bootstrap_interval, levene, mean, normal_interval, normaltest, t_interval,
    ttest_ind, Alternative, BootstrapStatistic, ConfidenceInterval,
};
use anyhow::{anyhow, Context, Result};
use rand::Rng;

/// Test whether `t_opt` has a significantly lower mean than `t_ref`
///
/// The speedup is `1 - mean(t_opt) / mean(t_ref)`, so 0.5 means the
/// optimized program takes half the time. The p-value comes from a
/// one-sided t-test of "optimized mean < reference mean"; pooled variance is
/// used only when the dispersion test accepts equal variances.
///
/// # Errors
///
/// Fails on an invalid configuration, on samples with fewer than two
/// observations or non-finite values, and on a zero reference mean.
///
/// # Example
/// ```
/// use speedup_stats::speedup::{mean_speedup_test, SpeedupConfig};
///
/// let t_ref = [10.0, 11.0, 9.0, 10.0, 10.0];
/// let t_opt = [5.0, 6.0, 4.0, 5.0, 5.0];
/// let outcome = mean_speedup_test(&t_ref, &t_opt, &SpeedupConfig::default()).unwrap();
///
/// assert!(outcome.significant);
/// assert!((outcome.speedup - 0.5).abs() < 1e-12);
/// ```
pub fn mean_speedup_test(
    t_ref: &[f64],
    t_opt: &[f64],
    config: &SpeedupConfig,
) -> Result<SpeedupOutcome> {
    config.validate().map_err(|e| anyhow!(e))?;
    validate_samples(t_ref, t_opt)?;

    let alpha = config.significance_level;
    let reference_center = mean(t_ref);
    let optimized_center = mean(t_opt);
    let speedup = relative_speedup(reference_center, optimized_center, "mean")?;
    let mut caveats = Vec::new();

    // Step 1: normality of both samples
    let reference_normality =
        normaltest(t_ref).context("Failed to test normality of the reference sample")?;
    let optimized_normality =
        normaltest(t_opt).context("Failed to test normality of the optimized sample")?;
    // NaN p-values (n < 8, constant samples) fail this comparison
    let model_valid = reference_normality.pvalue > alpha && optimized_normality.pvalue > alpha;
    if !model_valid {
        let caveat = Caveat::NonNormalSamples {
            reference_pvalue: reference_normality.pvalue,
            optimized_pvalue: optimized_normality.pvalue,
            alpha,
        };
        tracing::warn!("{}", caveat);
        caveats.push(caveat);
    }

    // Step 2: equal variances
    let dispersion = match select_dispersion_test(model_valid, config.skip_dispersion_test) {
        Some(test) => {
            let result = match test {
                DispersionTest::Bartlett => bartlett(t_opt, t_ref),
                DispersionTest::Levene => levene(t_opt, t_ref),
            }
            .with_context(|| format!("Failed to run the {} test", test))?;
            let equal_variance = result.pvalue > alpha;
            tracing::info!(
                test = %test,
                pvalue = result.pvalue,
                "Variances are {} according to the {} test",
                if equal_variance { "equal" } else { "not equal" },
                test
            );
            Some(DispersionCheck {
                test,
                pvalue: result.pvalue,
                equal_variance,
            })
        }
        None => {
            tracing::debug!("Dispersion test skipped, assuming unequal variances");
            None
        }
    };
    let equal_variance = dispersion.is_some_and(|check| check.equal_variance);

    // Step 3: one-sided location test
    let location = select_mean_location_test(equal_variance);
    let ttest = ttest_ind(
        t_opt,
        t_ref,
        location == MeanLocationTest::PooledT,
        Alternative::Less,
    )
    .with_context(|| format!("Failed to run the {}", location))?;
    let significant = ttest.pvalue < alpha;
    report_significance(significant, ttest.pvalue, config.confidence_percent());

    // Step 4: intervals for both means
    let interval = select_mean_interval(model_valid, config.bootstrap_ci);
    let level = config.confidence_level();
    let mut rng = config.bootstrap.rng();
    let reference_ci = mean_interval(t_ref, interval, level, config, &mut rng)
        .context("Failed to compute the reference mean interval")?;
    let optimized_ci = mean_interval(t_opt, interval, level, config, &mut rng)
        .context("Failed to compute the optimized mean interval")?;

    report_speedup(speedup);

    Ok(SpeedupOutcome {
        speedup,
        significant,
        pvalue: ttest.pvalue,
        reference_ci,
        optimized_ci,
        reference_center,
        optimized_center,
        significance_level: alpha,
        plan: TestPlan::Mean {
            dispersion: dispersion.map(|check| check.test),
            location,
            interval,
        },
        diagnostics: Diagnostics::Mean {
            reference_normality_pvalue: reference_normality.pvalue,
            optimized_normality_pvalue: optimized_normality.pvalue,
            dispersion,
        },
        caveats,
    })
}

fn mean_interval<R: Rng + ?Sized>(
    x: &[f64],
    method: MeanInterval,
    level: f64,
    config: &SpeedupConfig,
    rng: &mut R,
) -> Result<ConfidenceInterval> {
    let interval = match method {
        MeanInterval::Bootstrap => bootstrap_interval(
            x,
            BootstrapStatistic::Mean,
            level,
            config.bootstrap.resamples,
            rng,
        )?,
        MeanInterval::StudentT => t_interval(x, level)?,
        MeanInterval::Normal => normal_interval(x, level)?,
    };
    Ok(interval)
}
