//! Integration tests for the public speedup API
//!
//! Runs both analyses end to end the way a benchmark harness would: two
//! vectors of wall-clock times in, an outcome with a verdict out.

use speedup_stats::hypothesis::{ks_2samp, median, normaltest};
use speedup_stats::speedup::{
    mean_speedup_test, median_speedup_test, Caveat, MeanInterval, MedianInterval, SpeedupConfig,
    TestPlan,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_test_writer()
        .try_init();
}

/// Simulated timings: deterministic jitter around a base runtime
fn timings(base: f64, jitter: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| base + jitter * (((i * 7919) % 13) as f64 - 6.0) / 6.0)
        .collect()
}

#[test]
fn test_both_analyses_agree_on_clear_speedup() {
    init_tracing();
    let t_ref = timings(2.0, 0.05, 40);
    let t_opt = timings(1.5, 0.05, 40);
    let config = SpeedupConfig::default();

    let by_mean = mean_speedup_test(&t_ref, &t_opt, &config).unwrap();
    let by_median = median_speedup_test(&t_ref, &t_opt, &config).unwrap();

    assert!(by_mean.significant);
    assert!(by_median.significant);
    assert!((by_mean.speedup - 0.25).abs() < 0.01);
    assert!((by_median.speedup - 0.25).abs() < 0.01);
}

#[test]
fn test_no_change_is_not_significant() {
    init_tracing();
    let t_ref = timings(1.0, 0.1, 25);
    let t_opt: Vec<f64> = t_ref.iter().rev().copied().collect();
    let config = SpeedupConfig::default();

    let by_mean = mean_speedup_test(&t_ref, &t_opt, &config).unwrap();
    let by_median = median_speedup_test(&t_ref, &t_opt, &config).unwrap();

    assert!(!by_mean.significant);
    assert!(!by_median.significant);
    assert!(by_mean.speedup.abs() < 1e-12);
    assert_eq!(by_median.speedup, 0.0);
}

#[test]
fn test_outcome_tuple_matches_fields() {
    let t_ref = [10.0, 11.0, 9.0, 10.0, 10.0];
    let t_opt = [5.0, 6.0, 4.0, 5.0, 5.0];
    let outcome = mean_speedup_test(&t_ref, &t_opt, &SpeedupConfig::default()).unwrap();

    let (speedup, significant, pvalue, reference, optimized) = outcome.as_tuple();
    assert_eq!(speedup, outcome.speedup);
    assert_eq!(significant, outcome.significant);
    assert_eq!(pvalue, outcome.pvalue);
    assert!(reference.0 <= reference.1);
    assert!(optimized.0 <= optimized.1);
}

#[test]
fn test_median_diagnostics_match_primitives() {
    let t_ref = timings(3.0, 0.2, 15);
    let t_opt = timings(2.0, 0.2, 15);
    let outcome = median_speedup_test(&t_ref, &t_opt, &SpeedupConfig::default()).unwrap();

    let centre = |x: &[f64]| {
        let m = median(x);
        x.iter().map(|v| v - m).collect::<Vec<_>>()
    };
    let shift = ks_2samp(&centre(&t_ref), &centre(&t_opt)).unwrap();
    assert_eq!(
        outcome.diagnostics,
        speedup_stats::speedup::Diagnostics::Median {
            shift_pvalue: shift.pvalue
        }
    );
}

#[test]
fn test_small_samples_carry_caveats() {
    init_tracing();
    let t_ref = [1.00, 1.02, 0.98, 1.01];
    let t_opt = [0.80, 0.82, 0.79, 0.81];
    let config = SpeedupConfig::default();

    assert!(normaltest(&t_ref).unwrap().pvalue.is_nan());

    let by_mean = mean_speedup_test(&t_ref, &t_opt, &config).unwrap();
    assert!(by_mean
        .caveats
        .iter()
        .any(|c| matches!(c, Caveat::NonNormalSamples { .. })));

    let by_median = median_speedup_test(&t_ref, &t_opt, &config).unwrap();
    assert!(by_median
        .caveats
        .iter()
        .any(|c| matches!(c, Caveat::MedianCoverageUnattainable { size: 4, .. })));
    assert!(matches!(
        by_median.plan,
        TestPlan::Median {
            interval: MedianInterval::OrderStatistic,
            ..
        }
    ));
    assert!(by_median.to_report_string().contains("Caveats (2)"));
}

#[test]
fn test_config_loaded_from_json() {
    let json = r#"{
        "significance_level": 0.01,
        "skip_dispersion_test": true,
        "force_mood": false,
        "bootstrap_ci": true,
        "bootstrap": { "resamples": 500, "seed": 11 }
    }"#;
    let config: SpeedupConfig = serde_json::from_str(json).unwrap();
    assert!(config.validate().is_ok());

    let t_ref = timings(2.0, 0.05, 20);
    let t_opt = timings(1.0, 0.05, 20);
    let first = mean_speedup_test(&t_ref, &t_opt, &config).unwrap();
    let second = mean_speedup_test(&t_ref, &t_opt, &config).unwrap();

    assert!(matches!(
        first.plan,
        TestPlan::Mean {
            dispersion: None,
            interval: MeanInterval::Bootstrap,
            ..
        }
    ));
    assert_eq!(first.reference_ci, second.reference_ci);
    assert!((first.confidence_percent() - 99.0).abs() < 1e-9);
}
