//! Property-based tests for the speedup analyses
//!
//! Random timing samples must never panic either analysis, and the reported
//! numbers must stay internally consistent.

use proptest::prelude::*;
use speedup_stats::hypothesis::{mean, median};
use speedup_stats::speedup::{mean_speedup_test, median_speedup_test, SpeedupConfig};

fn timing_sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.1f64..100.0, 2..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_mean_speedup_is_relative_difference(
        t_ref in timing_sample(),
        t_opt in timing_sample(),
    ) {
        let outcome = mean_speedup_test(&t_ref, &t_opt, &SpeedupConfig::default()).unwrap();
        let expected = 1.0 - mean(&t_opt) / mean(&t_ref);
        prop_assert!((outcome.speedup - expected).abs() < 1e-12);
        prop_assert!(outcome.reference_ci.lower <= outcome.reference_ci.upper);
        prop_assert!(outcome.optimized_ci.lower <= outcome.optimized_ci.upper);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_median_speedup_is_relative_difference(
        t_ref in timing_sample(),
        t_opt in timing_sample(),
    ) {
        let outcome = median_speedup_test(&t_ref, &t_opt, &SpeedupConfig::default()).unwrap();
        let expected = 1.0 - median(&t_opt) / median(&t_ref);
        prop_assert!((outcome.speedup - expected).abs() < 1e-12);
        prop_assert!(outcome.reference_ci.contains(outcome.reference_center));
        prop_assert!(outcome.optimized_ci.contains(outcome.optimized_center));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_significance_matches_pvalue(
        t_ref in timing_sample(),
        t_opt in timing_sample(),
    ) {
        let config = SpeedupConfig::default();
        for outcome in [
            mean_speedup_test(&t_ref, &t_opt, &config).unwrap(),
            median_speedup_test(&t_ref, &t_opt, &config).unwrap(),
        ] {
            prop_assert_eq!(outcome.significant, outcome.pvalue < config.significance_level);
            if !outcome.pvalue.is_nan() {
                prop_assert!((0.0..=1.0).contains(&outcome.pvalue));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_identical_samples_never_significant(t in timing_sample()) {
        let config = SpeedupConfig::default();
        let by_mean = mean_speedup_test(&t, &t, &config).unwrap();
        prop_assert!(!by_mean.significant);
        prop_assert_eq!(by_mean.speedup, 0.0);

        let by_median = median_speedup_test(&t, &t, &config).unwrap();
        prop_assert!(!by_median.significant);
        prop_assert_eq!(by_median.speedup, 0.0);
    }
}
