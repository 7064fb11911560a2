//! Two-sample location tests: Student/Welch t-test and Mann-Whitney U

use super::{
    check_sample, clamp_pvalue, dist_err, mean, rank_with_ties, tail_pvalue, upper_tail,
    variance, Alternative, Result, TestStatistic,
};
use serde::Serialize;
use statrs::distribution::{Normal, StudentsT};

/// Largest smaller-sample size for which the exact U distribution is used
const MWU_EXACT_MAX_SIZE: usize = 8;

/// Result of an independent two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTestResult {
    /// t-statistic for `mean(a) - mean(b)`
    pub statistic: f64,
    /// p-value for the requested alternative
    pub pvalue: f64,
    /// Degrees of freedom (Welch-Satterthwaite when variances are not pooled)
    pub df: f64,
}

/// Independent two-sample t-test
///
/// With `equal_var` the variances are pooled (Student's test), otherwise the
/// Welch variant is used. `Alternative::Less` tests `mean(a) < mean(b)`.
pub fn ttest_ind(
    a: &[f64],
    b: &[f64],
    equal_var: bool,
    alternative: Alternative,
) -> Result<TTestResult> {
    check_sample(a, 2)?;
    check_sample(b, 2)?;

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let v1 = variance(a);
    let v2 = variance(b);

    let (df, denom) = if equal_var {
        let df = n1 + n2 - 2.0;
        let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
        (df, (pooled * (1.0 / n1 + 1.0 / n2)).sqrt())
    } else {
        let vn1 = v1 / n1;
        let vn2 = v2 / n2;
        let df = (vn1 + vn2).powi(2) / (vn1.powi(2) / (n1 - 1.0) + vn2.powi(2) / (n2 - 1.0));
        (df, (vn1 + vn2).sqrt())
    };
    let statistic = (mean(a) - mean(b)) / denom;

    let pvalue = if df.is_nan() || statistic.is_nan() {
        f64::NAN
    } else {
        let t = StudentsT::new(0.0, 1.0, df).map_err(dist_err)?;
        tail_pvalue(&t, statistic, alternative)
    };

    Ok(TTestResult {
        statistic,
        pvalue,
        df,
    })
}

/// Mann-Whitney U rank-sum test
///
/// The returned statistic is U for `x`. `Alternative::Less` tests whether `x`
/// is stochastically smaller than `y`. The exact null distribution is used
/// when the smaller sample has at most 8 observations and there are no ties;
/// otherwise the normal approximation with tie and continuity correction.
pub fn mann_whitney_u(x: &[f64], y: &[f64], alternative: Alternative) -> Result<TestStatistic> {
    check_sample(x, 1)?;
    check_sample(y, 1)?;

    let n1 = x.len();
    let n2 = y.len();
    let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
    let (ranks, tie_term) = rank_with_ties(&pooled);

    let r1: f64 = ranks[..n1].iter().sum();
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;

    let (u, factor) = match alternative {
        Alternative::Greater => (u1, 1.0),
        Alternative::Less => (u2, 1.0),
        Alternative::TwoSided => (u1.max(u2), 2.0),
    };

    let pvalue = if n1.min(n2) <= MWU_EXACT_MAX_SIZE && tie_term == 0.0 {
        exact_upper_tail(u, n1, n2)
    } else {
        let n = (n1 + n2) as f64;
        let mu = (n1 * n2) as f64 / 2.0;
        let s = ((n1 * n2) as f64 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0))))
            .max(0.0)
            .sqrt();
        let z = (u - mu - 0.5) / s;
        let normal = Normal::new(0.0, 1.0).map_err(dist_err)?;
        upper_tail(&normal, z)
    };

    Ok(TestStatistic {
        statistic: u1,
        pvalue: clamp_pvalue(pvalue * factor),
    })
}

/// P(U >= u) under the null hypothesis, by exact enumeration
fn exact_upper_tail(u: f64, n1: usize, n2: usize) -> f64 {
    let counts = rank_sum_null_counts(n1.min(n2), n1.max(n2));
    let total: f64 = counts.iter().sum();
    let start = u.ceil().max(0.0) as usize;
    counts.iter().skip(start).sum::<f64>() / total
}

/// Frequencies of U = 0..=m*n for samples of sizes m and n without ties
///
/// These are the coefficients of the Gaussian binomial [m+n choose m]_q,
/// built as the product over i of (1 - q^(n+i)) / (1 - q^i).
fn rank_sum_null_counts(m: usize, n: usize) -> Vec<f64> {
    let max_u = m * n;
    let mut c = vec![0.0; max_u + 1];
    c[0] = 1.0;
    for i in 1..=m {
        let shift = n + i;
        if shift <= max_u {
            for k in (shift..=max_u).rev() {
                c[k] -= c[k - shift];
            }
        }
        for k in i..=max_u {
            c[k] += c[k - i];
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttest_pooled_reference_example() {
        let opt = [5.0, 6.0, 4.0, 5.0, 5.0];
        let reference = [10.0, 11.0, 9.0, 10.0, 10.0];
        let result = ttest_ind(&opt, &reference, true, Alternative::Less).unwrap();

        // t = -5 / sqrt(0.5 * 0.4)
        assert!((result.statistic + 5.0 / 0.2_f64.sqrt()).abs() < 1e-9);
        assert_eq!(result.df, 8.0);
        assert!(result.pvalue < 1e-5);
    }

    #[test]
    fn test_ttest_welch_degrees_of_freedom() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
        let result = ttest_ind(&a, &b, false, Alternative::TwoSided).unwrap();

        let vn1 = variance(&a) / 4.0;
        let vn2 = variance(&b) / 6.0;
        let expected_df = (vn1 + vn2).powi(2) / (vn1.powi(2) / 3.0 + vn2.powi(2) / 5.0);
        assert!((result.df - expected_df).abs() < 1e-12);
        assert!(result.pvalue > 0.0 && result.pvalue < 1.0);
    }

    #[test]
    fn test_ttest_alternatives_are_complementary() {
        let a = [10.2, 9.8, 10.5, 10.1, 9.9];
        let b = [10.0, 10.3, 9.7, 10.4, 10.6];
        let less = ttest_ind(&a, &b, false, Alternative::Less).unwrap();
        let greater = ttest_ind(&a, &b, false, Alternative::Greater).unwrap();
        let two_sided = ttest_ind(&a, &b, false, Alternative::TwoSided).unwrap();

        assert!((less.pvalue + greater.pvalue - 1.0).abs() < 1e-9);
        assert!((two_sided.pvalue - 2.0 * less.pvalue.min(greater.pvalue)).abs() < 1e-9);
    }

    #[test]
    fn test_ttest_identical_constants_undefined() {
        let result = ttest_ind(&[10.0; 5], &[10.0; 5], false, Alternative::Less).unwrap();
        assert!(result.pvalue.is_nan());
    }

    #[test]
    fn test_mwu_exact_fully_separated() {
        // Only one of the C(6, 3) = 20 orderings is at least this extreme
        let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], Alternative::Less).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert!((result.pvalue - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_mwu_exact_two_sided_doubles() {
        let result =
            mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], Alternative::TwoSided).unwrap();
        assert!((result.pvalue - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_mwu_all_ties_not_significant() {
        let result = mann_whitney_u(&[10.0; 5], &[10.0; 5], Alternative::Less).unwrap();
        assert_eq!(result.statistic, 12.5);
        assert_eq!(result.pvalue, 1.0);
    }

    #[test]
    fn test_mwu_asymptotic_detects_shift() {
        let x: Vec<f64> = (0..30).map(|i| 50.0 + i as f64).collect();
        let y: Vec<f64> = (0..30).map(|i| 70.0 + i as f64).collect();
        let less = mann_whitney_u(&x, &y, Alternative::Less).unwrap();
        let greater = mann_whitney_u(&x, &y, Alternative::Greater).unwrap();
        assert!(less.pvalue < 0.001);
        assert!(greater.pvalue > 0.99);
    }

    #[test]
    fn test_null_counts_sum_to_binomial() {
        let counts = rank_sum_null_counts(3, 4);
        assert_eq!(counts.len(), 13);
        assert_eq!(counts.iter().sum::<f64>(), 35.0);
        // symmetric around m*n/2
        for k in 0..counts.len() {
            assert_eq!(counts[k], counts[counts.len() - 1 - k]);
        }
    }
}
