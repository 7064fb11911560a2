// Test plan selection
//
// Pure decision functions mapping diagnostic verdicts to the tests and
// interval estimators an analysis runs. Kept apart from the numerics so the
// selection policy can be checked on its own.

use serde::Serialize;
use std::fmt;

/// Equal-variance test run before the mean location test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispersionTest {
    /// Bartlett's test, for normal samples
    Bartlett,
    /// Median-centred Levene test, robust to non-normality
    Levene,
}

/// Location test of the mean analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeanLocationTest {
    /// Student's t-test with pooled variance
    PooledT,
    /// Welch's t-test, variances not pooled
    WelchT,
}

/// Location test of the median analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianLocationTest {
    /// One-sided Mann-Whitney U test
    MannWhitney,
    /// Mood's median test, two-sided p-value halved
    Mood,
}

/// Interval estimator for each sample's mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeanInterval {
    /// BCa bootstrap
    Bootstrap,
    /// Student-t with n - 1 degrees of freedom
    StudentT,
    /// Normal approximation
    Normal,
}

/// Interval estimator for each sample's median
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianInterval {
    /// BCa bootstrap
    Bootstrap,
    /// Distribution-free order-statistic interval
    OrderStatistic,
}

/// Tests and estimators chosen for one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum TestPlan {
    Mean {
        /// `None` when the dispersion test was skipped
        dispersion: Option<DispersionTest>,
        location: MeanLocationTest,
        interval: MeanInterval,
    },
    Median {
        location: MedianLocationTest,
        interval: MedianInterval,
    },
}

/// Bartlett for a valid normal model, Levene otherwise, nothing when skipped
pub fn select_dispersion_test(model_valid: bool, skip: bool) -> Option<DispersionTest> {
    if skip {
        None
    } else if model_valid {
        Some(DispersionTest::Bartlett)
    } else {
        Some(DispersionTest::Levene)
    }
}

/// Pool variances only when they were judged equal
pub fn select_mean_location_test(equal_variance: bool) -> MeanLocationTest {
    if equal_variance {
        MeanLocationTest::PooledT
    } else {
        MeanLocationTest::WelchT
    }
}

pub fn select_mean_interval(model_valid: bool, bootstrap: bool) -> MeanInterval {
    if bootstrap {
        MeanInterval::Bootstrap
    } else if model_valid {
        MeanInterval::StudentT
    } else {
        MeanInterval::Normal
    }
}

/// Mann-Whitney needs the location-shift model; Mood's test does not
pub fn select_median_location_test(shift_valid: bool, force_mood: bool) -> MedianLocationTest {
    if shift_valid && !force_mood {
        MedianLocationTest::MannWhitney
    } else {
        MedianLocationTest::Mood
    }
}

pub fn select_median_interval(bootstrap: bool) -> MedianInterval {
    if bootstrap {
        MedianInterval::Bootstrap
    } else {
        MedianInterval::OrderStatistic
    }
}

impl fmt::Display for DispersionTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispersionTest::Bartlett => write!(f, "Bartlett"),
            DispersionTest::Levene => write!(f, "Levene"),
        }
    }
}

impl fmt::Display for MeanLocationTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeanLocationTest::PooledT => write!(f, "Student t-test (pooled variance)"),
            MeanLocationTest::WelchT => write!(f, "Welch t-test"),
        }
    }
}

impl fmt::Display for MedianLocationTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MedianLocationTest::MannWhitney => write!(f, "Mann-Whitney U"),
            MedianLocationTest::Mood => write!(f, "Mood's median test (halved p-value)"),
        }
    }
}

impl fmt::Display for MeanInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeanInterval::Bootstrap => write!(f, "BCa bootstrap"),
            MeanInterval::StudentT => write!(f, "Student t"),
            MeanInterval::Normal => write!(f, "normal approximation"),
        }
    }
}

impl fmt::Display for MedianInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MedianInterval::Bootstrap => write!(f, "BCa bootstrap"),
            MedianInterval::OrderStatistic => write!(f, "order statistics"),
        }
    }
}

impl fmt::Display for TestPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestPlan::Mean {
                dispersion,
                location,
                interval,
            } => {
                match dispersion {
                    Some(test) => write!(f, "{} dispersion check, ", test)?,
                    None => write!(f, "dispersion check skipped, ")?,
                }
                write!(f, "{}, {} intervals", location, interval)
            }
            TestPlan::Median { location, interval } => {
                write!(f, "{}, {} intervals", location, interval)
            }
        }
    }
}
