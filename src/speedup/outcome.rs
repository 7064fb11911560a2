// Speedup outcome and caveats
//
// An outcome bundles the speedup estimate, the significance verdict, both
// confidence intervals, the test plan that produced them, and any
// model-validity caveats raised along the way.

use crate::hypothesis::ConfidenceInterval;
use crate::speedup::plan::{DispersionTest, TestPlan};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;

/// Which of the two compared samples a caveat refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleRole {
    Reference,
    Optimized,
}

impl fmt::Display for SampleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleRole::Reference => write!(f, "reference"),
            SampleRole::Optimized => write!(f, "optimized"),
        }
    }
}

/// Non-fatal warning: the analysis ran, but its confidence level may be off
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Caveat {
    /// At least one sample failed (or could not be given) the normality test
    NonNormalSamples {
        reference_pvalue: f64,
        optimized_pvalue: f64,
        alpha: f64,
    },
    /// Centred samples do not share a distribution shape
    LocationShiftRejected { pvalue: f64, alpha: f64 },
    /// Too few observations for a distribution-free median interval at the
    /// requested level; the full sample range is reported instead
    MedianCoverageUnattainable {
        sample: SampleRole,
        size: usize,
        coverage: f64,
        level: f64,
    },
}

impl fmt::Display for Caveat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caveat::NonNormalSamples {
                reference_pvalue,
                optimized_pvalue,
                alpha,
            } => write!(
                f,
                "Samples are not normally distributed (ref. p-val. = {}, opt. p-val. = {}, \
                 risk level = {}). The confidence level ({}%) might be incorrect; \
                 larger samples are recommended.",
                reference_pvalue,
                optimized_pvalue,
                alpha,
                100.0 * (1.0 - alpha)
            ),
            Caveat::LocationShiftRejected { pvalue, alpha } => write!(
                f,
                "Samples do not satisfy the location shift hypothesis (p-val. = {}, \
                 risk level = {}). The confidence level ({}%) might be incorrect.",
                pvalue,
                alpha,
                100.0 * (1.0 - alpha)
            ),
            Caveat::MedianCoverageUnattainable {
                sample,
                size,
                coverage,
                level,
            } => write!(
                f,
                "The {} sample has {} observations, too few for a {}% median interval; \
                 its full range covers only {:.1}%.",
                sample,
                size,
                100.0 * level,
                100.0 * coverage
            ),
        }
    }
}

/// Outcome of the equal-variance check
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DispersionCheck {
    pub test: DispersionTest,
    pub pvalue: f64,
    pub equal_variance: bool,
}

/// Diagnostic p-values behind the plan selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "analysis", rename_all = "snake_case")]
pub enum Diagnostics {
    Mean {
        reference_normality_pvalue: f64,
        optimized_normality_pvalue: f64,
        dispersion: Option<DispersionCheck>,
    },
    Median {
        shift_pvalue: f64,
    },
}

/// Result of a speedup significance test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedupOutcome {
    /// `1 - center(optimized) / center(reference)`
    pub speedup: f64,
    /// Whether the p-value is below the significance level
    pub significant: bool,
    /// One-sided p-value of the location test
    pub pvalue: f64,
    /// Interval for the reference sample's mean or median
    pub reference_ci: ConfidenceInterval,
    /// Interval for the optimized sample's mean or median
    pub optimized_ci: ConfidenceInterval,
    /// Mean or median of the reference sample
    pub reference_center: f64,
    /// Mean or median of the optimized sample
    pub optimized_center: f64,
    pub significance_level: f64,
    pub plan: TestPlan,
    pub diagnostics: Diagnostics,
    pub caveats: Vec<Caveat>,
}

impl SpeedupOutcome {
    /// Speedup in percent
    pub fn speedup_percent(&self) -> f64 {
        100.0 * self.speedup
    }

    pub fn confidence_percent(&self) -> f64 {
        100.0 * (1.0 - self.significance_level)
    }

    /// True when no caveat questions the test's assumptions
    pub fn model_valid(&self) -> bool {
        !self.caveats.iter().any(|c| {
            matches!(
                c,
                Caveat::NonNormalSamples { .. } | Caveat::LocationShiftRejected { .. }
            )
        })
    }

    /// `(speedup, significant, pvalue, reference_ci, optimized_ci)`
    #[allow(clippy::type_complexity)]
    pub fn as_tuple(&self) -> (f64, bool, f64, (f64, f64), (f64, f64)) {
        (
            self.speedup,
            self.significant,
            self.pvalue,
            self.reference_ci.bounds(),
            self.optimized_ci.bounds(),
        )
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize speedup outcome")
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        let statistic = match self.plan {
            TestPlan::Mean { .. } => "mean",
            TestPlan::Median { .. } => "median",
        };

        if self.significant {
            report.push_str("✅ SIGNIFICANT SPEEDUP\n\n");
        } else {
            report.push_str("➖ NO SIGNIFICANT SPEEDUP\n\n");
        }

        report.push_str(&format!(
            "Speedup ({}): {:.2}%\n",
            statistic,
            self.speedup_percent()
        ));
        report.push_str(&format!(
            "p-value: {} (significance level {}, {}% confidence)\n",
            self.pvalue,
            self.significance_level,
            self.confidence_percent()
        ));
        report.push_str(&format!("Plan: {}\n", self.plan));

        report.push_str("\n📊 Confidence intervals:\n");
        report.push_str(&format!(
            "  reference {} = {:.4} [{:.4}, {:.4}]\n",
            statistic, self.reference_center, self.reference_ci.lower, self.reference_ci.upper
        ));
        report.push_str(&format!(
            "  optimized {} = {:.4} [{:.4}, {:.4}]\n",
            statistic, self.optimized_center, self.optimized_ci.lower, self.optimized_ci.upper
        ));

        if let Diagnostics::Mean {
            dispersion: Some(check),
            ..
        } = self.diagnostics
        {
            report.push_str(&format!(
                "\nVariances {} ({} p={:.4})\n",
                if check.equal_variance {
                    "equal"
                } else {
                    "unequal"
                },
                check.test,
                check.pvalue
            ));
        }

        if !self.caveats.is_empty() {
            report.push_str(&format!("\n⚠️  Caveats ({}):\n", self.caveats.len()));
            for caveat in &self.caveats {
                report.push_str(&format!("  - {}\n", caveat));
            }
        }

        report
    }
}
