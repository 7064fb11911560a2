// Significance and speedup messages
//
// Each message is emitted as a tracing event and also returned, so callers
// without a subscriber can still print or store it.

/// Describe whether a speedup is significant at `confidence_percent`
///
/// # Example
/// ```
/// use speedup_stats::speedup::report_significance;
///
/// let message = report_significance(true, 0.001, 95.0);
/// assert_eq!(
///     message,
///     "Speedup is statistically significant with confidence level 95% (p-val. = 0.001)."
/// );
/// ```
pub fn report_significance(significant: bool, pvalue: f64, confidence_percent: f64) -> String {
    let qualifier = if significant { "" } else { "not " };
    let message = format!(
        "Speedup is {}statistically significant with confidence level {}% (p-val. = {}).",
        qualifier, confidence_percent, pvalue
    );
    tracing::info!(significant, pvalue, confidence_percent, "{}", message);
    message
}

/// Describe the estimated speedup fraction as a percentage
pub fn report_speedup(speedup: f64) -> String {
    let message = format!("Reported speedup = {}%", 100.0 * speedup);
    tracing::info!(speedup, "{}", message);
    message
}
