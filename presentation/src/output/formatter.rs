//! Output formatter trait

use harness_application::SuiteReport;

/// Trait for formatting suite reports
pub trait OutputFormatter {
    /// Every test case, asset and agent
    fn format_full(&self, report: &SuiteReport) -> String;

    /// Per-case counts, totals and agent statistics
    fn format_summary(&self, report: &SuiteReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &SuiteReport) -> String;

    /// Dispatch on the configured format
    fn render(&self, report: &SuiteReport, format: harness_domain::OutputFormat) -> String {
        match format {
            harness_domain::OutputFormat::Full => self.format_full(report),
            harness_domain::OutputFormat::Summary => self.format_summary(report),
            harness_domain::OutputFormat::Json => self.format_json(report),
        }
    }
}
