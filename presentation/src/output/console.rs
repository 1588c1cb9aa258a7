//! Console output formatter for suite reports

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use harness_application::SuiteReport;
use harness_domain::core::string::truncate;
use harness_domain::{AgentStatus, AssetStatus, PARENT_PK, StatusCounts, TestCaseReport};

/// Longest asset message shown in the full report.
const MAX_MESSAGE_LEN: usize = 200;

/// Formats suite reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Every test case, every asset, every agent
    pub fn format_full(report: &SuiteReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&report.suite));
        output.push('\n');
        output.push_str(&Self::run_info(report));

        for case in &report.test_cases {
            output.push_str(&Self::section_header(&Self::case_title(case)));
            for asset in &case.assets {
                let expected = asset
                    .expected_output
                    .map_or("Pathfinder", |bucket| bucket.as_str());
                output.push_str(&format!(
                    "\n{} {} ({})\n",
                    Self::asset_status(asset.status),
                    asset.label().bold(),
                    expected.dimmed()
                ));
                if let Some(message) = &asset.message {
                    output.push_str(&format!(
                        "    {}\n",
                        truncate(message, MAX_MESSAGE_LEN).yellow()
                    ));
                }
                for (agent, agent_report) in &asset.results {
                    let mut line = format!(
                        "    {:<24} {}",
                        agent,
                        Self::agent_status(agent_report.status, agent_report.tag())
                    );
                    if let Some(actual) = &agent_report.actual_output
                        && let Some(rank) = actual.rank
                    {
                        line.push_str(&format!("  rank {}", rank));
                        if let Some(score) = actual.score {
                            line.push_str(&format!(" score {:.4}", score));
                        }
                    }
                    if let Some(found) = &agent_report.expected_nodes_found {
                        line.push_str(&format!("  found {}", found));
                    }
                    output.push_str(&line);
                    output.push('\n');
                }
                if let Some(pk) = asset.pks.get(PARENT_PK) {
                    output.push_str(&format!("    {} {}\n", "parent pk:".dimmed(), pk));
                }
            }
        }

        output.push_str(&Self::section_header("Totals"));
        output.push_str(&Self::totals(&report.totals));
        output.push_str(&Self::footer());
        output
    }

    /// Per-case counts, totals and the agent statistics table
    pub fn format_summary(report: &SuiteReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            format!("=== {} ===", report.suite).cyan().bold()
        ));
        output.push_str(&Self::run_info(report));
        output.push('\n');

        for case in &report.test_cases {
            let counts = case.counts();
            output.push_str(&format!(
                "  {:<40} {} {} {}\n",
                Self::case_title(case),
                format!("{} passed", counts.passed).green(),
                format!("{} failed", counts.failed).red(),
                format!("{} skipped", counts.skipped).yellow()
            ));
        }

        if !report.agent_stats.is_empty() {
            output.push_str(&Self::section_header("Agents"));
            for (agent, buckets) in &report.agent_stats {
                output.push_str(&format!("  {}\n", agent.bold()));
                for (bucket, statuses) in buckets {
                    let tallies = statuses
                        .iter()
                        .map(|(status, count)| format!("{}={}", status, count))
                        .collect::<Vec<_>>()
                        .join(" ");
                    output.push_str(&format!("    {:<20} {}\n", bucket, tallies));
                }
            }
        }

        output.push('\n');
        output.push_str(&Self::totals(&report.totals));
        output
    }

    /// Format as JSON
    pub fn format_json(report: &SuiteReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn run_info(report: &SuiteReport) -> String {
        let env = report
            .environment
            .map_or("-".to_string(), |env| env.to_string());
        format!(
            "{} {}  {} {}  {} {:.1}s\n",
            "Started:".cyan().bold(),
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            "Env:".cyan().bold(),
            env,
            "Duration:".cyan().bold(),
            report.duration_secs
        )
    }

    fn case_title(case: &TestCaseReport) -> String {
        match &case.name {
            Some(name) => format!("{} ({})", case.test_case_id, name),
            None => case.test_case_id.clone(),
        }
    }

    fn totals(totals: &StatusCounts) -> String {
        format!(
            "{} {} / {} {} / {} {} of {}\n",
            "PASSED".green().bold(),
            totals.passed,
            "FAILED".red().bold(),
            totals.failed,
            "SKIPPED".yellow().bold(),
            totals.skipped,
            totals.total()
        )
    }

    fn asset_status(status: AssetStatus) -> ColoredString {
        match status {
            AssetStatus::Passed => "PASSED ".green().bold(),
            AssetStatus::Failed => "FAILED ".red().bold(),
            AssetStatus::Skipped => "SKIPPED".yellow().bold(),
        }
    }

    fn agent_status(status: AgentStatus, tag: &str) -> ColoredString {
        match status {
            AgentStatus::Passed => tag.green(),
            AgentStatus::Failed | AgentStatus::Error => tag.red(),
            AgentStatus::NoResults | AgentStatus::Skipped => tag.yellow(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, report: &SuiteReport) -> String {
        Self::format_full(report)
    }

    fn format_summary(&self, report: &SuiteReport) -> String {
        Self::format_summary(report)
    }

    fn format_json(&self, report: &SuiteReport) -> String {
        Self::format_json(report)
    }
}
