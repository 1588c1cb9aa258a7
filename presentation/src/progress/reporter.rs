//! Progress reporting for suite runs

use colored::Colorize;
use harness_application::HarnessProgress;
use harness_domain::{PayloadHash, StatusCounts, TestCaseReport};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports suite progress with a progress bar over test cases
pub struct ProgressReporter {
    multi: MultiProgress,
    suite_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            suite_bar: Mutex::new(None),
        }
    }

    fn suite_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.suite_bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn counts_label(counts: &StatusCounts) -> String {
    format!(
        "{} {} {}",
        format!("{}v", counts.passed).green(),
        format!("{}x", counts.failed).red(),
        format!("{}-", counts.skipped).yellow()
    )
}

impl HarnessProgress for ProgressReporter {
    fn on_suite_start(&self, suite: &str, total_cases: usize) {
        let bar = self.multi.add(ProgressBar::new(total_cases as u64));
        bar.set_style(Self::suite_style());
        bar.set_prefix(suite.to_string());
        bar.set_message("Starting...");
        if let Ok(mut guard) = self.suite_bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_test_case_start(&self, test_case_id: &str, total_assets: usize) {
        self.with_bar(|bar| {
            bar.set_message(format!("{} ({} assets)", test_case_id, total_assets));
        });
    }

    fn on_payload_dispatched(&self, hash: &PayloadHash, agents: usize) {
        self.with_bar(|bar| {
            bar.set_message(format!("query {} answered by {} agents", hash.short(), agents));
        });
    }

    fn on_test_case_complete(&self, report: &TestCaseReport) {
        self.with_bar(|bar| {
            bar.set_message(format!(
                "{} {}",
                report.test_case_id,
                counts_label(&report.counts())
            ));
            bar.inc(1);
        });
    }

    fn on_suite_complete(&self, totals: &StatusCounts) {
        if let Ok(mut guard) = self.suite_bar.lock()
            && let Some(bar) = guard.take()
        {
            bar.finish_with_message(format!("{} {}", "done".green(), counts_label(totals)));
        }
    }
}

/// Simple line-based progress (no fancy UI)
pub struct SimpleProgress;

impl HarnessProgress for SimpleProgress {
    fn on_suite_start(&self, suite: &str, total_cases: usize) {
        eprintln!("{} {} ({} test cases)", "->".cyan(), suite.bold(), total_cases);
    }

    fn on_test_case_start(&self, test_case_id: &str, total_assets: usize) {
        eprintln!("  {} {} ({} assets)", "..".dimmed(), test_case_id, total_assets);
    }

    fn on_test_case_complete(&self, report: &TestCaseReport) {
        let counts = report.counts();
        let mark = if counts.failed == 0 {
            "v".green()
        } else {
            "x".red()
        };
        eprintln!("  {} {} {}", mark, report.test_case_id, counts_label(&counts));
    }

    fn on_suite_complete(&self, totals: &StatusCounts) {
        eprintln!("{} {}", "done".green(), counts_label(totals));
    }
}
