//! Progress notification port
//!
//! Defines the interface for reporting progress during a suite run.

use harness_domain::{PayloadHash, StatusCounts, TestCaseReport};

/// Callback for progress updates during a suite run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console bar, logs, etc.)
pub trait HarnessProgress: Send + Sync {
    /// Called once before any test case runs
    fn on_suite_start(&self, suite: &str, total_cases: usize);

    /// Called when a test case starts
    fn on_test_case_start(&self, test_case_id: &str, total_assets: usize);

    /// Called when a distinct payload finished dispatching
    fn on_payload_dispatched(&self, _hash: &PayloadHash, _agents: usize) {}

    /// Called when a test case has its report
    fn on_test_case_complete(&self, report: &TestCaseReport);

    /// Called when the whole suite is done
    fn on_suite_complete(&self, _totals: &StatusCounts) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl HarnessProgress for NoProgress {
    fn on_suite_start(&self, _suite: &str, _total_cases: usize) {}
    fn on_test_case_start(&self, _test_case_id: &str, _total_assets: usize) {}
    fn on_test_case_complete(&self, _report: &TestCaseReport) {}
}
