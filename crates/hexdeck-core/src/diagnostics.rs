//! Diagnostics log for hardware test results.
//!
//! Test-result frames from the remote controller are routed here and only
//! here — they never touch pose state. The log is a capped ring buffer the
//! diagnostics panel reads from.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Outcome of a hardware test step as reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Running,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
            Self::Running => write!(f, "running"),
        }
    }
}

/// One entry in the diagnostics log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    /// Test identifier (e.g. "servo_sweep_FR_femur").
    pub test: String,
    pub status: TestStatus,
    pub message: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl TestReport {
    pub fn new(test: impl Into<String>, status: TestStatus, message: Option<String>) -> Self {
        Self {
            test: test.into(),
            status,
            message,
            received_at: Utc::now(),
        }
    }
}

/// Capped, thread-safe log of test reports.
pub struct DiagnosticsLog {
    entries: RwLock<VecDeque<TestReport>>,
    max_entries: usize,
}

impl DiagnosticsLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            max_entries,
        }
    }

    /// Append a report, evicting the oldest entry when full.
    pub fn push(&self, report: TestReport) {
        let mut entries = self.entries.write();
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        tracing::debug!(test = %report.test, status = %report.status, "test report");
        entries.push_back(report);
    }

    /// Snapshot of the log, oldest first.
    pub fn snapshot(&self) -> Vec<TestReport> {
        self.entries.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for DiagnosticsLog {
    fn default() -> Self {
        Self::new(200)
    }
}
