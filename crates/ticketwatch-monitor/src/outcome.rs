use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::decision::Decision;

/// What happened to one target during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub url: String,
    pub label: String,
    pub decision: Decision,
    pub error: Option<String>,
    /// Set when a screenshot was also written to the shots directory.
    pub screenshot_path: Option<std::path::PathBuf>,
}

impl TargetReport {
    /// `true` for a skip or a delivered report.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        !self.decision.is_error()
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub targets: Vec<TargetReport>,
}

impl RunOutcome {
    /// A run succeeds only if every target was skipped or its report
    /// delivered.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.targets.iter().all(TargetReport::is_ok)
    }

    #[must_use]
    pub fn reported(&self) -> usize {
        self.count(|d| matches!(d, Decision::Report(_)))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|d| matches!(d, Decision::Skip(_)))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|d| matches!(d, Decision::ReportError(_)))
    }

    #[must_use]
    pub fn target(&self, url: &str) -> Option<&TargetReport> {
        self.targets.iter().find(|t| t.url == url)
    }

    fn count(&self, pred: impl Fn(Decision) -> bool) -> usize {
        self.targets.iter().filter(|t| pred(t.decision)).count()
    }
}
