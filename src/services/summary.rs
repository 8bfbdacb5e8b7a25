//! # Status Summaries
//!
//! Dashboard roll-ups of the task and alert stores.
//!
//! Neither summary is taken from one consistent snapshot. The task summary
//! issues four independent counts, and the alert summary counts unresolved
//! alerts before separately fetching and tallying them, so concurrent writes
//! between those calls show up as small inconsistencies. The in-memory stores
//! could offer a snapshot, but other store backends cannot do so cheaply.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::FeedResult;
use crate::models::{Alert, AlertSeverity};
use crate::state_machine::TaskStatus;
use crate::stores::{AlertStore, TaskStore};

/// Task counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusSummary {
    pub queued: u64,
    pub running: u64,
    pub failed: u64,
    pub completed: u64,
    pub total: u64,
}

impl TaskStatusSummary {
    /// Build a summary; `total` is always the sum of the four counts
    pub fn new(queued: u64, running: u64, failed: u64, completed: u64) -> Self {
        Self {
            queued,
            running,
            failed,
            completed,
            total: queued + running + failed + completed,
        }
    }
}

/// Unresolved alert counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub unresolved_count: u64,
    pub low: u64,
    pub medium: u64,
    pub high: u64,
    pub critical: u64,
}

impl AlertSummary {
    /// Tally `alerts` by severity, keeping the separately obtained count
    pub fn tally(unresolved_count: u64, alerts: &[Alert]) -> Self {
        let mut counts = [0u64; 4];
        for alert in alerts {
            counts[alert.severity.index()] += 1;
        }
        Self {
            unresolved_count,
            low: counts[AlertSeverity::Low.index()],
            medium: counts[AlertSeverity::Medium.index()],
            high: counts[AlertSeverity::High.index()],
            critical: counts[AlertSeverity::Critical.index()],
        }
    }
}

#[derive(Clone)]
pub struct StatusSummarizer {
    task_store: Arc<dyn TaskStore>,
    alert_store: Arc<dyn AlertStore>,
}

impl std::fmt::Debug for StatusSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusSummarizer").finish_non_exhaustive()
    }
}

impl StatusSummarizer {
    pub fn new(task_store: Arc<dyn TaskStore>, alert_store: Arc<dyn AlertStore>) -> Self {
        Self {
            task_store,
            alert_store,
        }
    }

    pub async fn task_summary(&self) -> FeedResult<TaskStatusSummary> {
        let queued = self.task_store.count_by_status(TaskStatus::Queued).await?;
        let running = self.task_store.count_by_status(TaskStatus::Running).await?;
        let failed = self.task_store.count_by_status(TaskStatus::Failed).await?;
        let completed = self.task_store.count_by_status(TaskStatus::Completed).await?;

        let summary = TaskStatusSummary::new(queued, running, failed, completed);
        debug!(total = summary.total, "Task summary computed");
        Ok(summary)
    }

    pub async fn alert_summary(&self) -> FeedResult<AlertSummary> {
        let unresolved_count = self.alert_store.count_unresolved().await?;
        let unresolved = self.alert_store.find_unresolved().await?;

        let summary = AlertSummary::tally(unresolved_count, &unresolved);
        debug!(
            unresolved_count = summary.unresolved_count,
            listed = unresolved.len(),
            "Alert summary computed"
        );
        Ok(summary)
    }
}
