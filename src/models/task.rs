//! # Task Model
//!
//! A background task running against a target cluster. Tasks are created in
//! the `Queued` state with zero progress; all later status changes go through
//! [`TaskStateMachine`](crate::state_machine::TaskStateMachine), which returns
//! the updated record together with the bumped `updated_at` timestamp.
//!
//! Progress is stored verbatim. Values outside 0-100 are accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state_machine::TaskStatus;

/// A persisted task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: i64,
    pub task_name: String,
    pub target_cluster: String,
    pub status: TaskStatus,
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Insert payload for a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub task_name: String,
    pub target_cluster: String,
    pub status: TaskStatus,
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewTask {
    /// A freshly queued task with zero progress
    pub fn queued(
        task_name: impl Into<String>,
        target_cluster: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            target_cluster: target_cluster.into(),
            status: TaskStatus::Queued,
            progress: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_task(self, task_id: i64) -> Task {
        Task {
            task_id,
            task_name: self.task_name,
            target_cluster: self.target_cluster,
            status: self.status,
            progress: self.progress,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
