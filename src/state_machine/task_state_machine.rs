use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{events::TaskEvent, states::TaskStatus};
use crate::constants::PROGRESS_COMPLETE;
use crate::models::Task;

/// Result of applying an event to a task
///
/// The state machine never mutates in place. The caller receives the updated
/// record, the status before and after, and the timestamp that was stamped
/// into `updated_at`, and decides whether to persist it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTransition {
    pub task: Task,
    pub from_status: TaskStatus,
    pub to_status: TaskStatus,
    pub updated_at: DateTime<Utc>,
}

impl TaskTransition {
    /// Whether the status actually changed
    pub fn status_changed(&self) -> bool {
        self.from_status != self.to_status
    }
}

/// Task status transition rules
///
/// ```text
/// Queued --progress>0--> Running --progress>=100--> Completed
///    \                      \
///     \--progress>=100-------+--> Completed
///  any --fail--> Failed
/// ```
///
/// Progress updates on terminal tasks are accepted: progress and timestamp
/// change, the status does not (except that progress >= 100 always yields
/// Completed).
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskStateMachine;

impl TaskStateMachine {
    /// Apply an event, stamping `now` as the new `updated_at`
    pub fn apply(task: &Task, event: TaskEvent, now: DateTime<Utc>) -> TaskTransition {
        let from_status = task.status;
        let to_status = Self::determine_target_status(from_status, event);

        let mut updated = task.clone();
        if let Some(progress) = event.progress() {
            updated.progress = progress;
        }
        updated.status = to_status;
        updated.updated_at = now;

        TaskTransition {
            task: updated,
            from_status,
            to_status,
            updated_at: now,
        }
    }

    /// Set progress verbatim and derive the new status
    pub fn update_progress(task: &Task, progress: i32, now: DateTime<Utc>) -> TaskTransition {
        Self::apply(task, TaskEvent::Progress(progress), now)
    }

    /// Unconditionally mark the task failed
    pub fn fail(task: &Task, now: DateTime<Utc>) -> TaskTransition {
        Self::apply(task, TaskEvent::Fail, now)
    }

    /// Determine the target status based on current status and event
    pub fn determine_target_status(current: TaskStatus, event: TaskEvent) -> TaskStatus {
        match (current, event) {
            (_, TaskEvent::Fail) => TaskStatus::Failed,
            (_, TaskEvent::Progress(p)) if p >= PROGRESS_COMPLETE => TaskStatus::Completed,
            (TaskStatus::Queued, TaskEvent::Progress(p)) if p > 0 => TaskStatus::Running,
            (current, TaskEvent::Progress(_)) => current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTask;
    use chrono::Duration;

    fn task_with(status: TaskStatus, progress: i32) -> Task {
        let created = Utc::now() - Duration::minutes(10);
        let mut task = NewTask::queued("data-sync", "production", created).into_task(1);
        task.status = status;
        task.progress = progress;
        task
    }

    #[test]
    fn test_progress_100_completes_from_any_status() {
        let now = Utc::now();
        for status in TaskStatus::ALL {
            let transition = TaskStateMachine::update_progress(&task_with(status, 0), 100, now);
            assert_eq!(transition.to_status, TaskStatus::Completed, "from {status}");
            assert_eq!(transition.task.progress, 100);
        }
    }

    #[test]
    fn test_positive_progress_starts_queued_task() {
        let transition =
            TaskStateMachine::update_progress(&task_with(TaskStatus::Queued, 0), 10, Utc::now());
        assert_eq!(transition.from_status, TaskStatus::Queued);
        assert_eq!(transition.to_status, TaskStatus::Running);
        assert!(transition.status_changed());
    }

    #[test]
    fn test_zero_progress_leaves_queued_task() {
        let transition =
            TaskStateMachine::update_progress(&task_with(TaskStatus::Queued, 0), 0, Utc::now());
        assert_eq!(transition.to_status, TaskStatus::Queued);
        assert!(!transition.status_changed());
    }

    #[test]
    fn test_progress_on_completed_task_keeps_status() {
        let now = Utc::now();
        let task = task_with(TaskStatus::Completed, 100);
        let transition = TaskStateMachine::update_progress(&task, 10, now);

        assert_eq!(transition.to_status, TaskStatus::Completed);
        assert_eq!(transition.task.progress, 10);
        assert_eq!(transition.task.updated_at, now);
        assert!(transition.task.updated_at > task.updated_at);
    }

    #[test]
    fn test_progress_on_failed_task_keeps_status() {
        let transition =
            TaskStateMachine::update_progress(&task_with(TaskStatus::Failed, 0), 50, Utc::now());
        assert_eq!(transition.to_status, TaskStatus::Failed);
        assert_eq!(transition.task.progress, 50);
    }

    #[test]
    fn test_out_of_range_progress_stored_verbatim() {
        let now = Utc::now();
        let over = TaskStateMachine::update_progress(&task_with(TaskStatus::Running, 40), 150, now);
        assert_eq!(over.task.progress, 150);
        assert_eq!(over.to_status, TaskStatus::Completed);

        let under = TaskStateMachine::update_progress(&task_with(TaskStatus::Queued, 0), -20, now);
        assert_eq!(under.task.progress, -20);
        assert_eq!(under.to_status, TaskStatus::Queued);
    }

    #[test]
    fn test_fail_is_unconditional() {
        let now = Utc::now();
        let cases = [
            task_with(TaskStatus::Running, 50),
            task_with(TaskStatus::Completed, 100),
            task_with(TaskStatus::Queued, 0),
        ];
        for task in cases {
            let transition = TaskStateMachine::fail(&task, now);
            assert_eq!(transition.to_status, TaskStatus::Failed);
            assert_eq!(transition.task.progress, task.progress);
            assert_eq!(transition.updated_at, now);
        }
    }

    #[test]
    fn test_apply_does_not_touch_input() {
        let task = task_with(TaskStatus::Queued, 0);
        let before = task.clone();
        let _ = TaskStateMachine::update_progress(&task, 60, Utc::now());
        assert_eq!(task, before);
    }
}
