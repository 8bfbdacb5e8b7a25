//! Task queries and lifecycle mutations.
//!
//! Mutations look the task up, run it through [`TaskStateMachine`] and
//! persist the result. An unknown id is a no-op reported as
//! [`TaskUpdateOutcome::NotFound`].

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::FeedResult;
use crate::models::{NewTask, Task};
use crate::simulation::SimulationEngine;
use crate::state_machine::{TaskEvent, TaskStateMachine, TaskStatus, TaskTransition};
use crate::stores::TaskStore;

/// Outcome of a progress or failure update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdateOutcome {
    Updated(TaskTransition),
    NotFound,
}

impl TaskUpdateOutcome {
    pub fn transition(&self) -> Option<&TaskTransition> {
        match self {
            TaskUpdateOutcome::Updated(transition) => Some(transition),
            TaskUpdateOutcome::NotFound => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskUpdateOutcome::NotFound)
    }
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    engine: Arc<SimulationEngine>,
}

impl std::fmt::Debug for TaskService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskService").finish_non_exhaustive()
    }
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, engine: Arc<SimulationEngine>) -> Self {
        Self { store, engine }
    }

    pub async fn all(&self) -> FeedResult<Vec<Task>> {
        self.store.find_all().await
    }

    pub async fn by_status(&self, status: TaskStatus) -> FeedResult<Vec<Task>> {
        self.store.find_by_status(status).await
    }

    pub async fn by_cluster(&self, target_cluster: &str) -> FeedResult<Vec<Task>> {
        self.store.find_by_cluster(target_cluster).await
    }

    /// Create a queued task with zero progress
    pub async fn create(
        &self,
        task_name: impl Into<String>,
        target_cluster: impl Into<String>,
    ) -> FeedResult<Task> {
        let task = self
            .store
            .create(NewTask::queued(task_name, target_cluster, Utc::now()))
            .await?;
        info!(task_id = task.task_id, task_name = %task.task_name, "Task created");
        Ok(task)
    }

    /// Record progress. Values outside 0-100 are stored as given.
    pub async fn update_progress(&self, task_id: i64, progress: i32) -> FeedResult<TaskUpdateOutcome> {
        self.apply(task_id, TaskEvent::Progress(progress)).await
    }

    /// Mark a task failed, whatever its current status
    pub async fn fail(&self, task_id: i64) -> FeedResult<TaskUpdateOutcome> {
        self.apply(task_id, TaskEvent::Fail).await
    }

    async fn apply(&self, task_id: i64, event: TaskEvent) -> FeedResult<TaskUpdateOutcome> {
        let Some(task) = self.store.find_by_id(task_id).await? else {
            debug!(task_id, event = event.event_type(), "Task not found, ignoring update");
            return Ok(TaskUpdateOutcome::NotFound);
        };

        let transition = TaskStateMachine::apply(&task, event, Utc::now());
        let saved = self.store.save(transition.task.clone()).await?;

        if transition.status_changed() {
            info!(
                task_id,
                from = %transition.from_status,
                to = %transition.to_status,
                progress = saved.progress,
                "Task status changed"
            );
        }

        Ok(TaskUpdateOutcome::Updated(TaskTransition {
            task: saved,
            ..transition
        }))
    }

    /// Generate and persist one simulated task
    pub async fn generate(&self) -> FeedResult<Task> {
        self.engine.generate_task().await
    }
}
