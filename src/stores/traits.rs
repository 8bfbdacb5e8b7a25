//! Storage collaborator interfaces.
//!
//! The feed engine reads and writes metrics, tasks and alerts only through
//! these traits. Every call is independent; no transaction spans several
//! calls, so a summary built from several queries can observe concurrent
//! writes between them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::FeedResult;
use crate::models::{Alert, AlertSeverity, MetricSample, NewAlert, NewMetricSample, NewTask, Task};
use crate::state_machine::TaskStatus;

#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Samples with `timestamp >= since`, newest first
    async fn find_window(&self, since: DateTime<Utc>) -> FeedResult<Vec<MetricSample>>;

    async fn find_all(&self) -> FeedResult<Vec<MetricSample>>;

    async fn find_by_server(&self, server_name: &str) -> FeedResult<Vec<MetricSample>>;

    async fn find_by_region(&self, region: &str) -> FeedResult<Vec<MetricSample>>;

    async fn find_by_service_type(&self, service_type: &str) -> FeedResult<Vec<MetricSample>>;

    /// Persist a new sample and return it with its assigned id
    async fn save(&self, sample: NewMetricSample) -> FeedResult<MetricSample>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks, most recently updated first
    async fn find_all(&self) -> FeedResult<Vec<Task>>;

    async fn find_by_status(&self, status: TaskStatus) -> FeedResult<Vec<Task>>;

    async fn find_by_cluster(&self, target_cluster: &str) -> FeedResult<Vec<Task>>;

    async fn find_by_id(&self, task_id: i64) -> FeedResult<Option<Task>>;

    /// Persist a new task and return it with its assigned id
    async fn create(&self, task: NewTask) -> FeedResult<Task>;

    /// Overwrite an existing task
    async fn save(&self, task: Task) -> FeedResult<Task>;

    async fn count_by_status(&self, status: TaskStatus) -> FeedResult<u64>;
}

#[async_trait]
pub trait AlertStore: Send + Sync {
    /// All alerts, newest first
    async fn find_all(&self) -> FeedResult<Vec<Alert>>;

    /// Unresolved alerts, newest first
    async fn find_unresolved(&self) -> FeedResult<Vec<Alert>>;

    async fn find_unresolved_by_severity(&self, severity: AlertSeverity)
        -> FeedResult<Vec<Alert>>;

    async fn find_by_source(&self, source: &str) -> FeedResult<Vec<Alert>>;

    async fn find_by_severity(&self, severity: AlertSeverity) -> FeedResult<Vec<Alert>>;

    async fn find_by_id(&self, alert_id: i64) -> FeedResult<Option<Alert>>;

    /// Persist a new alert and return it with its assigned id
    async fn create(&self, alert: NewAlert) -> FeedResult<Alert>;

    /// Overwrite an existing alert
    async fn save(&self, alert: Alert) -> FeedResult<Alert>;

    async fn count_unresolved(&self) -> FeedResult<u64>;
}
