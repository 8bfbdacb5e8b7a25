//! # In-Memory Stores
//!
//! Process-local implementations of the store traits, used by the `opsfeed`
//! binary and by tests. Records live behind a `parking_lot::RwLock`; ids come
//! from an atomic sequence starting at 1. Locks are never held across an
//! await point.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use super::traits::{AlertStore, MetricStore, TaskStore};
use crate::error::{FeedError, FeedResult};
use crate::models::{Alert, AlertSeverity, MetricSample, NewAlert, NewMetricSample, NewTask, Task};
use crate::state_machine::TaskStatus;

/// Id sequence shared by the in-memory stores
#[derive(Debug)]
struct IdSequence(AtomicI64);

impl Default for IdSequence {
    fn default() -> Self {
        Self(AtomicI64::new(1))
    }
}

impl IdSequence {
    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Metric samples keyed by id. Queries scan and sort the whole map, so a
/// long-running process should set a retention bound.
#[derive(Debug, Default)]
pub struct InMemoryMetricStore {
    samples: RwLock<BTreeMap<i64, MetricSample>>,
    ids: IdSequence,
    retention: Option<Duration>,
}

impl InMemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop samples older than `retention` behind the newest one on each save
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            retention: Some(retention),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.read().is_empty()
    }

    fn select(&self, predicate: impl Fn(&MetricSample) -> bool) -> Vec<MetricSample> {
        let mut selected: Vec<MetricSample> = self
            .samples
            .read()
            .values()
            .filter(|s| predicate(*s))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        selected
    }
}

#[async_trait]
impl MetricStore for InMemoryMetricStore {
    async fn find_window(&self, since: DateTime<Utc>) -> FeedResult<Vec<MetricSample>> {
        Ok(self.select(|s| s.timestamp >= since))
    }

    async fn find_all(&self) -> FeedResult<Vec<MetricSample>> {
        Ok(self.select(|_| true))
    }

    async fn find_by_server(&self, server_name: &str) -> FeedResult<Vec<MetricSample>> {
        Ok(self.select(|s| s.server_name == server_name))
    }

    async fn find_by_region(&self, region: &str) -> FeedResult<Vec<MetricSample>> {
        Ok(self.select(|s| s.region == region))
    }

    async fn find_by_service_type(&self, service_type: &str) -> FeedResult<Vec<MetricSample>> {
        Ok(self.select(|s| s.service_type == service_type))
    }

    async fn save(&self, sample: NewMetricSample) -> FeedResult<MetricSample> {
        let sample = sample.into_sample(self.ids.next());
        let mut samples = self.samples.write();
        samples.insert(sample.metric_id, sample.clone());
        if let Some(retention) = self.retention {
            let newest = samples
                .values()
                .map(|s| s.timestamp)
                .max()
                .unwrap_or(sample.timestamp);
            samples.retain(|_, s| s.timestamp >= newest - retention);
        }
        Ok(sample)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<BTreeMap<i64, Task>>,
    ids: IdSequence,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        let mut selected: Vec<Task> = self
            .tasks
            .read()
            .values()
            .filter(|t| predicate(*t))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        selected
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn find_all(&self) -> FeedResult<Vec<Task>> {
        Ok(self.select(|_| true))
    }

    async fn find_by_status(&self, status: TaskStatus) -> FeedResult<Vec<Task>> {
        Ok(self.select(|t| t.status == status))
    }

    async fn find_by_cluster(&self, target_cluster: &str) -> FeedResult<Vec<Task>> {
        Ok(self.select(|t| t.target_cluster == target_cluster))
    }

    async fn find_by_id(&self, task_id: i64) -> FeedResult<Option<Task>> {
        Ok(self.tasks.read().get(&task_id).cloned())
    }

    async fn create(&self, task: NewTask) -> FeedResult<Task> {
        let task = task.into_task(self.ids.next());
        self.tasks.write().insert(task.task_id, task.clone());
        Ok(task)
    }

    async fn save(&self, task: Task) -> FeedResult<Task> {
        let mut tasks = self.tasks.write();
        match tasks.get_mut(&task.task_id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(task)
            }
            None => Err(FeedError::store(format!(
                "Cannot save unknown task {}",
                task.task_id
            ))),
        }
    }

    async fn count_by_status(&self, status: TaskStatus) -> FeedResult<u64> {
        Ok(self
            .tasks
            .read()
            .values()
            .filter(|t| t.status == status)
            .count() as u64)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAlertStore {
    alerts: RwLock<BTreeMap<i64, Alert>>,
    ids: IdSequence,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, predicate: impl Fn(&Alert) -> bool) -> Vec<Alert> {
        let mut selected: Vec<Alert> = self
            .alerts
            .read()
            .values()
            .filter(|a| predicate(*a))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        selected
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn find_all(&self) -> FeedResult<Vec<Alert>> {
        Ok(self.select(|_| true))
    }

    async fn find_unresolved(&self) -> FeedResult<Vec<Alert>> {
        Ok(self.select(|a| !a.resolved))
    }

    async fn find_unresolved_by_severity(
        &self,
        severity: AlertSeverity,
    ) -> FeedResult<Vec<Alert>> {
        Ok(self.select(|a| !a.resolved && a.severity == severity))
    }

    async fn find_by_source(&self, source: &str) -> FeedResult<Vec<Alert>> {
        Ok(self.select(|a| a.source == source))
    }

    async fn find_by_severity(&self, severity: AlertSeverity) -> FeedResult<Vec<Alert>> {
        Ok(self.select(|a| a.severity == severity))
    }

    async fn find_by_id(&self, alert_id: i64) -> FeedResult<Option<Alert>> {
        Ok(self.alerts.read().get(&alert_id).cloned())
    }

    async fn create(&self, alert: NewAlert) -> FeedResult<Alert> {
        let alert = alert.into_alert(self.ids.next());
        self.alerts.write().insert(alert.alert_id, alert.clone());
        Ok(alert)
    }

    async fn save(&self, alert: Alert) -> FeedResult<Alert> {
        let mut alerts = self.alerts.write();
        match alerts.get_mut(&alert.alert_id) {
            Some(existing) => {
                *existing = alert.clone();
                Ok(alert)
            }
            None => Err(FeedError::store(format!(
                "Cannot save unknown alert {}",
                alert.alert_id
            ))),
        }
    }

    async fn count_unresolved(&self) -> FeedResult<u64> {
        Ok(self.alerts.read().values().filter(|a| !a.resolved).count() as u64)
    }
}
