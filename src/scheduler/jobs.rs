//! # Feed Jobs
//!
//! The four periodic jobs and the topics each one publishes. A tick reads
//! everything it needs before publishing anything, so a store failure
//! produces no publish at all for that cycle.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::FeedResult;
use crate::events::{publish_json, Topic, TopicPublisher};
use crate::services::{AlertService, MetricsService, StatusSummarizer, TaskService};
use crate::simulation::SimulationEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Metrics,
    Tasks,
    Alerts,
    Simulation,
}

impl JobKind {
    pub const ALL: [JobKind; 4] = [
        JobKind::Metrics,
        JobKind::Tasks,
        JobKind::Alerts,
        JobKind::Simulation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Metrics => "metrics",
            JobKind::Tasks => "tasks",
            JobKind::Alerts => "alerts",
            JobKind::Simulation => "simulation",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            JobKind::Metrics => 0,
            JobKind::Tasks => 1,
            JobKind::Alerts => 2,
            JobKind::Simulation => 3,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one tick published, in publish order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub job: JobKind,
    pub published: Vec<Topic>,
}

impl TickReport {
    fn new(job: JobKind) -> Self {
        Self {
            job,
            published: Vec::new(),
        }
    }
}

/// Collaborators shared by every job
#[derive(Clone)]
pub struct FeedJobs {
    metrics: MetricsService,
    tasks: TaskService,
    alerts: AlertService,
    summarizer: StatusSummarizer,
    engine: Arc<SimulationEngine>,
    publisher: Arc<dyn TopicPublisher>,
}

impl fmt::Debug for FeedJobs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedJobs")
            .field("metrics", &self.metrics)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl FeedJobs {
    pub fn new(
        metrics: MetricsService,
        tasks: TaskService,
        alerts: AlertService,
        summarizer: StatusSummarizer,
        engine: Arc<SimulationEngine>,
        publisher: Arc<dyn TopicPublisher>,
    ) -> Self {
        Self {
            metrics,
            tasks,
            alerts,
            summarizer,
            engine,
            publisher,
        }
    }

    /// Run one tick of `job`
    pub async fn run(&self, job: JobKind) -> FeedResult<TickReport> {
        let report = match job {
            JobKind::Metrics => self.run_metrics().await?,
            JobKind::Tasks => self.run_tasks().await?,
            JobKind::Alerts => self.run_alerts().await?,
            JobKind::Simulation => self.run_simulation().await?,
        };

        debug!(job = %job, published = ?report.published, "Tick completed");
        Ok(report)
    }

    /// Publish the recent sample list when non-empty, and always the health
    pub async fn run_metrics(&self) -> FeedResult<TickReport> {
        let recent = self.metrics.recent().await?;
        let health = self.metrics.health_status().await?;

        let mut report = TickReport::new(JobKind::Metrics);
        if !recent.is_empty() {
            self.publish(&mut report, Topic::Metrics, &recent).await?;
        }
        self.publish(&mut report, Topic::Health, &health).await?;
        Ok(report)
    }

    /// Publish the full task list and the status summary
    pub async fn run_tasks(&self) -> FeedResult<TickReport> {
        let tasks = self.tasks.all().await?;
        let summary = self.summarizer.task_summary().await?;

        let mut report = TickReport::new(JobKind::Tasks);
        self.publish(&mut report, Topic::Tasks, &tasks).await?;
        self.publish(&mut report, Topic::TaskSummary, &summary).await?;
        Ok(report)
    }

    /// Publish the unresolved alerts and the alert summary
    pub async fn run_alerts(&self) -> FeedResult<TickReport> {
        let unresolved = self.alerts.unresolved().await?;
        let summary = self.summarizer.alert_summary().await?;

        let mut report = TickReport::new(JobKind::Alerts);
        self.publish(&mut report, Topic::Alerts, &unresolved).await?;
        self.publish(&mut report, Topic::AlertSummary, &summary).await?;
        Ok(report)
    }

    /// Maybe run one simulated-event round and announce what it produced
    pub async fn run_simulation(&self) -> FeedResult<TickReport> {
        let mut report = TickReport::new(JobKind::Simulation);
        if !self.engine.should_trigger_round() {
            return Ok(report);
        }

        let round = self.engine.simulate_round().await?;
        self.publish(&mut report, Topic::NewMetric, &round.metric).await?;
        if let Some(task) = &round.task {
            self.publish(&mut report, Topic::NewTask, task).await?;
        }
        if let Some(alert) = &round.alert {
            self.publish(&mut report, Topic::NewAlert, alert).await?;
        }
        Ok(report)
    }

    async fn publish<T: Serialize + Sync>(
        &self,
        report: &mut TickReport,
        topic: Topic,
        payload: &T,
    ) -> FeedResult<()> {
        publish_json(self.publisher.as_ref(), topic, payload).await?;
        report.published.push(topic);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeedConfig, SimulationConfig};
    use crate::events::EventPublisher;
    use crate::health::HealthState;
    use crate::simulation::{RandomSource, StdRandom};
    use crate::stores::{InMemoryAlertStore, InMemoryMetricStore, InMemoryTaskStore};

    /// Always returns the same draws so every gate opens
    struct AlwaysZero;

    impl RandomSource for AlwaysZero {
        fn next_f64(&mut self) -> f64 {
            0.0
        }

        fn next_below(&mut self, _bound: u32) -> u32 {
            0
        }
    }

    fn jobs_with(rng: Box<dyn RandomSource>) -> (FeedJobs, EventPublisher) {
        let config = FeedConfig::default();
        let metrics = Arc::new(InMemoryMetricStore::new());
        let tasks = Arc::new(InMemoryTaskStore::new());
        let alerts = Arc::new(InMemoryAlertStore::new());
        let engine = Arc::new(SimulationEngine::new(
            metrics.clone(),
            tasks.clone(),
            alerts.clone(),
            rng,
            SimulationConfig::default(),
        ));
        let publisher = EventPublisher::new(64);
        let jobs = FeedJobs::new(
            MetricsService::new(metrics, engine.clone(), &config),
            TaskService::new(tasks.clone(), engine.clone()),
            AlertService::new(alerts.clone(), engine.clone()),
            StatusSummarizer::new(tasks, alerts),
            engine,
            Arc::new(publisher.clone()),
        );
        (jobs, publisher)
    }

    #[tokio::test]
    async fn test_empty_metrics_publish_only_health() {
        let (jobs, publisher) = jobs_with(Box::new(StdRandom::seeded(1)));
        let mut rx = publisher.subscribe();

        let report = jobs.run(JobKind::Metrics).await.unwrap();
        assert_eq!(report.published, vec![Topic::Health]);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.topic, Topic::Health);
        assert_eq!(event.payload["status"], serde_json::json!(HealthState::Unknown));
        assert_eq!(event.payload["sample_count"], 0);
    }

    #[tokio::test]
    async fn test_tasks_and_alerts_publish_unconditionally() {
        let (jobs, _publisher) = jobs_with(Box::new(StdRandom::seeded(1)));

        let tasks = jobs.run(JobKind::Tasks).await.unwrap();
        assert_eq!(tasks.published, vec![Topic::Tasks, Topic::TaskSummary]);

        let alerts = jobs.run(JobKind::Alerts).await.unwrap();
        assert_eq!(alerts.published, vec![Topic::Alerts, Topic::AlertSummary]);
    }

    #[tokio::test]
    async fn test_open_gates_publish_all_three() {
        let (jobs, _publisher) = jobs_with(Box::new(AlwaysZero));

        let report = jobs.run(JobKind::Simulation).await.unwrap();
        assert_eq!(
            report.published,
            vec![Topic::NewMetric, Topic::NewTask, Topic::NewAlert]
        );

        // The new sample is now inside the window
        let metrics = jobs.run(JobKind::Metrics).await.unwrap();
        assert_eq!(metrics.published, vec![Topic::Metrics, Topic::Health]);
    }
}
