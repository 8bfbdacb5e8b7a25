//! # Simulation Engine
//!
//! Manufactures plausible metric, task and alert records for demos and load.
//! Drawing is split from persisting: the `draw_*` functions are pure over a
//! [`RandomSource`], and [`SimulationEngine`] persists what they produce
//! through the store collaborators, returning the stored form.
//!
//! The generator lock is only held while drawing, never across a store call.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::catalog;
use super::random::{pick, RandomSource};
use crate::config::SimulationConfig;
use crate::error::FeedResult;
use crate::models::{Alert, AlertSeverity, MetricSample, NewAlert, NewMetricSample, NewTask, Task};
use crate::state_machine::TaskStatus;
use crate::stores::{AlertStore, MetricStore, TaskStore};

/// Statuses a simulated task can start in, drawn uniformly
const GENERATED_STATUSES: [TaskStatus; 4] = [
    TaskStatus::Queued,
    TaskStatus::Running,
    TaskStatus::Completed,
    TaskStatus::Failed,
];

/// Draw a metric sample with continuous uniform utilization values
pub fn draw_metric(rng: &mut dyn RandomSource, now: DateTime<Utc>) -> NewMetricSample {
    let server_name = pick(rng, &catalog::SERVERS).to_string();
    let region = pick(rng, &catalog::REGIONS).to_string();
    let service_type = pick(rng, &catalog::SERVICE_TYPES).to_string();

    NewMetricSample {
        server_name,
        region,
        service_type,
        cpu_usage: rng.uniform(20.0, 80.0),
        memory_usage: rng.uniform(30.0, 80.0),
        disk_usage: rng.uniform(10.0, 50.0),
        network_in: rng.uniform(100.0, 1000.0),
        network_out: rng.uniform(50.0, 500.0),
        load_average: rng.uniform(0.0, 8.0),
        timestamp: now,
    }
}

/// Draw a task with a uniformly chosen status and matching progress
pub fn draw_task(rng: &mut dyn RandomSource, now: DateTime<Utc>) -> NewTask {
    let task_name = pick(rng, &catalog::TASK_NAMES).to_string();
    let target_cluster = pick(rng, &catalog::CLUSTERS).to_string();
    let status = *pick(rng, &GENERATED_STATUSES);

    let progress = match status {
        TaskStatus::Running => 20 + rng.next_below(60) as i32,
        TaskStatus::Completed => 100,
        TaskStatus::Queued | TaskStatus::Failed => 0,
    };

    NewTask {
        task_name,
        target_cluster,
        status,
        progress,
        created_at: now,
        updated_at: now,
    }
}

/// Map a draw in `[0, total_weight)` to a severity by walking cumulative
/// weights in declaration order
pub fn severity_for_draw(draw: u32, weights: &[u32; 4]) -> AlertSeverity {
    let mut cumulative = 0;
    for (severity, weight) in AlertSeverity::ALL.iter().zip(weights.iter()) {
        cumulative += weight;
        if draw < cumulative {
            return *severity;
        }
    }
    AlertSeverity::Low
}

/// Weighted severity draw
pub fn draw_severity(rng: &mut dyn RandomSource, weights: &[u32; 4]) -> AlertSeverity {
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return AlertSeverity::Low;
    }
    severity_for_draw(rng.next_below(total), weights)
}

/// Draw an unresolved alert with a weighted severity and a matching message
pub fn draw_alert(
    rng: &mut dyn RandomSource,
    weights: &[u32; 4],
    now: DateTime<Utc>,
) -> NewAlert {
    let source = pick(rng, &catalog::ALERT_SOURCES).to_string();
    let severity = draw_severity(rng, weights);
    let message = pick(rng, catalog::messages_for(severity)).to_string();

    NewAlert::unresolved(source, severity, message, now)
}

/// Records produced by one simulated-event round
#[derive(Debug, Clone, Serialize)]
pub struct SimulatedEvents {
    pub metric: MetricSample,
    pub task: Option<Task>,
    pub alert: Option<Alert>,
}

pub struct SimulationEngine {
    metric_store: Arc<dyn MetricStore>,
    task_store: Arc<dyn TaskStore>,
    alert_store: Arc<dyn AlertStore>,
    rng: Mutex<Box<dyn RandomSource>>,
    config: SimulationConfig,
}

impl std::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("config", &self.config)
            .finish()
    }
}

impl SimulationEngine {
    pub fn new(
        metric_store: Arc<dyn MetricStore>,
        task_store: Arc<dyn TaskStore>,
        alert_store: Arc<dyn AlertStore>,
        rng: Box<dyn RandomSource>,
        config: SimulationConfig,
    ) -> Self {
        Self {
            metric_store,
            task_store,
            alert_store,
            rng: Mutex::new(rng),
            config,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run `f` with exclusive access to the generator
    pub fn with_rng<R>(&self, f: impl FnOnce(&mut dyn RandomSource) -> R) -> R {
        let mut guard = self.rng.lock();
        f(&mut **guard)
    }

    pub async fn generate_metric(&self) -> FeedResult<MetricSample> {
        let now = Utc::now();
        let draft = self.with_rng(|rng| draw_metric(rng, now));
        let sample = self.metric_store.save(draft).await?;
        debug!(metric_id = sample.metric_id, server = %sample.server_name, "Simulated metric");
        Ok(sample)
    }

    pub async fn generate_task(&self) -> FeedResult<Task> {
        let now = Utc::now();
        let draft = self.with_rng(|rng| draw_task(rng, now));
        let task = self.task_store.create(draft).await?;
        debug!(task_id = task.task_id, status = %task.status, "Simulated task");
        Ok(task)
    }

    pub async fn generate_alert(&self) -> FeedResult<Alert> {
        let now = Utc::now();
        let weights = self.config.severity_weights;
        let draft = self.with_rng(|rng| draw_alert(rng, &weights, now));
        let alert = self.alert_store.create(draft).await?;
        debug!(alert_id = alert.alert_id, severity = %alert.severity, "Simulated alert");
        Ok(alert)
    }

    /// Outer gate of the simulation job
    pub fn should_trigger_round(&self) -> bool {
        let p = self.config.event_probability;
        self.with_rng(|rng| rng.chance(p))
    }

    /// One simulated-event round: always a metric, then independently a task
    /// and an alert behind their own probability gates
    pub async fn simulate_round(&self) -> FeedResult<SimulatedEvents> {
        let metric = self.generate_metric().await?;

        let task_gate = self.config.task_probability;
        let task = if self.with_rng(|rng| rng.chance(task_gate)) {
            Some(self.generate_task().await?)
        } else {
            None
        };

        let alert_gate = self.config.alert_probability;
        let alert = if self.with_rng(|rng| rng.chance(alert_gate)) {
            Some(self.generate_alert().await?)
        } else {
            None
        };

        Ok(SimulatedEvents {
            metric,
            task,
            alert,
        })
    }
}
