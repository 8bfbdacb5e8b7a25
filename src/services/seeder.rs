//! Startup seeding so a fresh dashboard has history to show.
//!
//! Records are drawn from the simulation catalogs and back-dated: metrics are
//! spread evenly across the last five minutes, tasks over the last hour, and
//! alerts over the last two hours with roughly half of them resolved.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::config::SeedDataConfig;
use crate::error::FeedResult;
use crate::simulation::{draw_alert, draw_metric, draw_task, SimulationEngine};
use crate::stores::{AlertStore, MetricStore, TaskStore};

const METRIC_HISTORY_MINUTES: i64 = 5;
const TASK_CREATED_WITHIN_MINUTES: u32 = 60;
const TASK_UPDATED_WITHIN_MINUTES: u32 = 30;
const ALERT_HISTORY_MINUTES: u32 = 120;

/// Number of records written per store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub metrics: usize,
    pub tasks: usize,
    pub alerts: usize,
}

pub struct DataSeeder {
    metric_store: Arc<dyn MetricStore>,
    task_store: Arc<dyn TaskStore>,
    alert_store: Arc<dyn AlertStore>,
    engine: Arc<SimulationEngine>,
    config: SeedDataConfig,
}

impl std::fmt::Debug for DataSeeder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSeeder")
            .field("config", &self.config)
            .finish()
    }
}

impl DataSeeder {
    pub fn new(
        metric_store: Arc<dyn MetricStore>,
        task_store: Arc<dyn TaskStore>,
        alert_store: Arc<dyn AlertStore>,
        engine: Arc<SimulationEngine>,
        config: SeedDataConfig,
    ) -> Self {
        Self {
            metric_store,
            task_store,
            alert_store,
            engine,
            config,
        }
    }

    /// Seed all three stores relative to the current time
    pub async fn seed(&self) -> FeedResult<SeedReport> {
        self.seed_at(Utc::now()).await
    }

    pub async fn seed_at(&self, now: DateTime<Utc>) -> FeedResult<SeedReport> {
        if !self.config.enabled {
            info!("Seed data disabled");
            return Ok(SeedReport::default());
        }

        let report = SeedReport {
            metrics: self.seed_metrics(now).await?,
            tasks: self.seed_tasks(now).await?,
            alerts: self.seed_alerts(now).await?,
        };

        info!(
            metrics = report.metrics,
            tasks = report.tasks,
            alerts = report.alerts,
            "Seed data written"
        );
        Ok(report)
    }

    async fn seed_metrics(&self, now: DateTime<Utc>) -> FeedResult<usize> {
        let start = now - Duration::minutes(METRIC_HISTORY_MINUTES);
        let spacing = self.config.metric_spacing_seconds as i64;

        for i in 0..self.config.metrics {
            let at = start + Duration::seconds(i as i64 * spacing);
            let draft = self.engine.with_rng(|rng| draw_metric(rng, at));
            self.metric_store.save(draft).await?;
        }
        Ok(self.config.metrics)
    }

    async fn seed_tasks(&self, now: DateTime<Utc>) -> FeedResult<usize> {
        for _ in 0..self.config.tasks {
            let mut draft = self.engine.with_rng(|rng| {
                let created_ago = rng.next_below(TASK_CREATED_WITHIN_MINUTES);
                let updated_after = rng.next_below(TASK_UPDATED_WITHIN_MINUTES);
                let created_at = now - Duration::minutes(i64::from(created_ago));
                let mut draft = draw_task(rng, created_at);
                draft.updated_at = created_at + Duration::minutes(i64::from(updated_after));
                draft
            });
            // Never stamp an update in the future
            if draft.updated_at > now {
                draft.updated_at = now;
            }
            self.task_store.create(draft).await?;
        }
        Ok(self.config.tasks)
    }

    async fn seed_alerts(&self, now: DateTime<Utc>) -> FeedResult<usize> {
        let weights = self.engine.config().severity_weights;
        let resolved_probability = self.config.resolved_probability;

        for _ in 0..self.config.alerts {
            let draft = self.engine.with_rng(|rng| {
                let ago = rng.next_below(ALERT_HISTORY_MINUTES);
                let mut draft = draw_alert(rng, &weights, now - Duration::minutes(i64::from(ago)));
                draft.resolved = rng.chance(resolved_probability);
                draft
            });
            self.alert_store.create(draft).await?;
        }
        Ok(self.config.alerts)
    }
}
