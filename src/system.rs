//! # Feed System
//!
//! Wires stores, the simulation engine, services, publisher and scheduler
//! together from one [`FeedConfig`]. The binary and the integration tests
//! both build on this.

use std::sync::Arc;

use crate::config::FeedConfig;
use crate::events::{EventPublisher, TopicPublisher};
use crate::scheduler::{BroadcastScheduler, FeedJobs};
use crate::services::{
    AlertService, DataSeeder, MetricsService, StatusSummarizer, TaskService,
};
use crate::simulation::{RandomSource, SimulationEngine, StdRandom};
use crate::stores::{
    AlertStore, InMemoryAlertStore, InMemoryMetricStore, InMemoryTaskStore, MetricStore,
    TaskStore,
};

/// Fully wired feed components
#[derive(Clone)]
pub struct FeedSystem {
    pub config: FeedConfig,
    pub metric_store: Arc<dyn MetricStore>,
    pub task_store: Arc<dyn TaskStore>,
    pub alert_store: Arc<dyn AlertStore>,
    pub engine: Arc<SimulationEngine>,
    pub metrics: MetricsService,
    pub tasks: TaskService,
    pub alerts: AlertService,
    pub summarizer: StatusSummarizer,
    pub publisher: EventPublisher,
}

impl std::fmt::Debug for FeedSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSystem")
            .field("config", &self.config)
            .field("subscribers", &self.publisher.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl FeedSystem {
    /// In-memory stores bounded by `stores`, and a generator seeded from
    /// `simulation.seed`
    pub fn in_memory(config: &FeedConfig) -> Self {
        let rng = Box::new(StdRandom::from_seed_option(config.simulation.seed));
        let metric_store = match config.stores.metric_retention() {
            Some(retention) => InMemoryMetricStore::with_retention(retention),
            None => InMemoryMetricStore::new(),
        };
        Self::with_stores(
            config,
            Arc::new(metric_store),
            Arc::new(InMemoryTaskStore::new()),
            Arc::new(InMemoryAlertStore::new()),
            rng,
        )
    }

    pub fn with_stores(
        config: &FeedConfig,
        metric_store: Arc<dyn MetricStore>,
        task_store: Arc<dyn TaskStore>,
        alert_store: Arc<dyn AlertStore>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let engine = Arc::new(SimulationEngine::new(
            Arc::clone(&metric_store),
            Arc::clone(&task_store),
            Arc::clone(&alert_store),
            rng,
            config.simulation.clone(),
        ));

        Self {
            config: config.clone(),
            metrics: MetricsService::new(Arc::clone(&metric_store), Arc::clone(&engine), config),
            tasks: TaskService::new(Arc::clone(&task_store), Arc::clone(&engine)),
            alerts: AlertService::new(Arc::clone(&alert_store), Arc::clone(&engine)),
            summarizer: StatusSummarizer::new(Arc::clone(&task_store), Arc::clone(&alert_store)),
            publisher: EventPublisher::new(config.events.channel_capacity),
            metric_store,
            task_store,
            alert_store,
            engine,
        }
    }

    pub fn seeder(&self) -> DataSeeder {
        DataSeeder::new(
            Arc::clone(&self.metric_store),
            Arc::clone(&self.task_store),
            Arc::clone(&self.alert_store),
            Arc::clone(&self.engine),
            self.config.seed_data.clone(),
        )
    }

    /// Jobs publishing through this system's [`EventPublisher`]
    pub fn jobs(&self) -> FeedJobs {
        self.jobs_with_publisher(Arc::new(self.publisher.clone()))
    }

    pub fn jobs_with_publisher(&self, publisher: Arc<dyn TopicPublisher>) -> FeedJobs {
        FeedJobs::new(
            self.metrics.clone(),
            self.tasks.clone(),
            self.alerts.clone(),
            self.summarizer.clone(),
            Arc::clone(&self.engine),
            publisher,
        )
    }

    /// A stopped scheduler over [`Self::jobs`]
    pub fn scheduler(&self) -> BroadcastScheduler {
        BroadcastScheduler::new(
            self.jobs(),
            self.config.scheduler.clone(),
            self.config.simulation.enabled,
        )
    }
}
