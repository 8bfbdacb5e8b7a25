//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use opsfeed_core::config::FeedConfig;
use opsfeed_core::error::{FeedError, FeedResult};
use opsfeed_core::events::PublishedEvent;
use opsfeed_core::models::{NewTask, Task};
use opsfeed_core::simulation::{RandomSource, StdRandom};
use opsfeed_core::state_machine::TaskStatus;
use opsfeed_core::stores::{InMemoryAlertStore, InMemoryMetricStore, InMemoryTaskStore, TaskStore};
use opsfeed_core::system::FeedSystem;

/// Defaults with the simulation job switched off and a fixed seed
pub fn quiet_config() -> FeedConfig {
    let mut config = FeedConfig::default();
    config.simulation.enabled = false;
    config.simulation.seed = Some(7);
    config
}

pub fn system_with_task_store(config: &FeedConfig, task_store: Arc<dyn TaskStore>) -> FeedSystem {
    FeedSystem::with_stores(
        config,
        Arc::new(InMemoryMetricStore::new()),
        task_store,
        Arc::new(InMemoryAlertStore::new()),
        Box::new(StdRandom::seeded(7)),
    )
}

pub fn system_with_rng(config: &FeedConfig, rng: Box<dyn RandomSource>) -> FeedSystem {
    FeedSystem::with_stores(
        config,
        Arc::new(InMemoryMetricStore::new()),
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(InMemoryAlertStore::new()),
        rng,
    )
}

/// Everything currently buffered in `rx`
pub fn drain(rx: &mut broadcast::Receiver<PublishedEvent>) -> Vec<PublishedEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Returns the same float for every draw and zero for every index
pub struct ConstantRandom(pub f64);

impl RandomSource for ConstantRandom {
    fn next_f64(&mut self) -> f64 {
        self.0
    }

    fn next_below(&mut self, _bound: u32) -> u32 {
        0
    }
}

/// Task store whose every call fails like a lost connection
pub struct FailingTaskStore;

fn unavailable<T>() -> FeedResult<T> {
    Err(FeedError::store("task store unavailable"))
}

#[async_trait]
impl TaskStore for FailingTaskStore {
    async fn find_all(&self) -> FeedResult<Vec<Task>> {
        unavailable()
    }

    async fn find_by_status(&self, _status: TaskStatus) -> FeedResult<Vec<Task>> {
        unavailable()
    }

    async fn find_by_cluster(&self, _target_cluster: &str) -> FeedResult<Vec<Task>> {
        unavailable()
    }

    async fn find_by_id(&self, _task_id: i64) -> FeedResult<Option<Task>> {
        unavailable()
    }

    async fn create(&self, _task: NewTask) -> FeedResult<Task> {
        unavailable()
    }

    async fn save(&self, _task: Task) -> FeedResult<Task> {
        unavailable()
    }

    async fn count_by_status(&self, _status: TaskStatus) -> FeedResult<u64> {
        unavailable()
    }
}

/// In-memory task store whose `find_all` takes `delay`
pub struct SlowTaskStore {
    inner: InMemoryTaskStore,
    delay: Duration,
}

impl SlowTaskStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryTaskStore::new(),
            delay,
        }
    }
}

#[async_trait]
impl TaskStore for SlowTaskStore {
    async fn find_all(&self) -> FeedResult<Vec<Task>> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_all().await
    }

    async fn find_by_status(&self, status: TaskStatus) -> FeedResult<Vec<Task>> {
        self.inner.find_by_status(status).await
    }

    async fn find_by_cluster(&self, target_cluster: &str) -> FeedResult<Vec<Task>> {
        self.inner.find_by_cluster(target_cluster).await
    }

    async fn find_by_id(&self, task_id: i64) -> FeedResult<Option<Task>> {
        self.inner.find_by_id(task_id).await
    }

    async fn create(&self, task: NewTask) -> FeedResult<Task> {
        self.inner.create(task).await
    }

    async fn save(&self, task: Task) -> FeedResult<Task> {
        self.inner.save(task).await
    }

    async fn count_by_status(&self, status: TaskStatus) -> FeedResult<u64> {
        self.inner.count_by_status(status).await
    }
}
