//! Metric queries, windowed health and simulated samples.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::FeedConfig;
use crate::constants::window_duration;
use crate::error::FeedResult;
use crate::health::{HealthClassifier, HealthStatus};
use crate::models::MetricSample;
use crate::simulation::SimulationEngine;
use crate::stores::MetricStore;

#[derive(Clone)]
pub struct MetricsService {
    store: Arc<dyn MetricStore>,
    engine: Arc<SimulationEngine>,
    classifier: HealthClassifier,
    metrics_window_seconds: u64,
    health_window_seconds: u64,
}

impl std::fmt::Debug for MetricsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsService")
            .field("classifier", &self.classifier)
            .field("metrics_window_seconds", &self.metrics_window_seconds)
            .field("health_window_seconds", &self.health_window_seconds)
            .finish()
    }
}

impl MetricsService {
    pub fn new(
        store: Arc<dyn MetricStore>,
        engine: Arc<SimulationEngine>,
        config: &FeedConfig,
    ) -> Self {
        Self {
            store,
            engine,
            classifier: HealthClassifier::new(config.health.thresholds),
            metrics_window_seconds: config.scheduler.metrics_window_seconds,
            health_window_seconds: config.health.window_seconds,
        }
    }

    /// Samples inside the trailing metrics window, newest first
    pub async fn recent(&self) -> FeedResult<Vec<MetricSample>> {
        self.recent_at(Utc::now()).await
    }

    pub async fn recent_at(&self, now: DateTime<Utc>) -> FeedResult<Vec<MetricSample>> {
        let since = now - window_duration(self.metrics_window_seconds);
        self.store.find_window(since).await
    }

    pub async fn by_server(&self, server_name: &str) -> FeedResult<Vec<MetricSample>> {
        self.store.find_by_server(server_name).await
    }

    pub async fn by_region(&self, region: &str) -> FeedResult<Vec<MetricSample>> {
        self.store.find_by_region(region).await
    }

    pub async fn by_service_type(&self, service_type: &str) -> FeedResult<Vec<MetricSample>> {
        self.store.find_by_service_type(service_type).await
    }

    /// Classify the trailing health window
    pub async fn health_status(&self) -> FeedResult<HealthStatus> {
        self.health_status_at(Utc::now()).await
    }

    pub async fn health_status_at(&self, now: DateTime<Utc>) -> FeedResult<HealthStatus> {
        let since = now - window_duration(self.health_window_seconds);
        let samples = self.store.find_window(since).await?;
        Ok(self.classifier.classify(&samples))
    }

    /// Generate and persist one simulated sample
    pub async fn generate(&self) -> FeedResult<MetricSample> {
        self.engine.generate_metric().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::health::HealthState;
    use crate::models::NewMetricSample;
    use crate::simulation::StdRandom;
    use crate::stores::{InMemoryAlertStore, InMemoryMetricStore, InMemoryTaskStore};

    fn service() -> (Arc<InMemoryMetricStore>, MetricsService) {
        let metrics = Arc::new(InMemoryMetricStore::new());
        let engine = Arc::new(SimulationEngine::new(
            metrics.clone(),
            Arc::new(InMemoryTaskStore::new()),
            Arc::new(InMemoryAlertStore::new()),
            Box::new(StdRandom::seeded(21)),
            SimulationConfig::default(),
        ));
        let service = MetricsService::new(metrics.clone(), engine, &FeedConfig::default());
        (metrics, service)
    }

    fn sample(cpu: f64, timestamp: DateTime<Utc>) -> NewMetricSample {
        NewMetricSample {
            server_name: "server-01".to_string(),
            region: "beijing".to_string(),
            service_type: "web".to_string(),
            cpu_usage: cpu,
            memory_usage: 50.0,
            disk_usage: 20.0,
            network_in: 200.0,
            network_out: 100.0,
            load_average: 1.0,
            timestamp,
        }
    }

    #[tokio::test]
    async fn test_empty_window_is_unknown() {
        let (_, service) = service();
        let status = service.health_status().await.unwrap();
        assert_eq!(status, HealthStatus::unknown());
    }

    #[tokio::test]
    async fn test_samples_outside_window_are_ignored() {
        let (metrics, service) = service();
        let now = Utc::now();
        metrics.save(sample(95.0, now - chrono::Duration::minutes(10))).await.unwrap();
        metrics.save(sample(75.0, now - chrono::Duration::minutes(1))).await.unwrap();

        let recent = service.recent_at(now).await.unwrap();
        assert_eq!(recent.len(), 1);

        let status = service.health_status_at(now).await.unwrap();
        assert_eq!(status.status, HealthState::Warning);
        assert_eq!(status.sample_count, 1);
    }

    #[tokio::test]
    async fn test_generate_persists() {
        let (metrics, service) = service();
        let generated = service.generate().await.unwrap();
        assert_eq!(metrics.find_all().await.unwrap(), vec![generated.clone()]);
        assert_eq!(
            service.by_server(&generated.server_name).await.unwrap().len(),
            1
        );
    }
}
