//! Alert queries, creation and one-way resolution.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::FeedResult;
use crate::models::{Alert, AlertSeverity, NewAlert};
use crate::simulation::SimulationEngine;
use crate::stores::AlertStore;

/// Outcome of resolving an alert. Resolution never reverts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(Alert),
    AlreadyResolved(Alert),
    NotFound,
}

#[derive(Clone)]
pub struct AlertService {
    store: Arc<dyn AlertStore>,
    engine: Arc<SimulationEngine>,
}

impl std::fmt::Debug for AlertService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertService").finish_non_exhaustive()
    }
}

impl AlertService {
    pub fn new(store: Arc<dyn AlertStore>, engine: Arc<SimulationEngine>) -> Self {
        Self { store, engine }
    }

    pub async fn all(&self) -> FeedResult<Vec<Alert>> {
        self.store.find_all().await
    }

    pub async fn unresolved(&self) -> FeedResult<Vec<Alert>> {
        self.store.find_unresolved().await
    }

    pub async fn unresolved_by_severity(&self, severity: AlertSeverity) -> FeedResult<Vec<Alert>> {
        self.store.find_unresolved_by_severity(severity).await
    }

    pub async fn by_source(&self, source: &str) -> FeedResult<Vec<Alert>> {
        self.store.find_by_source(source).await
    }

    pub async fn by_severity(&self, severity: AlertSeverity) -> FeedResult<Vec<Alert>> {
        self.store.find_by_severity(severity).await
    }

    pub async fn create(
        &self,
        source: impl Into<String>,
        severity: AlertSeverity,
        message: impl Into<String>,
    ) -> FeedResult<Alert> {
        let alert = self
            .store
            .create(NewAlert::unresolved(source, severity, message, Utc::now()))
            .await?;
        warn!(
            alert_id = alert.alert_id,
            source = %alert.source,
            severity = %alert.severity,
            "Alert raised"
        );
        Ok(alert)
    }

    pub async fn resolve(&self, alert_id: i64) -> FeedResult<ResolveOutcome> {
        let Some(alert) = self.store.find_by_id(alert_id).await? else {
            debug!(alert_id, "Alert not found, ignoring resolve");
            return Ok(ResolveOutcome::NotFound);
        };

        if alert.resolved {
            return Ok(ResolveOutcome::AlreadyResolved(alert));
        }

        let resolved = self.store.save(alert.resolve()).await?;
        info!(alert_id, severity = %resolved.severity, "Alert resolved");
        Ok(ResolveOutcome::Resolved(resolved))
    }

    /// Generate and persist one simulated alert
    pub async fn generate(&self) -> FeedResult<Alert> {
        self.engine.generate_alert().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::simulation::StdRandom;
    use crate::stores::{InMemoryAlertStore, InMemoryMetricStore, InMemoryTaskStore};

    fn service() -> AlertService {
        let alerts = Arc::new(InMemoryAlertStore::new());
        let engine = Arc::new(SimulationEngine::new(
            Arc::new(InMemoryMetricStore::new()),
            Arc::new(InMemoryTaskStore::new()),
            alerts.clone(),
            Box::new(StdRandom::seeded(8)),
            SimulationConfig::default(),
        ));
        AlertService::new(alerts, engine)
    }

    #[tokio::test]
    async fn test_resolve_is_one_way() {
        let service = service();
        let alert = service
            .create("api-gateway", AlertSeverity::High, "Service unavailable")
            .await
            .unwrap();
        assert_eq!(service.unresolved().await.unwrap().len(), 1);

        let first = service.resolve(alert.alert_id).await.unwrap();
        assert!(matches!(first, ResolveOutcome::Resolved(ref a) if a.resolved));

        let second = service.resolve(alert.alert_id).await.unwrap();
        assert!(matches!(second, ResolveOutcome::AlreadyResolved(_)));

        assert!(service.unresolved().await.unwrap().is_empty());
        assert_eq!(service.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_unknown_is_noop() {
        let service = service();
        assert_eq!(service.resolve(7).await.unwrap(), ResolveOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_queries_filter() {
        let service = service();
        service
            .create("server-01", AlertSeverity::Low, "Memory usage rising")
            .await
            .unwrap();
        service
            .create("server-02", AlertSeverity::Critical, "System crashed")
            .await
            .unwrap();

        assert_eq!(service.by_source("server-01").await.unwrap().len(), 1);
        assert_eq!(
            service.by_severity(AlertSeverity::Critical).await.unwrap()[0].source,
            "server-02"
        );
        assert_eq!(
            service
                .unresolved_by_severity(AlertSeverity::Medium)
                .await
                .unwrap()
                .len(),
            0
        );
    }

    #[tokio::test]
    async fn test_generate_is_unresolved() {
        let service = service();
        let alert = service.generate().await.unwrap();
        assert!(!alert.resolved);
    }
}
