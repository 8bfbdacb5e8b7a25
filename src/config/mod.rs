//! # Feed Configuration
//!
//! Typed configuration for the broadcast engine. Every section has complete
//! defaults, so an empty configuration source yields the default cadences
//! (metrics every 2 s, tasks every 3 s, alerts and simulation every 5 s).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use opsfeed_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let metrics_every = manager.config().scheduler.metrics_interval();
//! # Ok(())
//! # }
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{intervals, simulation, windows, DEFAULT_EVENT_CAPACITY};
use crate::error::{FeedError, FeedResult};
use crate::health::HealthThresholds;

pub use loader::ConfigManager;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Job cadences and windows
    pub scheduler: SchedulerConfig,

    /// Health classification window and thresholds
    pub health: HealthConfig,

    /// Synthetic workload generation
    pub simulation: SimulationConfig,

    /// Startup seeding of the stores
    pub seed_data: SeedDataConfig,

    /// In-memory store bounds
    pub stores: StoresConfig,

    /// Event publishing
    pub events: EventsConfig,

    /// Console logging
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub metrics_interval_ms: u64,
    pub tasks_interval_ms: u64,
    pub alerts_interval_ms: u64,
    pub simulation_interval_ms: u64,
    /// Trailing window of samples published on the `metrics` topic
    pub metrics_window_seconds: u64,
    /// Skip a tick while the previous tick of the same job is still running
    pub skip_if_busy: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            metrics_interval_ms: intervals::METRICS_INTERVAL_MS,
            tasks_interval_ms: intervals::TASKS_INTERVAL_MS,
            alerts_interval_ms: intervals::ALERTS_INTERVAL_MS,
            simulation_interval_ms: intervals::SIMULATION_INTERVAL_MS,
            metrics_window_seconds: windows::METRICS_WINDOW_SECONDS,
            skip_if_busy: false,
        }
    }
}

impl SchedulerConfig {
    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }

    pub fn tasks_interval(&self) -> Duration {
        Duration::from_millis(self.tasks_interval_ms)
    }

    pub fn alerts_interval(&self) -> Duration {
        Duration::from_millis(self.alerts_interval_ms)
    }

    pub fn simulation_interval(&self) -> Duration {
        Duration::from_millis(self.simulation_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Trailing window averaged by the classifier
    pub window_seconds: u64,
    pub thresholds: HealthThresholds,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            window_seconds: windows::HEALTH_WINDOW_SECONDS,
            thresholds: HealthThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub enabled: bool,
    /// Chance that a simulation tick runs a round at all
    pub event_probability: f64,
    /// Chance that a round also produces a task
    pub task_probability: f64,
    /// Chance that a round also produces an alert
    pub alert_probability: f64,
    /// Low, medium, high, critical
    pub severity_weights: [u32; 4],
    /// Fixed generator seed; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            event_probability: simulation::EVENT_PROBABILITY,
            task_probability: simulation::TASK_PROBABILITY,
            alert_probability: simulation::ALERT_PROBABILITY,
            severity_weights: simulation::SEVERITY_WEIGHTS,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SeedDataConfig {
    pub enabled: bool,
    pub metrics: usize,
    pub tasks: usize,
    pub alerts: usize,
    /// Spacing between back-dated seed metrics
    pub metric_spacing_seconds: u64,
    /// Chance that a seeded alert starts resolved
    pub resolved_probability: f64,
}

impl Default for SeedDataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            metrics: 20,
            tasks: 10,
            alerts: 5,
            metric_spacing_seconds: 15,
            resolved_probability: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoresConfig {
    /// Metric samples older than this behind the newest are dropped; 0 keeps everything
    pub metric_retention_seconds: u64,
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            metric_retention_seconds: windows::METRIC_RETENTION_SECONDS,
        }
    }
}

impl StoresConfig {
    pub fn metric_retention(&self) -> Option<chrono::Duration> {
        match self.metric_retention_seconds {
            0 => None,
            secs => Some(chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive overriding the per-environment default
    pub level: Option<String>,
    pub format: LogFormat,
}

impl FeedConfig {
    /// Validate configuration values
    pub fn validate(&self) -> FeedResult<()> {
        let intervals = [
            ("scheduler.metrics_interval_ms", self.scheduler.metrics_interval_ms),
            ("scheduler.tasks_interval_ms", self.scheduler.tasks_interval_ms),
            ("scheduler.alerts_interval_ms", self.scheduler.alerts_interval_ms),
            ("scheduler.simulation_interval_ms", self.scheduler.simulation_interval_ms),
            ("scheduler.metrics_window_seconds", self.scheduler.metrics_window_seconds),
            ("health.window_seconds", self.health.window_seconds),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
        }

        let probabilities = [
            ("simulation.event_probability", self.simulation.event_probability),
            ("simulation.task_probability", self.simulation.task_probability),
            ("simulation.alert_probability", self.simulation.alert_probability),
            ("seed_data.resolved_probability", self.seed_data.resolved_probability),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be within [0, 1]"));
            }
        }

        if self.simulation.severity_weights.iter().sum::<u32>() == 0 {
            return Err(invalid(
                "simulation.severity_weights",
                "at least one weight must be positive",
            ));
        }

        let t = &self.health.thresholds;
        if t.warning.cpu > t.unhealthy.cpu
            || t.warning.memory > t.unhealthy.memory
            || t.warning.load > t.unhealthy.load
        {
            return Err(invalid(
                "health.thresholds",
                "warning thresholds must not exceed unhealthy thresholds",
            ));
        }

        let retention = self.stores.metric_retention_seconds;
        let widest_window = self
            .scheduler
            .metrics_window_seconds
            .max(self.health.window_seconds);
        if retention != 0 && retention < widest_window {
            return Err(invalid(
                "stores.metric_retention_seconds",
                "must cover the metrics and health windows",
            ));
        }

        if self.events.channel_capacity == 0 {
            return Err(invalid("events.channel_capacity", "must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> FeedError {
    FeedError::InvalidConfiguration(format!("{field}: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_default_cadence() {
        let config = FeedConfig::default();
        assert_eq!(config.scheduler.metrics_interval(), Duration::from_secs(2));
        assert_eq!(config.scheduler.tasks_interval(), Duration::from_secs(3));
        assert_eq!(config.scheduler.alerts_interval(), Duration::from_secs(5));
        assert_eq!(config.scheduler.simulation_interval(), Duration::from_secs(5));
        assert_eq!(config.health.window_seconds, 300);
        assert!(!config.scheduler.skip_if_busy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = FeedConfig::default();
        config.scheduler.tasks_interval_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scheduler.tasks_interval_ms"));
    }

    #[test]
    fn test_retention_shorter_than_window_rejected() {
        let mut config = FeedConfig::default();
        config.stores.metric_retention_seconds = 60;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stores.metric_retention_seconds"));

        config.stores.metric_retention_seconds = 0;
        assert!(config.validate().is_ok());
        assert_eq!(config.stores.metric_retention(), None);
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut config = FeedConfig::default();
        config.simulation.alert_probability = 1.5;
        assert!(matches!(
            config.validate(),
            Err(FeedError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = FeedConfig::default();
        config.health.thresholds.warning.load = 6.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FeedConfig =
            serde_json::from_str(r#"{"scheduler": {"metrics_interval_ms": 500}}"#).unwrap();
        assert_eq!(config.scheduler.metrics_interval_ms, 500);
        assert_eq!(config.scheduler.tasks_interval_ms, 3_000);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }
}
