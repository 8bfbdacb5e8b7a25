//! System-wide constants shared by the scheduler, classifier and simulation.

use std::time::Duration;

/// Default cadence of each broadcast job
pub mod intervals {
    pub const METRICS_INTERVAL_MS: u64 = 2_000;
    pub const TASKS_INTERVAL_MS: u64 = 3_000;
    pub const ALERTS_INTERVAL_MS: u64 = 5_000;
    pub const SIMULATION_INTERVAL_MS: u64 = 5_000;
}

/// Trailing windows used when sampling metrics
pub mod windows {
    pub const METRICS_WINDOW_SECONDS: u64 = 300;
    pub const HEALTH_WINDOW_SECONDS: u64 = 300;
    /// How long the in-memory metric store keeps samples
    pub const METRIC_RETENTION_SECONDS: u64 = 3600;
}

/// Health classification thresholds (strictly-greater-than comparisons)
pub mod health_thresholds {
    pub const UNHEALTHY_CPU: f64 = 85.0;
    pub const UNHEALTHY_MEMORY: f64 = 90.0;
    pub const UNHEALTHY_LOAD: f64 = 5.0;

    pub const WARNING_CPU: f64 = 70.0;
    pub const WARNING_MEMORY: f64 = 75.0;
    pub const WARNING_LOAD: f64 = 3.0;
}

/// Probabilities for the simulated-event round
pub mod simulation {
    pub const EVENT_PROBABILITY: f64 = 0.5;
    pub const TASK_PROBABILITY: f64 = 0.3;
    pub const ALERT_PROBABILITY: f64 = 0.2;

    /// Severity weights in declaration order: low, medium, high, critical
    pub const SEVERITY_WEIGHTS: [u32; 4] = [40, 30, 20, 10];
}

/// Task progress at which a task is considered complete
pub const PROGRESS_COMPLETE: i32 = 100;

/// Default broadcast channel capacity for published events
pub const DEFAULT_EVENT_CAPACITY: usize = 1_000;

/// Convert a window expressed in seconds into a chrono duration
pub fn window_duration(seconds: u64) -> chrono::Duration {
    chrono::Duration::from_std(Duration::from_secs(seconds))
        .unwrap_or_else(|_| chrono::Duration::seconds(i64::MAX / 1_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_weights_total_one_hundred() {
        let total: u32 = simulation::SEVERITY_WEIGHTS.iter().sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_window_duration() {
        assert_eq!(window_duration(300), chrono::Duration::minutes(5));
    }
}
