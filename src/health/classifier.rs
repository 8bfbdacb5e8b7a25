//! # Health Classifier
//!
//! Maps a window of metric samples to a [`HealthStatus`]. Pure and
//! side-effect free: averages cpu, memory and load with a plain arithmetic
//! mean, then checks the unhealthy tier before the warning tier.

use tracing::debug;

use super::types::{HealthState, HealthStatus, HealthThresholds};
use crate::models::MetricSample;

#[derive(Debug, Clone, Default)]
pub struct HealthClassifier {
    thresholds: HealthThresholds,
}

impl HealthClassifier {
    pub fn new(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    /// Classify a window of samples. Sample order is irrelevant.
    pub fn classify(&self, samples: &[MetricSample]) -> HealthStatus {
        if samples.is_empty() {
            return HealthStatus::unknown();
        }

        let count = samples.len() as f64;
        let (cpu, memory, load) = samples.iter().fold((0.0, 0.0, 0.0), |acc, s| {
            (
                acc.0 + s.cpu_usage,
                acc.1 + s.memory_usage,
                acc.2 + s.load_average,
            )
        });

        let status = self.classify_averages(cpu / count, memory / count, load / count);

        debug!(
            status = %status.status,
            avg_cpu = status.avg_cpu,
            avg_memory = status.avg_memory,
            avg_load = status.avg_load,
            sample_count = samples.len(),
            "Health status classified"
        );

        HealthStatus {
            sample_count: samples.len(),
            ..status
        }
    }

    /// Classify pre-computed averages (sample count is left at zero)
    pub fn classify_averages(&self, avg_cpu: f64, avg_memory: f64, avg_load: f64) -> HealthStatus {
        let state = if self
            .thresholds
            .unhealthy
            .is_exceeded(avg_cpu, avg_memory, avg_load)
        {
            HealthState::Unhealthy
        } else if self
            .thresholds
            .warning
            .is_exceeded(avg_cpu, avg_memory, avg_load)
        {
            HealthState::Warning
        } else {
            HealthState::Healthy
        };

        HealthStatus {
            status: state,
            avg_cpu,
            avg_memory,
            avg_load,
            sample_count: 0,
        }
    }
}
