//! # Health Types
//!
//! Derived health view published on the `health` topic. Nothing here is
//! persisted; a fresh [`HealthStatus`] is computed on every classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::health_thresholds;

/// Discrete health label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// No samples in the window
    Unknown,
    Healthy,
    Warning,
    Unhealthy,
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Healthy => write!(f, "healthy"),
            Self::Warning => write!(f, "warning"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Averaged health over a sampling window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub avg_cpu: f64,
    pub avg_memory: f64,
    pub avg_load: f64,
    /// Number of samples contributing to the averages
    pub sample_count: usize,
}

impl HealthStatus {
    /// Status reported for an empty window
    pub fn unknown() -> Self {
        Self {
            status: HealthState::Unknown,
            avg_cpu: 0.0,
            avg_memory: 0.0,
            avg_load: 0.0,
            sample_count: 0,
        }
    }
}

/// One tier of limits; a tier trips when any average strictly exceeds its limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTier {
    pub cpu: f64,
    pub memory: f64,
    pub load: f64,
}

impl ThresholdTier {
    pub fn is_exceeded(&self, avg_cpu: f64, avg_memory: f64, avg_load: f64) -> bool {
        avg_cpu > self.cpu || avg_memory > self.memory || avg_load > self.load
    }
}

/// Classification thresholds, checked most severe first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    pub unhealthy: ThresholdTier,
    pub warning: ThresholdTier,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            unhealthy: ThresholdTier {
                cpu: health_thresholds::UNHEALTHY_CPU,
                memory: health_thresholds::UNHEALTHY_MEMORY,
                load: health_thresholds::UNHEALTHY_LOAD,
            },
            warning: ThresholdTier {
                cpu: health_thresholds::WARNING_CPU,
                memory: health_thresholds::WARNING_MEMORY,
                load: health_thresholds::WARNING_LOAD,
            },
        }
    }
}
