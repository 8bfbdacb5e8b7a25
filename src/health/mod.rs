//! Health classification of recent metric windows.

pub mod classifier;
pub mod types;

pub use classifier::HealthClassifier;
pub use types::{HealthState, HealthStatus, HealthThresholds, ThresholdTier};
