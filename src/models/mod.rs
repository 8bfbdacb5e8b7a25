//! Data model for the dashboard feed.
//!
//! - [`metric_sample`] - server utilization readings
//! - [`task`] - background tasks and their progress
//! - [`alert`] - alerts and severities

pub mod alert;
pub mod metric_sample;
pub mod task;

pub use alert::{Alert, AlertSeverity, NewAlert};
pub use metric_sample::{MetricSample, NewMetricSample};
pub use task::{NewTask, Task};
