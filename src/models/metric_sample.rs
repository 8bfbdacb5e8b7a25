//! # Metric Sample Model
//!
//! A single point-in-time utilization reading for one server. Samples are
//! immutable once recorded; the store assigns the identifier.
//!
//! Utilization fields are percentages in the 0-100 range by convention only,
//! nothing rejects values outside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted metric sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub metric_id: i64,
    pub server_name: String,
    pub region: String,
    pub service_type: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_in: f64,
    pub network_out: f64,
    pub load_average: f64,
    pub timestamp: DateTime<Utc>,
}

/// Insert payload for a metric sample, before the store has assigned an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMetricSample {
    pub server_name: String,
    pub region: String,
    pub service_type: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_in: f64,
    pub network_out: f64,
    pub load_average: f64,
    pub timestamp: DateTime<Utc>,
}

impl NewMetricSample {
    /// Attach a store-assigned id, producing the persisted form
    pub fn into_sample(self, metric_id: i64) -> MetricSample {
        MetricSample {
            metric_id,
            server_name: self.server_name,
            region: self.region,
            service_type: self.service_type,
            cpu_usage: self.cpu_usage,
            memory_usage: self.memory_usage,
            disk_usage: self.disk_usage,
            network_in: self.network_in,
            network_out: self.network_out,
            load_average: self.load_average,
            timestamp: self.timestamp,
        }
    }
}
