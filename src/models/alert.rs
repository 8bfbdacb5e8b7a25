//! # Alert Model
//!
//! Alerts are raised unresolved and can only move to resolved; there is no
//! un-resolve operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert severity, ordered by increasing urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// All severities in declaration order
    pub const ALL: [AlertSeverity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Position of the severity in declaration order
    pub fn index(&self) -> usize {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Critical => 3,
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!("Invalid alert severity: {s}")),
        }
    }
}

/// A persisted alert record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: i64,
    pub source: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub resolved: bool,
}

impl Alert {
    /// Mark the alert resolved. Resolution is one-way.
    pub fn resolve(mut self) -> Self {
        self.resolved = true;
        self
    }
}

/// Insert payload for an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAlert {
    pub source: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub resolved: bool,
}

impl NewAlert {
    pub fn unresolved(
        source: impl Into<String>,
        severity: AlertSeverity,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            source: source.into(),
            severity,
            message: message.into(),
            timestamp: now,
            resolved: false,
        }
    }

    pub fn into_alert(self, alert_id: i64) -> Alert {
        Alert {
            alert_id,
            source: self.source,
            severity: self.severity,
            message: self.message,
            timestamp: self.timestamp,
            resolved: self.resolved,
        }
    }
}
