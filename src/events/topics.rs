//! Topic names the dashboard subscribes to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    /// Recent metric samples (skipped when the window is empty)
    Metrics,
    /// Classified health of the metric window
    Health,
    /// Full task list
    Tasks,
    /// Task counts per status
    TaskSummary,
    /// Unresolved alerts
    Alerts,
    /// Unresolved counts per severity
    AlertSummary,
    NewMetric,
    NewTask,
    NewAlert,
}

impl Topic {
    pub const ALL: [Topic; 9] = [
        Topic::Metrics,
        Topic::Health,
        Topic::Tasks,
        Topic::TaskSummary,
        Topic::Alerts,
        Topic::AlertSummary,
        Topic::NewMetric,
        Topic::NewTask,
        Topic::NewAlert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Metrics => "metrics",
            Topic::Health => "health",
            Topic::Tasks => "tasks",
            Topic::TaskSummary => "task-summary",
            Topic::Alerts => "alerts",
            Topic::AlertSummary => "alert-summary",
            Topic::NewMetric => "new-metric",
            Topic::NewTask => "new-task",
            Topic::NewAlert => "new-alert",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s)
            .ok_or_else(|| format!("Unknown topic: {s}"))
    }
}
