use serde::{Deserialize, Serialize};
use std::fmt;

/// Task status as tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Initial state when task is created
    Queued,
    /// Task has made progress and is executing
    Running,
    /// Task failed; terminal
    Failed,
    /// Task reached full progress; terminal
    Completed,
}

impl TaskStatus {
    /// All statuses in declaration order
    pub const ALL: [TaskStatus; 4] = [Self::Queued, Self::Running, Self::Failed, Self::Completed];

    /// Check if this is a terminal state (progress updates cannot move it)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Running => write!(f, "running"),
            Self::Failed => write!(f, "failed"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "queued" => Ok(Self::Queued),
            "running" => Ok(Self::Running),
            "failed" => Ok(Self::Failed),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

/// Default state for new tasks
impl Default for TaskStatus {
    fn default() -> Self {
        Self::Queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_terminal_check() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(!TaskStatus::Queued.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
    }

    #[test]
    fn test_status_string_conversion() {
        assert_eq!(TaskStatus::Running.to_string(), "running");
        assert_eq!("completed".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert_eq!("QUEUED".parse::<TaskStatus>().unwrap(), TaskStatus::Queued);
        assert!("paused".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&TaskStatus::Failed).unwrap();
        assert_eq!(json, "\"failed\"");

        let parsed: TaskStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TaskStatus::Failed);
    }

    #[test]
    fn test_default_is_queued() {
        assert_eq!(TaskStatus::default(), TaskStatus::Queued);
    }
}
