use serde::{Deserialize, Serialize};

/// Events that can change a task's status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TaskEvent {
    /// Report new progress; stored verbatim, no clamping
    Progress(i32),
    /// Explicit failure signal
    Fail,
}

impl TaskEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Progress(_) => "progress",
            Self::Fail => "fail",
        }
    }

    /// Progress carried by the event, if any
    pub fn progress(&self) -> Option<i32> {
        match self {
            Self::Progress(p) => Some(*p),
            Self::Fail => None,
        }
    }
}
