//! Status enums for server tasks and their activity steps.
//!
//! The server reports both as free-form strings. Known values get their own
//! variant; anything else is kept verbatim in `Other` so it can still be shown.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a server task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    /// Waiting for a free slot on the server.
    Queued,
    /// Currently executing.
    Executing,
    /// Cancellation requested, not yet finished.
    Cancelling,
    /// Cancelled.
    Canceled,
    /// Finished successfully.
    Success,
    /// Finished with an error.
    Failed,
    /// Exceeded the server-side time limit.
    TimedOut,
    /// Any state this client does not know about.
    Other(String),
}

impl TaskState {
    /// The wire representation of this state.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "Queued",
            Self::Executing => "Executing",
            Self::Cancelling => "Cancelling",
            Self::Canceled => "Canceled",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::TimedOut => "TimedOut",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for TaskState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Queued" => Self::Queued,
            "Executing" => Self::Executing,
            "Cancelling" => Self::Cancelling,
            "Canceled" => Self::Canceled,
            "Success" => Self::Success,
            "Failed" => Self::Failed,
            "TimedOut" => Self::TimedOut,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for TaskState {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        match state {
            TaskState::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single activity (phase or step) inside a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityStatus {
    Pending,
    Running,
    Success,
    SuccessWithWarning,
    Failed,
    Skipped,
    Canceled,
    Other(String),
}

impl ActivityStatus {
    /// The wire representation of this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Success => "Success",
            Self::SuccessWithWarning => "SuccessWithWarning",
            Self::Failed => "Failed",
            Self::Skipped => "Skipped",
            Self::Canceled => "Canceled",
            Self::Other(s) => s,
        }
    }

    /// Returns true once the activity can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }
}

impl From<String> for ActivityStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Success" => Self::Success,
            "SuccessWithWarning" => Self::SuccessWithWarning,
            "Failed" => Self::Failed,
            "Skipped" => Self::Skipped,
            "Canceled" => Self::Canceled,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ActivityStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<ActivityStatus> for String {
    fn from(status: ActivityStatus) -> Self {
        match status {
            ActivityStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_state_is_kept_verbatim() {
        let state = TaskState::from("Paused");
        assert_eq!(state, TaskState::Other("Paused".to_string()));
        assert_eq!(state.to_string(), "Paused");
    }

    #[test]
    fn test_state_serde_uses_plain_string() {
        let json = serde_json::to_string(&TaskState::TimedOut).unwrap();
        assert_eq!(json, "\"TimedOut\"");
        let back: TaskState = serde_json::from_str("\"Executing\"").unwrap();
        assert_eq!(back, TaskState::Executing);
    }

    #[test]
    fn test_activity_terminal() {
        assert!(!ActivityStatus::Pending.is_terminal());
        assert!(!ActivityStatus::Running.is_terminal());
        assert!(ActivityStatus::Success.is_terminal());
        assert!(ActivityStatus::Skipped.is_terminal());
        assert!(ActivityStatus::Other("Weird".into()).is_terminal());
    }
}
