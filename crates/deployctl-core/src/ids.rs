//! Newtype wrapper for server task identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Identifier of a server task (e.g. `ServerTasks-1234`).
///
/// Assigned by the server and treated as opaque by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Create a new TaskId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = CoreError;

    /// Parse user input, trimming surrounding whitespace and rejecting blanks.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidTaskId(s.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Join task IDs into a comma separated list for messages.
pub fn join_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = TaskId::new("ServerTasks-123");
        assert_eq!(format!("{}", id), "ServerTasks-123");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id: TaskId = "  ServerTasks-1\r".parse().unwrap();
        assert_eq!(id.as_str(), "ServerTasks-1");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(matches!(
            "   ".parse::<TaskId>(),
            Err(CoreError::InvalidTaskId(_))
        ));
    }

    #[test]
    fn test_join_ids() {
        let ids = vec![TaskId::new("T1"), TaskId::new("T2")];
        assert_eq!(join_ids(&ids), "T1, T2");
        assert_eq!(join_ids(&[]), "");
    }
}
