//! Server task summaries, details and activity trees.

use crate::{ActivityStatus, TaskId, TaskState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time view of a server task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskSummary {
    /// Unique task identifier.
    pub id: TaskId,

    /// Human readable description (e.g. "Deploy Web release 1.2 to Prod").
    #[serde(default)]
    pub description: String,

    /// Current task state.
    pub state: TaskState,

    /// Whether the task has finished. Absent until the server knows.
    #[serde(default)]
    pub is_completed: Option<bool>,

    /// Whether the task finished successfully. Absent until the server knows.
    #[serde(default)]
    pub finished_successfully: Option<bool>,

    /// When the task started executing.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    /// When the task completed.
    #[serde(default)]
    pub completed_time: Option<DateTime<Utc>>,
}

impl TaskSummary {
    /// Create a summary with nothing known beyond its state.
    pub fn new(id: impl Into<TaskId>, description: impl Into<String>, state: TaskState) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            state,
            is_completed: None,
            finished_successfully: None,
            start_time: None,
            completed_time: None,
        }
    }

    /// Builder method to mark the task as finished.
    pub fn completed(mut self, successfully: bool) -> Self {
        self.is_completed = Some(true);
        self.finished_successfully = Some(successfully);
        self
    }

    /// Builder method to set start and completion times.
    pub fn with_times(mut self, started: DateTime<Utc>, completed: DateTime<Utc>) -> Self {
        self.start_time = Some(started);
        self.completed_time = Some(completed);
        self
    }

    /// True only when the server has definitely reported completion.
    pub fn is_completed(&self) -> bool {
        self.is_completed == Some(true)
    }

    /// True when the task completed and the server explicitly reported failure.
    ///
    /// A completed task with an unknown outcome is not considered failed.
    pub fn has_failed(&self) -> bool {
        self.is_completed() && self.finished_successfully == Some(false)
    }

    /// Start and end times, if both are known.
    pub fn timespan(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start_time?, self.completed_time?))
    }
}

/// Task summary plus its activity tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskDetail {
    pub task: TaskSummary,

    /// Root activities; each root's children are the task's steps.
    #[serde(default)]
    pub activity_logs: Vec<ActivityElement>,
}

/// A node in a task's activity tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActivityElement {
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub status: ActivityStatus,

    #[serde(default)]
    pub started: Option<DateTime<Utc>>,

    #[serde(default)]
    pub ended: Option<DateTime<Utc>>,

    #[serde(default)]
    pub children: Vec<ActivityElement>,

    /// Log lines recorded directly against this activity.
    #[serde(default)]
    pub log_elements: Vec<LogElement>,
}

impl ActivityElement {
    /// Create a leaf activity.
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: ActivityStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            started: None,
            ended: None,
            children: Vec::new(),
            log_elements: Vec::new(),
        }
    }

    /// Builder method to add a child activity.
    pub fn with_child(mut self, child: ActivityElement) -> Self {
        self.children.push(child);
        self
    }

    /// Builder method to add a log line.
    pub fn with_log(mut self, log: LogElement) -> Self {
        self.log_elements.push(log);
        self
    }

    /// Builder method to set start and end times.
    pub fn with_times(mut self, started: DateTime<Utc>, ended: DateTime<Utc>) -> Self {
        self.started = Some(started);
        self.ended = Some(ended);
        self
    }

    /// Start and end times, if both are known.
    pub fn timespan(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.started?, self.ended?))
    }
}

/// A single log line attached to an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogElement {
    pub occurred_at: DateTime<Utc>,

    /// Severity category as reported by the server (`Info`, `Warning`, `Error`, ...).
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub message_text: String,
}

impl LogElement {
    pub fn new(
        occurred_at: DateTime<Utc>,
        category: impl Into<String>,
        message_text: impl Into<String>,
    ) -> Self {
        Self {
            occurred_at,
            category: category.into(),
            message_text: message_text.into(),
        }
    }

    /// True when this line announces a retry of the step.
    pub fn is_retry_marker(&self) -> bool {
        self.message_text.contains("Retry (attempt")
    }
}
