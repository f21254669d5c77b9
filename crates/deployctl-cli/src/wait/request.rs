//! Parameters of a single wait.

use std::time::Duration;

use deployctl_core::TaskId;

use super::WaitError;

/// Default time to wait before giving up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Default delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// What to wait for and how.
///
/// Built once per invocation and not modified afterwards.
#[derive(Debug, Clone)]
pub struct WaitRequest {
    task_ids: Vec<TaskId>,
    timeout: Duration,
    poll_interval: Duration,
    cancel_on_timeout: bool,
    show_progress: bool,
}

impl WaitRequest {
    /// Create a request with default options.
    ///
    /// Duplicate IDs are dropped, keeping the first occurrence.
    pub fn new(task_ids: impl IntoIterator<Item = TaskId>) -> Self {
        let mut unique: Vec<TaskId> = Vec::new();
        for id in task_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        Self {
            task_ids: unique,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            cancel_on_timeout: false,
            show_progress: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_cancel_on_timeout(mut self, cancel: bool) -> Self {
        self.cancel_on_timeout = cancel;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn cancel_on_timeout(&self) -> bool {
        self.cancel_on_timeout
    }

    pub fn show_progress(&self) -> bool {
        self.show_progress
    }

    /// Check the request before anything is sent to the server.
    pub fn validate(&self) -> Result<(), WaitError> {
        if self.task_ids.is_empty() {
            return Err(WaitError::Validation(
                "no server task IDs provided, at least one is required".to_string(),
            ));
        }
        if self.show_progress && self.task_ids.len() > 1 {
            return Err(WaitError::Validation(
                "--progress flag is only supported when waiting for a single task".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(WaitError::Validation(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
