//! Error type for a task wait.

use thiserror::Error;

use deployctl_client::ClientError;
use deployctl_core::ids::join_ids;
use deployctl_core::TaskId;

/// Terminal outcome of a wait that did not succeed.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The request itself was malformed.
    #[error("{0}")]
    Validation(String),

    /// The server returned no tasks for the requested IDs.
    #[error("no server tasks found")]
    NotFound,

    /// A required fetch failed.
    #[error(transparent)]
    Gateway(#[from] ClientError),

    /// One or more tasks finished unsuccessfully.
    #[error("one or more deployment tasks failed: {}", join_ids(.task_ids))]
    TasksFailed { task_ids: Vec<TaskId> },

    /// The timeout elapsed while tasks were still pending.
    #[error(
        "timeout while waiting for pending tasks: {}{}",
        join_ids(.pending),
        cancel_note(.cancelled)
    )]
    Timeout { pending: Vec<TaskId>, cancelled: bool },

    /// The polling task stopped without reporting an outcome.
    #[error("task polling stopped unexpectedly")]
    Interrupted,
}

fn cancel_note(cancelled: &bool) -> &'static str {
    if *cancelled {
        " (cancellation requested)"
    } else {
        ""
    }
}
