//! The task status contract used by the wait orchestrator.

use async_trait::async_trait;

use deployctl_core::{TaskDetail, TaskId, TaskSummary};

use crate::error::ClientError;

/// Source of server task status.
///
/// Implementations talk to the server; callers only rely on these three
/// operations. No retry or caching is expected from implementors.
#[async_trait]
pub trait TaskStatusGateway: Send + Sync {
    /// Fetch summaries for the given task IDs.
    ///
    /// IDs the server does not know about are simply absent from the result.
    async fn fetch_tasks(&self, ids: &[TaskId]) -> Result<Vec<TaskSummary>, ClientError>;

    /// Fetch a task's summary together with its activity tree.
    async fn fetch_task_detail(&self, id: &TaskId) -> Result<TaskDetail, ClientError>;

    /// Request cancellation of the given tasks, returning their updated summaries.
    async fn cancel_tasks(&self, ids: &[TaskId]) -> Result<Vec<TaskSummary>, ClientError>;
}
