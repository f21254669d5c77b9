//! Scripted in-memory gateway for orchestrator tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use deployctl_client::{ClientError, TaskStatusGateway};
use deployctl_core::{TaskDetail, TaskId, TaskState, TaskSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchTasks(Vec<TaskId>),
    FetchDetail(TaskId),
    Cancel(Vec<TaskId>),
}

/// Replays queued responses in order.
///
/// Once the task queue is drained, every requested task is reported as still
/// executing. Once the detail queue is drained, detail fetches fail.
#[derive(Default)]
pub struct FakeGateway {
    tasks: Mutex<VecDeque<Result<Vec<TaskSummary>, ClientError>>>,
    details: Mutex<VecDeque<Result<TaskDetail, ClientError>>>,
    cancel: Mutex<Option<Result<Vec<TaskSummary>, ClientError>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(self, response: Vec<TaskSummary>) -> Self {
        self.tasks.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_tasks_error(self, error: ClientError) -> Self {
        self.tasks.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_detail(self, detail: TaskDetail) -> Self {
        self.details.lock().unwrap().push_back(Ok(detail));
        self
    }

    pub fn with_detail_error(self, error: ClientError) -> Self {
        self.details.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_cancel(self, response: Result<Vec<TaskSummary>, ClientError>) -> Self {
        *self.cancel.lock().unwrap() = Some(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> Vec<Vec<TaskId>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::FetchTasks(ids) => Some(ids),
                _ => None,
            })
            .collect()
    }
}

pub fn executing(id: &str) -> TaskSummary {
    let mut task = TaskSummary::new(id, format!("Deploy {}", id), TaskState::Executing);
    task.is_completed = Some(false);
    task
}

pub fn succeeded(id: &str) -> TaskSummary {
    let mut task = executing(id).completed(true);
    task.state = TaskState::Success;
    task
}

pub fn failed(id: &str) -> TaskSummary {
    let mut task = executing(id).completed(false);
    task.state = TaskState::Failed;
    task
}

pub fn ids(raw: &[&str]) -> Vec<TaskId> {
    raw.iter().map(|s| TaskId::new(*s)).collect()
}

#[async_trait]
impl TaskStatusGateway for FakeGateway {
    async fn fetch_tasks(&self, ids: &[TaskId]) -> Result<Vec<TaskSummary>, ClientError> {
        self.calls.lock().unwrap().push(Call::FetchTasks(ids.to_vec()));
        match self.tasks.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(ids.iter().map(|id| executing(id.as_str())).collect()),
        }
    }

    async fn fetch_task_detail(&self, id: &TaskId) -> Result<TaskDetail, ClientError> {
        self.calls.lock().unwrap().push(Call::FetchDetail(id.clone()));
        self.details
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::NotFound(id.to_string())))
    }

    async fn cancel_tasks(&self, ids: &[TaskId]) -> Result<Vec<TaskSummary>, ClientError> {
        self.calls.lock().unwrap().push(Call::Cancel(ids.to_vec()));
        self.cancel
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
