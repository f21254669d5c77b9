//! Polling loop, timeout race and outcome aggregation for a task wait.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use deployctl_client::TaskStatusGateway;
use deployctl_core::{TaskId, TaskSummary};

use super::render::{ProgressRenderer, RenderState};
use super::{WaitError, WaitRequest};

/// Waits for server tasks to reach a terminal state.
pub struct TaskWaiter {
    gateway: Arc<dyn TaskStatusGateway>,
    renderer: ProgressRenderer,
}

impl TaskWaiter {
    pub fn new(gateway: Arc<dyn TaskStatusGateway>, renderer: ProgressRenderer) -> Self {
        Self { gateway, renderer }
    }

    /// Wait until every task in `request` is terminal.
    ///
    /// Returns `Ok(())` only when all tasks finished successfully. Failed tasks
    /// are collected and reported together once nothing is pending.
    pub async fn wait(&self, request: &WaitRequest) -> Result<(), WaitError> {
        request.validate()?;

        let tasks = self.gateway.fetch_tasks(request.task_ids()).await?;
        if tasks.is_empty() {
            return Err(WaitError::NotFound);
        }

        let mut tracker = TaskTracker::default();
        for task in &tasks {
            if tracker.observe_initial(task) {
                report(self.renderer.render_task_header(task));
            }
        }

        if tracker.pending.is_empty() {
            return tracker.into_outcome();
        }

        info!(
            pending = tracker.pending.len(),
            timeout_secs = request.timeout().as_secs(),
            "Waiting for server tasks"
        );

        let (pending_tx, pending_rx) = watch::channel(tracker.pending.clone());
        let (done_tx, done_rx) = oneshot::channel();

        let poller = Poller {
            gateway: self.gateway.clone(),
            renderer: self.renderer.clone(),
            tracker,
            rendered: RenderState::new(),
            poll_interval: request.poll_interval(),
            show_progress: request.show_progress(),
            pending_tx,
        };
        let poll_handle = tokio::spawn(async move {
            let _ = done_tx.send(poller.run().await);
        });

        tokio::select! {
            biased;

            outcome = done_rx => outcome.unwrap_or(Err(WaitError::Interrupted)),
            _ = tokio::time::sleep(request.timeout()) => {
                poll_handle.abort();
                let pending = pending_rx.borrow().clone();
                self.on_timeout(pending, request.cancel_on_timeout()).await
            }
        }
    }

    async fn on_timeout(&self, pending: Vec<TaskId>, cancel: bool) -> Result<(), WaitError> {
        warn!(pending = pending.len(), "Timed out waiting for server tasks");

        let mut cancelled = false;
        if cancel {
            match self.gateway.cancel_tasks(&pending).await {
                Ok(tasks) => {
                    for task in &tasks {
                        report(self.renderer.render_task_header(task));
                    }
                    cancelled = true;
                }
                Err(e) => warn!(error = %e, "Failed to cancel pending tasks"),
            }
        }

        Err(WaitError::Timeout { pending, cancelled })
    }
}

/// Pending, failed and finished task sets for one wait.
#[derive(Debug, Default)]
struct TaskTracker {
    pending: Vec<TaskId>,
    failed: Vec<TaskId>,
    done: Vec<TaskId>,
}

impl TaskTracker {
    /// Classify a task from the first fetch. Returns false for a repeated summary.
    fn observe_initial(&mut self, task: &TaskSummary) -> bool {
        if self.pending.contains(&task.id)
            || self.failed.contains(&task.id)
            || self.done.contains(&task.id)
        {
            return false;
        }
        if task.has_failed() {
            self.failed.push(task.id.clone());
        } else if task.is_completed() {
            self.done.push(task.id.clone());
        } else {
            self.pending.push(task.id.clone());
        }
        true
    }

    /// Record a polled summary. Returns true the first time the task is seen completed.
    fn observe_poll(&mut self, task: &TaskSummary) -> bool {
        if !task.is_completed() {
            return false;
        }
        let Some(index) = self.pending.iter().position(|id| *id == task.id) else {
            return false;
        };

        let id = self.pending.remove(index);
        if task.has_failed() {
            self.failed.push(id);
        } else {
            self.done.push(id);
        }
        true
    }

    fn into_outcome(self) -> Result<(), WaitError> {
        if self.failed.is_empty() {
            Ok(())
        } else {
            Err(WaitError::TasksFailed {
                task_ids: self.failed,
            })
        }
    }
}

/// Background polling unit. Owns the task sets and the render state.
struct Poller {
    gateway: Arc<dyn TaskStatusGateway>,
    renderer: ProgressRenderer,
    tracker: TaskTracker,
    rendered: RenderState,
    poll_interval: Duration,
    show_progress: bool,
    pending_tx: watch::Sender<Vec<TaskId>>,
}

impl Poller {
    async fn run(mut self) -> Result<(), WaitError> {
        while !self.tracker.pending.is_empty() {
            tokio::time::sleep(self.poll_interval).await;
            self.tick().await?;
            self.pending_tx.send_replace(self.tracker.pending.clone());
        }

        info!(failed = self.tracker.failed.len(), "All server tasks finished");
        self.tracker.into_outcome()
    }

    async fn tick(&mut self) -> Result<(), WaitError> {
        debug!(pending = self.tracker.pending.len(), "Polling server tasks");
        let tasks = self.gateway.fetch_tasks(&self.tracker.pending).await?;

        if self.show_progress {
            if let Some(id) = self.tracker.pending.first().cloned() {
                self.render_progress(&id).await;
            }
        }

        for task in &tasks {
            if self.tracker.observe_poll(task) {
                debug!(task_id = %task.id, state = %task.state, "Server task finished");
                report(self.renderer.render_task_header(task));
            }
        }
        Ok(())
    }

    /// Best effort: a failed detail fetch only means no progress this tick.
    async fn render_progress(&mut self, id: &TaskId) {
        let detail = match self.gateway.fetch_task_detail(id).await {
            Ok(detail) => detail,
            Err(e) => {
                debug!(task_id = %id, error = %e, "Skipping progress, detail fetch failed");
                return;
            }
        };

        for activity in &detail.activity_logs {
            report(self.renderer.render_activity(activity, &mut self.rendered));
        }
    }
}

fn report(result: io::Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, "Failed to write task output");
    }
}
