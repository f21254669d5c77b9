//! Waiting for server tasks to finish.
//!
//! [`TaskWaiter`] polls the server until every requested task is terminal,
//! the timeout fires, or a fetch fails. [`ProgressRenderer`] prints task
//! headers and, for a single task, its activity tree as it advances.

mod error;
mod orchestrator;
mod render;
mod request;

#[cfg(test)]
mod fake;

pub use error::WaitError;
pub use orchestrator::TaskWaiter;
pub use render::{ProgressRenderer, RenderState, SharedWriter};
pub use request::{WaitRequest, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};
