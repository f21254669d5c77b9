//! deployctl Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Async runtime specifics
//! - Terminal output
//!
//! All types here describe server tasks as the deployment server reports them.

pub mod error;
pub mod ids;
pub mod status;
pub mod task;

// Re-export commonly used types
pub use error::CoreError;
pub use ids::TaskId;
pub use status::{ActivityStatus, TaskState};
pub use task::{ActivityElement, LogElement, TaskDetail, TaskSummary};
