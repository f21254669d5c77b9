//! Core domain errors.

use thiserror::Error;

/// Core domain errors for deployctl.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Task identifier was empty or whitespace.
    #[error("Invalid task ID: {0:?}")]
    InvalidTaskId(String),
}
