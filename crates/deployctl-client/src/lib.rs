//! Client library for the deployment server's task API.
//!
//! Exposes the narrow [`TaskStatusGateway`] contract the wait orchestrator
//! depends on, and an HTTP implementation of it.

pub mod error;
pub mod gateway;
pub mod http;

pub use error::ClientError;
pub use gateway::TaskStatusGateway;
pub use http::HttpClient;
