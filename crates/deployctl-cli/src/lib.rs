//! deployctl CLI library.
//!
//! The binary in `main.rs` is thin wiring; the task wait orchestrator and
//! its progress renderer live here so they can be tested without a server.

pub mod config;
pub mod input;
pub mod wait;
