//! Structured logging facility for cmdagg
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use cmdagg_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```
//!
//! # Boundary ownership
//!
//! The command aggregator owns `start`/`end`/`end_error` events for commands
//! dispatched by key. Commands, hierarchies and the notification engine only
//! emit `tracing::debug!`/`tracing::trace!` details.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
