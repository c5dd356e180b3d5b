//! Structured logging facility for BikeWatch
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use bikewatch_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```
//!
//! Service operations own the start/end events. Stores and the assignment
//! engine never emit them, so each operation logs exactly one start and one
//! end (or end_error) regardless of how many conflict retries it takes.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{capture_scoped, init_test_capture, CapturedEvent, TestCapture};
