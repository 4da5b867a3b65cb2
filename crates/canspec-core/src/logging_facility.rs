//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use canspec_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```
//!
//! Engine operations (`parse`, `compute_diff`, `analyze`, `import`) emit a
//! start event followed by one end or end_error event. Requests rejected
//! before any work begins emit a lone end_error.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use canspec_core_types::schema;
pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};

#[doc(hidden)]
pub use tracing;
