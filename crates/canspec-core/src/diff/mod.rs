//! Specification diff engine.
//!
//! Compares two message lists and produces a structured, deterministic diff
//! suitable for compatibility analysis and human review.
//!
//! ## Entry point
//!
//! ```
//! use canspec_core::diff::{compute_diff, render_human_summary, DiffOptions};
//! use canspec_core::model::{CanSpecMessage, MessageId};
//!
//! let old = vec![CanSpecMessage::new(MessageId::new(0x100), "EngineStatus", 8)];
//! let diff = compute_diff(&old, &[], &DiffOptions::default());
//! assert_eq!(diff.summary.messages_removed, 1);
//! let report = render_human_summary(&diff);
//! assert!(report.contains("Critical"));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical diffs in identical order.
//! - **One diff per modified signal**: categorised by the most significant change.
//! - **Pure summary**: [`DiffSummary`] is a fold over the diff list.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{classify_signal_change, compute_diff, DiffOptions};
pub use human_summary::render_human_summary;
pub use model::{DiffSummary, SpecDiff};
