//! CanSpec Core - CAN specification import and compatibility engine
//!
//! This crate turns uploaded CAN bus specifications into structured
//! snapshots and judges how safely one version can replace another:
//! - CSV and JSON parsers producing messages and signals
//! - Import lifecycle with content hashing and duplicate detection
//! - Deterministic snapshot diff with severity classification
//! - Compatibility scoring, issue translation and impact assessment
//! - Markdown rendering of diffs for review workflows

macro_rules! display_as_debug {
    ($($ty:ty),*) => {
        $(
            impl ::std::fmt::Display for $ty {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    ::std::fmt::Debug::fmt(self, f)
                }
            }
        )*
    };
}

pub mod analysis;
pub mod config;
pub mod diff;
pub mod digest;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod parser;

// Re-export commonly used types
pub use analysis::{analyze_spec_diff, analyze_spec_diff_with_context, CompatibilityAnalysis};
pub use canspec_core_types::RequestContext;
pub use config::EngineConfig;
pub use diff::{compute_diff, SpecDiff};
pub use errors::{CanSpecError, ExError, ExErrorKind, Result};
pub use model::{CanSpecImport, CanSpecMessage, CanSpecSignal, MessageId, Metadata};
pub use ops::{ImportRepository, InMemoryImportRepository};
pub use parser::{parse, ParseResult};
