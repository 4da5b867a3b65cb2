//! Specification model: passive data structures shared by the parser, the
//! diff engine and the import lifecycle.

pub mod diff;
pub mod format;
pub mod import;
pub mod message;
pub mod metadata;

pub use diff::{CanSpecDiff, ChangeCategory, ChangeSeverity, DiffType, EntityType};
pub use format::SpecFormat;
pub use import::{CanSpecImport, ImportFile, ImportStatus};
pub use message::{CanSpecMessage, CanSpecSignal, MessageId};
pub use metadata::{Metadata, MetadataValue};
