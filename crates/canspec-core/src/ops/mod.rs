pub mod import_ops;
pub mod repository;

pub use import_ops::{import_into, run_import, ImportOutcome, ImportRequest, ImportService};
pub use repository::{ImportRepository, InMemoryImportRepository};
