use std::collections::BTreeMap;

use crate::errors::{CanSpecError, Result};
use crate::model::{CanSpecImport, ImportStatus};

/// Persistence seam for imports
///
/// The engine never performs I/O itself; callers plug in whatever store
/// backs the upload layer.
pub trait ImportRepository {
    /// # Errors
    ///
    /// Returns `AlreadyExists` if an import with the same id is stored.
    fn insert(&mut self, import: CanSpecImport) -> Result<()>;

    /// Replace a stored import
    ///
    /// # Errors
    ///
    /// Returns `ImportNotFound` if no import with that id is stored.
    fn update(&mut self, import: CanSpecImport) -> Result<()>;

    /// # Errors
    ///
    /// Returns `ImportNotFound` if no import with that id is stored.
    fn delete(&mut self, import_id: &str) -> Result<CanSpecImport>;

    /// # Errors
    ///
    /// Returns `ImportNotFound` if no import with that id is stored.
    fn get(&self, import_id: &str) -> Result<CanSpecImport>;

    /// Earliest import of the given content that did not fail
    ///
    /// # Errors
    ///
    /// Backend failures only; a miss is `Ok(None)`.
    fn find_by_content_hash(&self, content_hash: &str) -> Result<Option<CanSpecImport>>;
}

/// Map-backed repository
///
/// Not thread-safe; wrap it if it must be shared.
#[derive(Debug, Clone, Default)]
pub struct InMemoryImportRepository {
    imports: BTreeMap<String, CanSpecImport>,
}

impl InMemoryImportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Stored imports in id order (UUID v7, so creation order)
    pub fn iter(&self) -> impl Iterator<Item = &CanSpecImport> {
        self.imports.values()
    }
}

fn not_found(import_id: &str) -> CanSpecError {
    CanSpecError::ImportNotFound {
        import_id: import_id.to_string(),
    }
}

impl ImportRepository for InMemoryImportRepository {
    fn insert(&mut self, import: CanSpecImport) -> Result<()> {
        if self.imports.contains_key(import.id()) {
            return Err(CanSpecError::AlreadyExists {
                import_id: import.id().to_string(),
            });
        }
        self.imports.insert(import.id().to_string(), import);
        Ok(())
    }

    fn update(&mut self, import: CanSpecImport) -> Result<()> {
        let slot = self
            .imports
            .get_mut(import.id())
            .ok_or_else(|| not_found(import.id()))?;
        *slot = import;
        Ok(())
    }

    fn delete(&mut self, import_id: &str) -> Result<CanSpecImport> {
        self.imports
            .remove(import_id)
            .ok_or_else(|| not_found(import_id))
    }

    fn get(&self, import_id: &str) -> Result<CanSpecImport> {
        self.imports
            .get(import_id)
            .cloned()
            .ok_or_else(|| not_found(import_id))
    }

    fn find_by_content_hash(&self, content_hash: &str) -> Result<Option<CanSpecImport>> {
        Ok(self
            .imports
            .values()
            .find(|i| {
                i.file().content_hash == content_hash
                    && !matches!(i.status(), ImportStatus::Failed { .. })
            })
            .cloned())
    }
}
