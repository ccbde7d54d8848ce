use async_trait::async_trait;
use sim_core::model::{Catalog, ContentError, Simulation};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::json::JsonFileCatalog;

/// Errors surfaced by catalog sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    InvalidContent(#[from] ContentError),
}

/// Source of simulation content.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Load the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the content cannot be read or is malformed.
    async fn load_catalog(&self) -> Result<Catalog, StorageError>;

    /// Load a single simulation by catalog index.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the index is out of range.
    async fn load_simulation(&self, index: usize) -> Result<Simulation, StorageError> {
        self.load_catalog()
            .await?
            .simulation(index)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

/// Catalog held in memory, for tests and embedded content.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    catalog: Arc<Mutex<Catalog>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Swap the held catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the lock is poisoned.
    pub fn replace(&self, catalog: Catalog) -> Result<(), StorageError> {
        let mut guard = self
            .catalog
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        *guard = catalog;
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn load_catalog(&self) -> Result<Catalog, StorageError> {
        let guard = self
            .catalog
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Catalog source behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub catalog: Arc<dyn CatalogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(InMemoryCatalog::new(catalog)),
        }
    }

    #[must_use]
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            catalog: Arc::new(JsonFileCatalog::new(path)),
        }
    }
}
