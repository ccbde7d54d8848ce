//! Catalog backend reading the authoring JSON format from disk.

mod records;

use async_trait::async_trait;
use sim_core::model::Catalog;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::repository::{CatalogRepository, StorageError};

pub use records::{
    CatalogRecord, DeliverablesRecord, MetadataRecord, OptionRecord, OutcomesRecord, RawId,
    ScenarioRecord, SimulationRecord, StepRecord, TheoryRecord,
};

/// Parse a catalog document held in memory.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::InvalidContent` for integrity failures.
pub fn parse_catalog(raw: &str) -> Result<Catalog, StorageError> {
    let record: CatalogRecord =
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
    let catalog = record.into_catalog()?;
    info!(simulations = catalog.len(), "catalog parsed");
    Ok(catalog)
}

/// Reads and parses the catalog file on every load.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogRepository for JsonFileCatalog {
    async fn load_catalog(&self) -> Result<Catalog, StorageError> {
        debug!(path = %self.path.display(), "reading catalog");
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => StorageError::NotFound,
                _ => StorageError::Io(format!("{}: {e}", self.path.display())),
            })?;
        parse_catalog(&raw)
    }
}
