//! Shared error types for the services crate.

use thiserror::Error;

use sim_core::model::SettingsError;
use storage::repository::StorageError;

/// Errors emitted while building a `SimulationEngine`.
///
/// Dispatching events never fails; only loading content and validating
/// settings can.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
