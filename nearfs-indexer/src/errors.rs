//! Error types for the NEARFS indexer binary.

use nearfs_pipeline::errors::{OrchestratorError, ProcessorError};
use nearfs_repository::{BlobStoreError, CheckpointRepositoryError};
use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid include/exclude pattern.
    #[error("Filter error: {0}")]
    FilterError(#[from] ProcessorError),

    /// Content store could not be opened.
    #[error("Storage error: {0}")]
    StorageError(#[from] BlobStoreError),

    /// Checkpoint store could not be opened.
    #[error("Checkpoint error: {0}")]
    CheckpointError(#[from] CheckpointRepositoryError),

    /// Fatal error while loading blocks.
    #[error("Orchestrator error: {0}")]
    OrchestratorError(#[from] OrchestratorError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
