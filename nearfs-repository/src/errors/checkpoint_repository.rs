use thiserror::Error;

use crate::errors::BlobStoreError;

#[derive(Debug, Error)]
/// Represents errors that can occur within the checkpoint repository.
pub enum CheckpointRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Storage error: {0}")]
    StorageError(#[from] BlobStoreError),
    #[error("Corrupt checkpoint value: {0:?}")]
    Corrupt(String),
    #[error("Block height {0} does not fit the checkpoint column")]
    HeightOutOfRange(u64),
}
