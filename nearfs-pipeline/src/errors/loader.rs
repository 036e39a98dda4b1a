//! Error types for the loader module of the NEARFS pipeline.
//! Defines the errors that can occur while persisting payloads and checkpoints.
use nearfs_repository::{BlobStoreError, CheckpointRepositoryError};
use nearfs_shared::types::{BlockHeight, ContentKey};
use thiserror::Error;

/// Represents errors that can occur within the content loader.
///
/// All variants are fatal to a run: the checkpoint is never advanced past a
/// block whose payloads or checkpoint could not be made durable.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Failed to store object {content_key}: {source}")]
    StorageWrite {
        content_key: ContentKey,
        #[source]
        source: BlobStoreError,
    },
    #[error("Failed to write checkpoint at block {height}: {source}")]
    CheckpointWrite {
        height: BlockHeight,
        #[source]
        source: CheckpointRepositoryError,
    },
    #[error("Failed to read checkpoint: {0}")]
    CheckpointRead(#[source] CheckpointRepositoryError),
}
