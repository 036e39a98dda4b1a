//! Checkpoint storage on top of any [`BlobStore`](crate::BlobStore).
mod checkpoint_repository;

pub use checkpoint_repository::{BlobCheckpointRepository, CHECKPOINT_KEY};
