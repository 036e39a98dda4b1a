mod blob_store;
mod checkpoint_repository;

pub use blob_store::BlobStoreError;
pub use checkpoint_repository::CheckpointRepositoryError;
