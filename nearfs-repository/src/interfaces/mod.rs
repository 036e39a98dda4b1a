mod blob_store;
mod checkpoint_repository;

pub use blob_store::BlobStore;
pub use checkpoint_repository::CheckpointRepository;
