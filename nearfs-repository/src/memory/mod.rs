//! In-memory storage backends for testing and local development.
mod blob_store;
mod checkpoint_repository;

pub use blob_store::MemoryBlobStore;
pub use checkpoint_repository::MemoryCheckpointRepository;
