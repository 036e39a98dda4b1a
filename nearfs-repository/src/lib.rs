//! # NEARFS Repository
//! This crate provides the storage seams of the loader: a byte-exact
//! [`BlobStore`] for content-addressed objects and a [`CheckpointRepository`]
//! recording ingestion progress. It includes in-memory, local filesystem, S3
//! and PostgreSQL implementations.
pub mod blob;
pub mod errors;
pub mod interfaces;
pub mod local;
pub mod memory;
pub mod postgres;
pub mod s3;
mod source;

pub use blob::BlobCheckpointRepository;
pub use errors::{BlobStoreError, CheckpointRepositoryError};
pub use interfaces::{BlobStore, CheckpointRepository};
pub use local::LocalBlobStore;
pub use memory::{MemoryBlobStore, MemoryCheckpointRepository};
pub use postgres::PostgresCheckpointRepository;
pub use s3::S3BlobStore;
pub use source::StorageSource;
