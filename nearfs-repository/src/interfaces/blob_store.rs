use bytes::Bytes;

use crate::errors::BlobStoreError;

/// Trait for byte-exact key/value object storage.
///
/// Keys are the canonical string form of a content key (or a fixed record
/// name such as the checkpoint). Implementations must not transform the bytes.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns whether an object is stored under `key`.
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError>;

    /// Returns the object stored under `key`, or `BlobStoreError::NotFound`.
    async fn get(&self, key: &str) -> Result<Bytes, BlobStoreError>;

    /// Stores `data` under `key`, replacing any previous object.
    ///
    /// A successful return means the object is durable.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), BlobStoreError>;
}
