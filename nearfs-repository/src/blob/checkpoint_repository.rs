use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use nearfs_shared::types::BlockHeight;

use crate::errors::{BlobStoreError, CheckpointRepositoryError};
use crate::interfaces::{BlobStore, CheckpointRepository};

/// Key of the checkpoint record inside the blob store.
pub const CHECKPOINT_KEY: &str = "latest_block_height";

/// Checkpoint repository that keeps the height as a decimal string in a blob
/// store, next to the content it describes.
pub struct BlobCheckpointRepository {
    store: Arc<dyn BlobStore>,
    key: String,
}

impl BlobCheckpointRepository {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self::with_key(store, CHECKPOINT_KEY)
    }

    pub fn with_key(store: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }
}

#[async_trait]
impl CheckpointRepository for BlobCheckpointRepository {
    async fn read(&self) -> Result<Option<BlockHeight>, CheckpointRepositoryError> {
        let data = match self.store.get(&self.key).await {
            Ok(data) => data,
            Err(BlobStoreError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value = String::from_utf8_lossy(&data);
        value
            .trim()
            .parse::<BlockHeight>()
            .map(Some)
            .map_err(|_| CheckpointRepositoryError::Corrupt(value.into_owned()))
    }

    async fn write(&self, height: BlockHeight) -> Result<(), CheckpointRepositoryError> {
        self.store
            .put(&self.key, Bytes::from(height.to_string()))
            .await?;
        Ok(())
    }
}
