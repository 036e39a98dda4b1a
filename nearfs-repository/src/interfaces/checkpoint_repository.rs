use nearfs_shared::types::BlockHeight;

use crate::errors::CheckpointRepositoryError;

/// Trait for interacting with the checkpoint repository.
///
/// Holds a single record: the highest block height whose processing fully
/// completed. The orchestrator is the only writer.
#[async_trait::async_trait]
pub trait CheckpointRepository: Send + Sync {
    /// Returns the last committed height, or `None` on a fresh start.
    async fn read(&self) -> Result<Option<BlockHeight>, CheckpointRepositoryError>;

    /// Records `height` as committed. Durable once this returns `Ok`.
    async fn write(&self, height: BlockHeight) -> Result<(), CheckpointRepositoryError>;
}
