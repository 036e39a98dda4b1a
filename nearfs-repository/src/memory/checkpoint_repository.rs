use async_trait::async_trait;
use nearfs_shared::types::BlockHeight;
use tokio::sync::RwLock;

use crate::errors::CheckpointRepositoryError;
use crate::interfaces::CheckpointRepository;

/// In-memory checkpoint repository.
///
/// Keeps every written height so tests can assert on the commit sequence.
#[derive(Debug, Default)]
pub struct MemoryCheckpointRepository {
    history: RwLock<Vec<BlockHeight>>,
}

impl MemoryCheckpointRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository that already holds `height`.
    pub fn with_checkpoint(height: BlockHeight) -> Self {
        Self {
            history: RwLock::new(vec![height]),
        }
    }

    /// All heights written so far, oldest first.
    pub async fn history(&self) -> Vec<BlockHeight> {
        self.history.read().await.clone()
    }
}

#[async_trait]
impl CheckpointRepository for MemoryCheckpointRepository {
    async fn read(&self) -> Result<Option<BlockHeight>, CheckpointRepositoryError> {
        Ok(self.history.read().await.last().copied())
    }

    async fn write(&self, height: BlockHeight) -> Result<(), CheckpointRepositoryError> {
        self.history.write().await.push(height);
        Ok(())
    }
}
