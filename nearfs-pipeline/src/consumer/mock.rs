//! In-memory block source for development and testing.
//!
//! ## Usage
//!
//! ```ignore
//! use nearfs_pipeline::consumer::MockSource;
//!
//! let source = MockSource::new(blocks).fail_after(2);
//! let stream = source.stream_blocks(10).await?;
//! ```

use async_trait::async_trait;
use nearfs_shared::types::{Block, BlockHeight};
use tokio::sync::Mutex;

use crate::consumer::{BlockSource, BlockStream};
use crate::errors::ConsumerError;

/// Block source that replays a fixed list of blocks.
pub struct MockSource {
    blocks: Vec<Block>,
    fail_after: Option<usize>,
    requested: Mutex<Vec<BlockHeight>>,
}

impl MockSource {
    /// Creates a source over `blocks`. They are served in height order no
    /// matter how they are passed in.
    pub fn new(mut blocks: Vec<Block>) -> Self {
        blocks.sort_by_key(Block::height);
        Self {
            blocks,
            fail_after: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Makes every stream fail after yielding `count` blocks.
    pub fn fail_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Start heights of every `stream_blocks` call, in call order.
    pub async fn requested_start_heights(&self) -> Vec<BlockHeight> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl BlockSource for MockSource {
    async fn stream_blocks(&self, start_height: BlockHeight) -> Result<BlockStream, ConsumerError> {
        self.requested.lock().await.push(start_height);

        let mut items: Vec<Result<Block, ConsumerError>> = self
            .blocks
            .iter()
            .filter(|block| block.height() >= start_height)
            .cloned()
            .map(Ok)
            .collect();

        if let Some(count) = self.fail_after {
            items.truncate(count);
            items.push(Err(ConsumerError::StreamError(format!(
                "mock stream failed after {} blocks",
                count
            ))));
        }

        Ok(Box::pin(futures::stream::iter(items)))
    }
}
