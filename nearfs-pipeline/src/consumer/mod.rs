//! Consumer module for the NEARFS pipeline.
//!
//! Provides the `BlockSource` trait for pulling blocks in height order from an
//! archival provider. Acts as the entry point for the pipeline, feeding blocks
//! to the extractor and the content writer.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use nearfs_shared::types::{Block, BlockHeight};

use crate::errors::ConsumerError;

pub mod lake;
pub mod mock;

pub use lake::{LakeConfig, LakeSource};
pub use mock::MockSource;

/// Ordered stream of blocks produced by a [`BlockSource`].
pub type BlockStream = Pin<Box<dyn Stream<Item = Result<Block, ConsumerError>> + Send>>;

/// Trait for block providers.
///
/// Implementations must yield blocks in strictly increasing height order,
/// starting at the first available height `>= start_height`. Heights may be
/// sparse. An error item ends the stream.
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Opens a stream of blocks starting at `start_height`.
    async fn stream_blocks(&self, start_height: BlockHeight) -> Result<BlockStream, ConsumerError>;
}
