//! Error types for the consumer module of the NEARFS pipeline.
//! Defines the errors that can occur while pulling blocks from a block source.
use nearfs_shared::types::BlockHeight;
use thiserror::Error;

/// Represents errors that can occur within a block source.
///
/// Every variant ends the block stream. Retrying belongs to whoever restarts
/// the run, which resumes from the last committed checkpoint.
#[derive(Debug, Error, Clone)]
pub enum ConsumerError {
    #[error("Error listing blocks after {start_after}: {message}")]
    Listing { start_after: String, message: String },
    #[error("Error fetching object '{key}': {message}")]
    Fetch { key: String, message: String },
    #[error("Error decoding object '{key}': {message}")]
    Decode { key: String, message: String },
    #[error("Invalid block folder name: {0}")]
    InvalidBlockFolder(String),
    #[error("Block {height} received after block {last_committed} was committed")]
    OutOfOrder {
        height: BlockHeight,
        last_committed: BlockHeight,
    },
    #[error("Block {height} is below the start height {start_height}")]
    BeforeStart {
        height: BlockHeight,
        start_height: BlockHeight,
    },
    #[error("Stream error: {0}")]
    StreamError(String),
}
