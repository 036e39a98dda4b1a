//! Object naming of the NEAR Lake bucket.
//!
//! ```text
//! 000009820210/block.json
//! 000009820210/shard_0.json
//! 000009820210/shard_1.json
//! ```
use nearfs_shared::types::BlockHeight;

use crate::errors::ConsumerError;

/// Folder name of a block: the height zero-padded to 12 digits.
pub fn block_folder(height: BlockHeight) -> String {
    format!("{:012}", height)
}

pub fn block_key(height: BlockHeight) -> String {
    format!("{}/block.json", block_folder(height))
}

pub fn shard_key(height: BlockHeight, shard: usize) -> String {
    format!("{}/shard_{}.json", block_folder(height), shard)
}

/// Parses a common prefix returned by a delimited listing (`000009820210/`).
pub fn parse_block_folder(prefix: &str) -> Result<BlockHeight, ConsumerError> {
    let folder = prefix.strip_suffix('/').unwrap_or(prefix);
    if folder.is_empty() || !folder.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConsumerError::InvalidBlockFolder(prefix.to_string()));
    }
    folder
        .parse()
        .map_err(|_| ConsumerError::InvalidBlockFolder(prefix.to_string()))
}
