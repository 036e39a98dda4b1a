//! Block model as published by NEAR Lake.
//!
//! A block is stored as one `block.json` object plus one `shard_N.json` object
//! per shard. Only the fields the loader reads are modelled; everything else in
//! the source JSON is ignored on deserialization.
use serde::{Deserialize, Serialize};

/// Monotonic block sequence number.
pub type BlockHeight = u64;

/// Header fields of a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: BlockHeight,
    /// Production time in nanoseconds since the Unix epoch.
    pub timestamp: u64,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub prev_hash: String,
}

/// One block together with all of its shards.
///
/// Owned by the orchestrator for the duration of a single processing cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub shards: Vec<Shard>,
}

impl Block {
    pub fn new(header: BlockHeader, shards: Vec<Shard>) -> Self {
        Self { header, shards }
    }

    pub fn height(&self) -> BlockHeight {
        self.header.height
    }

    pub fn timestamp(&self) -> u64 {
        self.header.timestamp
    }

    /// Iterates over every receipt of every shard that carries a chunk.
    pub fn receipts(&self) -> impl Iterator<Item = &Receipt> {
        self.shards
            .iter()
            .filter_map(|shard| shard.chunk.as_ref())
            .flat_map(|chunk| chunk.receipts.iter())
    }
}

/// Contents of a `shard_N.json` object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shard {
    pub shard_id: u64,
    #[serde(default)]
    pub chunk: Option<Chunk>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(default)]
    pub receipts: Vec<Receipt>,
}

/// A unit of execution addressed from `predecessor_id` to `receiver_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub predecessor_id: String,
    pub receiver_id: String,
    #[serde(default)]
    pub receipt_id: String,
    pub receipt: ReceiptBody,
}

/// The externally tagged receipt kind.
///
/// Only the `Action` variant matters to the loader, so the body is modelled as
/// an optional field: `Data` receipts (and any kind added later) deserialize
/// with `action` unset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptBody {
    #[serde(rename = "Action", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionReceipt>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionReceipt {
    #[serde(default)]
    pub signer_id: String,
    #[serde(default)]
    pub actions: Vec<RawAction>,
}

/// An action exactly as it appeared in the source JSON.
///
/// Decoding into a typed action happens in the pipeline so that malformed
/// encodings surface as decode errors during extraction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAction(pub serde_json::Value);

impl From<serde_json::Value> for RawAction {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
