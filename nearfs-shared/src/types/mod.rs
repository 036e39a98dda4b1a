mod block;
mod content_key;
mod payload;

pub use block::{
    ActionReceipt, Block, BlockHeader, BlockHeight, Chunk, RawAction, Receipt, ReceiptBody, Shard,
};
pub use content_key::{ContentKey, ContentKeyError};
pub use payload::Payload;
