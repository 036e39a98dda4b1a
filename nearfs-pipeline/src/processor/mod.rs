//! Payload extraction.
//!
//! Walks the receipts of a block and yields the decoded `args` of every
//! function call to the sentinel method (`fs_store`). Receipts whose receiver
//! is rejected by the [`AccountFilter`] are skipped; the rest of the block is
//! still processed.

pub mod action;
mod filter;

use nearfs_shared::types::{Block, Payload, RawAction, Receipt};

use crate::errors::{DecodeError, ProcessorError};

pub use action::{decode_action, Action, ActionKind, FunctionCallAction};
pub use filter::AccountFilter;

/// Method name whose arguments are stored as content.
pub const DEFAULT_SENTINEL_METHOD: &str = "fs_store";

/// Extracts payloads from blocks.
///
/// Stateless across blocks: the same block always yields the same payloads,
/// in receipt order and then action order.
#[derive(Debug, Clone)]
pub struct PayloadExtractor {
    filter: AccountFilter,
    sentinel_method: String,
}

impl Default for PayloadExtractor {
    fn default() -> Self {
        Self::new(AccountFilter::allow_all())
    }
}

impl PayloadExtractor {
    pub fn new(filter: AccountFilter) -> Self {
        Self {
            filter,
            sentinel_method: DEFAULT_SENTINEL_METHOD.to_string(),
        }
    }

    pub fn with_sentinel_method(mut self, method: impl Into<String>) -> Self {
        self.sentinel_method = method.into();
        self
    }

    pub fn filter(&self) -> &AccountFilter {
        &self.filter
    }

    pub fn sentinel_method(&self) -> &str {
        &self.sentinel_method
    }

    /// Lazily yields the payloads of `block`.
    ///
    /// A malformed action yields `ProcessorError::Decode`; callers should stop
    /// at the first error.
    pub fn extract<'a>(
        &'a self,
        block: &'a Block,
    ) -> impl Iterator<Item = Result<Payload, ProcessorError>> + 'a {
        block
            .receipts()
            .filter(move |receipt| self.filter.accepts(&receipt.receiver_id))
            .filter_map(|receipt| {
                receipt
                    .receipt
                    .action
                    .as_ref()
                    .map(|action_receipt| (receipt, action_receipt))
            })
            .flat_map(move |(receipt, action_receipt)| {
                action_receipt
                    .actions
                    .iter()
                    .enumerate()
                    .filter_map(move |(index, raw)| {
                        self.extract_action(receipt, index, raw).transpose()
                    })
            })
    }

    /// Collects every payload of `block`, failing on the first decode error.
    pub fn extract_all(&self, block: &Block) -> Result<Vec<Payload>, ProcessorError> {
        self.extract(block).collect()
    }

    fn extract_action(
        &self,
        receipt: &Receipt,
        index: usize,
        raw: &RawAction,
    ) -> Result<Option<Payload>, ProcessorError> {
        let decode_error = |source: DecodeError| ProcessorError::Decode {
            receipt_id: receipt.receipt_id.clone(),
            index,
            source,
        };

        match decode_action(raw).map_err(decode_error)? {
            Action::FunctionCall(call) if call.method_name == self.sentinel_method => {
                call.payload().map(Some).map_err(decode_error)
            }
            _ => Ok(None),
        }
    }
}
