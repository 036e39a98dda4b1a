//! This module defines the `ContentWriter` responsible for persisting payloads
//! to a content-addressed blob store.
//! Every payload is stored under the hex form of its SHA2-256 multihash, and
//! content that is already present is never rewritten.
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt};
use nearfs_repository::{BlobStore, BlobStoreError};
use nearfs_shared::types::{ContentKey, Payload};
use tracing::debug;

pub use crate::errors::LoaderError;

/// Default number of concurrent writes within a block.
pub const DEFAULT_WRITE_CONCURRENCY: usize = 20;

/// Outcome of writing the payloads of one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Objects newly stored.
    pub written: usize,
    /// Payloads whose content was already stored.
    pub deduplicated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteOutcome {
    Written,
    Deduplicated,
}

/// `ContentWriter` stores payloads keyed by their content.
pub struct ContentWriter {
    store: Arc<dyn BlobStore>,
    concurrency: usize,
    objects_written: AtomicU64,
    duplicates_skipped: AtomicU64,
}

impl ContentWriter {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self::with_concurrency(store, DEFAULT_WRITE_CONCURRENCY)
    }

    /// Creates a writer allowing at most `concurrency` writes in flight per
    /// block. Zero is treated as one.
    pub fn with_concurrency(store: Arc<dyn BlobStore>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
            objects_written: AtomicU64::new(0),
            duplicates_skipped: AtomicU64::new(0),
        }
    }

    /// Writes a single payload, returning its content key.
    ///
    /// A no-op when an object with the same key already exists.
    pub async fn write(&self, payload: &Payload) -> Result<ContentKey, LoaderError> {
        let content_key = payload.content_key();
        self.store_payload(content_key, payload).await?;
        Ok(content_key)
    }

    /// Writes all payloads of one block.
    ///
    /// Returns only once every payload is durably stored. The first failure
    /// aborts the block; payloads already written stay in the store, which is
    /// harmless since keys are derived from content.
    pub async fn write_block(&self, payloads: Vec<Payload>) -> Result<WriteSummary, LoaderError> {
        let mut seen = HashSet::with_capacity(payloads.len());
        let mut summary = WriteSummary::default();

        // Identical payloads in one block would race on exists-then-put.
        let unique: Vec<(ContentKey, Payload)> = payloads
            .into_iter()
            .filter_map(|payload| {
                let content_key = payload.content_key();
                if seen.insert(content_key) {
                    Some((content_key, payload))
                } else {
                    summary.deduplicated += 1;
                    None
                }
            })
            .collect();

        if summary.deduplicated > 0 {
            self.duplicates_skipped
                .fetch_add(summary.deduplicated as u64, Ordering::Relaxed);
        }

        let outcomes: Vec<WriteOutcome> = futures::stream::iter(
            unique
                .iter()
                .map(|(content_key, payload)| self.store_payload(*content_key, payload)),
        )
        .buffer_unordered(self.concurrency)
        .try_collect()
        .await?;

        for outcome in outcomes {
            match outcome {
                WriteOutcome::Written => summary.written += 1,
                WriteOutcome::Deduplicated => summary.deduplicated += 1,
            }
        }

        Ok(summary)
    }

    /// Total objects stored by this writer.
    pub fn objects_written(&self) -> u64 {
        self.objects_written.load(Ordering::Relaxed)
    }

    /// Total payloads skipped because their content was already stored.
    pub fn duplicates_skipped(&self) -> u64 {
        self.duplicates_skipped.load(Ordering::Relaxed)
    }

    async fn store_payload(
        &self,
        content_key: ContentKey,
        payload: &Payload,
    ) -> Result<WriteOutcome, LoaderError> {
        let key = content_key.to_string();
        let storage_error = |source: BlobStoreError| LoaderError::StorageWrite {
            content_key,
            source,
        };

        if self.store.exists(&key).await.map_err(storage_error)? {
            debug!(content_key = %key, "Content already stored");
            self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
            return Ok(WriteOutcome::Deduplicated);
        }

        self.store
            .put(&key, payload.clone().into_bytes())
            .await
            .map_err(storage_error)?;

        debug!(content_key = %key, size = payload.len(), "Stored content");
        self.objects_written.fetch_add(1, Ordering::Relaxed);
        Ok(WriteOutcome::Written)
    }
}
