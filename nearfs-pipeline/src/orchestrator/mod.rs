//! This module defines the `Orchestrator` responsible for coordinating the
//! ingestion pipeline.
//! It pulls blocks from the consumer one at a time, runs the extractor over
//! each block, stores the payloads through the loader and commits a
//! checkpoint once every payload of the block is durable.
mod progress;

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use nearfs_repository::CheckpointRepository;
use nearfs_shared::types::{Block, BlockHeight};
use tracing::{debug, info, instrument};

use crate::consumer::BlockSource;
use crate::errors::{ConsumerError, LoaderError, OrchestratorError};
use crate::loader::{ContentWriter, WriteSummary};
use crate::processor::PayloadExtractor;

pub use progress::{Progress, ProgressSnapshot, PROGRESS_WINDOW};

/// Default interval between progress summaries.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Explicit start height, taking priority over the checkpoint.
    pub start_height: Option<BlockHeight>,
    /// Start height used when there is neither an override nor a checkpoint.
    pub default_start_height: Option<BlockHeight>,
    /// Maximum number of blocks to process in this run.
    pub limit: Option<u64>,
    pub progress_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            start_height: None,
            default_start_height: None,
            limit: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Picks the first height to request.
///
/// Priority: explicit override, then the block after the checkpoint, then the
/// configured default, then genesis.
pub fn resolve_start_height(
    override_height: Option<BlockHeight>,
    checkpoint: Option<BlockHeight>,
    default_height: Option<BlockHeight>,
) -> BlockHeight {
    override_height
        .or_else(|| checkpoint.map(|height| height.saturating_add(1)))
        .or(default_height)
        .unwrap_or(0)
}

/// Totals of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub start_height: BlockHeight,
    pub blocks_processed: u64,
    pub payloads_extracted: u64,
    pub payloads_written: u64,
    pub payloads_deduplicated: u64,
    /// Highest height committed by this run, `None` if no block completed.
    pub last_committed_height: Option<BlockHeight>,
}

/// State of one run, owned by [`Orchestrator::run`].
#[derive(Debug)]
pub struct RunState {
    start_height: BlockHeight,
    blocks_processed: u64,
    payloads_extracted: u64,
    payloads_written: u64,
    payloads_deduplicated: u64,
    last_committed_height: Option<BlockHeight>,
    progress: Progress,
}

impl RunState {
    pub fn new(start_height: BlockHeight, progress_interval: Duration) -> Self {
        Self {
            start_height,
            blocks_processed: 0,
            payloads_extracted: 0,
            payloads_written: 0,
            payloads_deduplicated: 0,
            last_committed_height: None,
            progress: Progress::new(progress_interval),
        }
    }

    pub fn last_committed_height(&self) -> Option<BlockHeight> {
        self.last_committed_height
    }

    fn commit(&mut self, height: BlockHeight, extracted: usize, summary: WriteSummary) {
        self.blocks_processed += 1;
        self.payloads_extracted += extracted as u64;
        self.payloads_written += summary.written as u64;
        self.payloads_deduplicated += summary.deduplicated as u64;
        self.last_committed_height = Some(height);
    }

    fn limit_reached(&self, limit: Option<u64>) -> bool {
        limit.is_some_and(|limit| self.blocks_processed >= limit)
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            start_height: self.start_height,
            blocks_processed: self.blocks_processed,
            payloads_extracted: self.payloads_extracted,
            payloads_written: self.payloads_written,
            payloads_deduplicated: self.payloads_deduplicated,
            last_committed_height: self.last_committed_height,
        }
    }
}

/// `Orchestrator` drives a single-consumer forward scan over the chain.
pub struct Orchestrator {
    source: Arc<dyn BlockSource>,
    extractor: PayloadExtractor,
    writer: ContentWriter,
    checkpoints: Arc<dyn CheckpointRepository>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Creates a new `Orchestrator` with the default configuration.
    pub fn new(
        source: Arc<dyn BlockSource>,
        extractor: PayloadExtractor,
        writer: ContentWriter,
        checkpoints: Arc<dyn CheckpointRepository>,
    ) -> Self {
        Self::with_config(
            source,
            extractor,
            writer,
            checkpoints,
            OrchestratorConfig::default(),
        )
    }

    pub fn with_config(
        source: Arc<dyn BlockSource>,
        extractor: PayloadExtractor,
        writer: ContentWriter,
        checkpoints: Arc<dyn CheckpointRepository>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            source,
            extractor,
            writer,
            checkpoints,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn writer(&self) -> &ContentWriter {
        &self.writer
    }

    /// Runs until the source is exhausted, the block limit is reached or a
    /// fatal error occurs.
    ///
    /// On error the checkpoint is left at the last fully committed block, so
    /// the next run resumes right after it.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<RunSummary, OrchestratorError> {
        let checkpoint = self
            .checkpoints
            .read()
            .await
            .map_err(LoaderError::CheckpointRead)?;
        let start_height = resolve_start_height(
            self.config.start_height,
            checkpoint,
            self.config.default_start_height,
        );

        info!(
            start_height,
            checkpoint = ?checkpoint,
            limit = ?self.config.limit,
            "Starting loader"
        );

        let mut state = RunState::new(start_height, self.config.progress_interval);

        if state.limit_reached(self.config.limit) {
            info!("Block limit is zero, nothing to do");
            return Ok(state.summary());
        }

        let mut blocks = self.source.stream_blocks(start_height).await?;

        while let Some(block) = blocks.next().await {
            let block = block?;
            self.process_block(&block, &mut state).await?;

            if state.limit_reached(self.config.limit) {
                info!(blocks_processed = state.blocks_processed, "Block limit reached");
                break;
            }
        }

        let summary = state.summary();
        if let Some(snapshot) = state.progress.latest() {
            log_progress(snapshot);
        }
        info!(
            start_height = summary.start_height,
            blocks_processed = summary.blocks_processed,
            payloads_extracted = summary.payloads_extracted,
            payloads_written = summary.payloads_written,
            payloads_deduplicated = summary.payloads_deduplicated,
            last_committed_height = ?summary.last_committed_height,
            "Loader finished"
        );
        Ok(summary)
    }

    async fn process_block(
        &self,
        block: &Block,
        state: &mut RunState,
    ) -> Result<(), OrchestratorError> {
        let height = block.height();
        if height < state.start_height {
            return Err(ConsumerError::BeforeStart {
                height,
                start_height: state.start_height,
            }
            .into());
        }
        if let Some(last_committed) = state.last_committed_height {
            if height <= last_committed {
                return Err(ConsumerError::OutOfOrder {
                    height,
                    last_committed,
                }
                .into());
            }
        }

        let snapshot = state.progress.observe(block);

        let payloads = self.extractor.extract_all(block)?;
        let extracted = payloads.len();
        let written = self.writer.write_block(payloads).await?;

        self.checkpoints
            .write(height)
            .await
            .map_err(|source| LoaderError::CheckpointWrite { height, source })?;
        state.commit(height, extracted, written);

        debug!(
            block_height = height,
            shards = snapshot.shards,
            payloads = extracted,
            written = written.written,
            deduplicated = written.deduplicated,
            speed = format!("{:.2}", snapshot.speed),
            lag_secs = format!("{:.2}", snapshot.lag.as_secs_f64()),
            "Committed block"
        );

        if state.progress.should_report(Instant::now()) {
            log_progress(&snapshot);
        }

        Ok(())
    }
}

fn log_progress(snapshot: &ProgressSnapshot) {
    info!(
        block_height = snapshot.block_height,
        blocks_processed = snapshot.blocks_processed,
        speed = format!("{:.2} blocks/s", snapshot.speed),
        lag = format!("{:.2}s", snapshot.lag.as_secs_f64()),
        fully_synced_in = snapshot
            .eta
            .map(|eta| format!("{:.2}s", eta.as_secs_f64()))
            .unwrap_or_else(|| "unknown".to_string()),
        "Processing progress"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_start_height_priority() {
        assert_eq!(resolve_start_height(Some(5), Some(100), Some(7)), 5);
        assert_eq!(resolve_start_height(None, Some(100), Some(7)), 101);
        assert_eq!(resolve_start_height(None, None, Some(7)), 7);
        assert_eq!(resolve_start_height(None, None, None), 0);
    }

    #[test]
    fn test_resolve_start_height_override_zero() {
        assert_eq!(resolve_start_height(Some(0), Some(100), None), 0);
    }

    #[test]
    fn test_resolve_start_height_saturates() {
        assert_eq!(
            resolve_start_height(None, Some(BlockHeight::MAX), None),
            BlockHeight::MAX
        );
    }

    #[test]
    fn test_run_state_limit() {
        let mut state = RunState::new(10, DEFAULT_PROGRESS_INTERVAL);
        assert!(state.limit_reached(Some(0)));
        assert!(!state.limit_reached(Some(1)));
        assert!(!state.limit_reached(None));

        state.commit(
            10,
            2,
            WriteSummary {
                written: 1,
                deduplicated: 1,
            },
        );

        assert!(state.limit_reached(Some(1)));
        assert_eq!(state.last_committed_height(), Some(10));
        assert_eq!(
            state.summary(),
            RunSummary {
                start_height: 10,
                blocks_processed: 1,
                payloads_extracted: 2,
                payloads_written: 1,
                payloads_deduplicated: 1,
                last_committed_height: Some(10),
            }
        );
    }
}
