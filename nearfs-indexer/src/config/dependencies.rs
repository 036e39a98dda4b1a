//! Dependency initialization and wiring for the indexer.

use std::sync::Arc;

use nearfs_pipeline::consumer::lake::DEFAULT_POLL_INTERVAL;
use nearfs_pipeline::consumer::{LakeConfig, LakeSource};
use nearfs_pipeline::loader::ContentWriter;
use nearfs_pipeline::orchestrator::{Orchestrator, OrchestratorConfig, DEFAULT_PROGRESS_INTERVAL};
use nearfs_pipeline::processor::{AccountFilter, PayloadExtractor};
use nearfs_repository::postgres::DEFAULT_CHECKPOINT_ID;
use nearfs_repository::{
    BlobCheckpointRepository, BlobStore, CheckpointRepository, PostgresCheckpointRepository,
    StorageSource,
};
use tracing::info;

use crate::config::Cli;
use crate::IndexingError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from the command line.
    ///
    /// Filters and the storage location are validated before any connection
    /// is made. The checkpoint lives next to the content unless a database URL
    /// is given.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If any part of the configuration is invalid
    pub async fn new(cli: &Cli) -> Result<Self, IndexingError> {
        if cli.batch_size == 0 {
            return Err(IndexingError::config("batch size must be at least 1"));
        }
        if cli.write_concurrency == 0 {
            return Err(IndexingError::config("write concurrency must be at least 1"));
        }
        if cli.method_name.is_empty() {
            return Err(IndexingError::config("method name must not be empty"));
        }

        let filter = AccountFilter::new(&cli.include, &cli.exclude)?;
        let storage = StorageSource::parse(&cli.storage)?;

        info!(
            bucket = %cli.bucket_name,
            region = %cli.region_name,
            endpoint = ?cli.endpoint,
            storage = ?storage,
            include = ?cli.include,
            exclude = ?cli.exclude,
            method_name = %cli.method_name,
            "Initializing dependencies"
        );

        let store = storage.into_store().await?;
        let checkpoints = Self::checkpoint_repository(cli, store.clone()).await?;

        let source = LakeSource::from_env(LakeConfig {
            bucket: cli.bucket_name.clone(),
            region: cli.region_name.clone(),
            endpoint: cli.endpoint.clone(),
            batch_size: cli.batch_size,
            follow: !cli.exit_at_tip,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
        .await;

        let extractor = PayloadExtractor::new(filter).with_sentinel_method(cli.method_name.clone());
        let writer = ContentWriter::with_concurrency(store, cli.write_concurrency);

        let orchestrator = Orchestrator::with_config(
            Arc::new(source),
            extractor,
            writer,
            checkpoints,
            OrchestratorConfig {
                start_height: cli.start_block_height,
                default_start_height: cli.default_start_block_height,
                limit: cli.limit,
                progress_interval: DEFAULT_PROGRESS_INTERVAL,
            },
        );

        Ok(Self { orchestrator })
    }

    async fn checkpoint_repository(
        cli: &Cli,
        store: Arc<dyn BlobStore>,
    ) -> Result<Arc<dyn CheckpointRepository>, IndexingError> {
        match &cli.database_url {
            Some(database_url) => {
                let repository = PostgresCheckpointRepository::connect(database_url).await?;
                info!(id = DEFAULT_CHECKPOINT_ID, "Using PostgreSQL checkpoint");
                Ok(Arc::new(repository))
            }
            None => {
                info!("Using checkpoint stored with the content");
                Ok(Arc::new(BlobCheckpointRepository::new(store)))
            }
        }
    }
}
