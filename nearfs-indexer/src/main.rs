//! NEARFS Indexer Main Entry Point
//!
//! Loads `fs_store` payloads from NEAR Lake into a content-addressed store.
//! Exits with a non-zero status on any fatal error; the next run resumes
//! after the last committed block.

use clap::Parser;
use dotenv::dotenv;
use nearfs_indexer::{Cli, Dependencies, IndexingError};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "nearfs_indexer=info,nearfs_pipeline=info,nearfs_repository=info";

/// Initialize tracing/logging.
fn init_tracing(json_log: bool) -> Result<(), IndexingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if json_log {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to initialize tracing: {}", e)))?;
    }

    info!(
        service_name = "nearfs-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        json_log,
        "Tracing initialized"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    init_tracing(cli.json_log)?;

    info!("Starting NEARFS loader");

    let deps = match Dependencies::new(&cli).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match deps.orchestrator.run().await {
        Ok(summary) => {
            info!(
                blocks_processed = summary.blocks_processed,
                last_committed_height = ?summary.last_committed_height,
                "NEARFS loader completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "NEARFS loader failed");
            Err(e.into())
        }
    }
}
