//! Command line and dependency initialization for the indexer.

mod dependencies;

use clap::Parser;
use nearfs_pipeline::consumer::lake::{DEFAULT_BATCH_SIZE, DEFAULT_BUCKET, DEFAULT_REGION};
use nearfs_pipeline::loader::DEFAULT_WRITE_CONCURRENCY;
use nearfs_pipeline::processor::DEFAULT_SENTINEL_METHOD;

pub use dependencies::Dependencies;

/// Loads data from NEAR Lake S3 into a content-addressed store.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Block height to start loading from. By default starts after the latest
    /// committed block height, then the default start height, then genesis
    #[arg(long, value_name = "HEIGHT")]
    pub start_block_height: Option<u64>,

    /// NEAR Lake bucket name
    #[arg(long, env = "NEAR_LAKE_BUCKET", default_value = DEFAULT_BUCKET)]
    pub bucket_name: String,

    /// NEAR Lake bucket region
    #[arg(long, env = "NEAR_LAKE_REGION", default_value = DEFAULT_REGION)]
    pub region_name: String,

    /// S3-compatible storage URL
    #[arg(long, env = "NEAR_LAKE_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// How many blocks to fetch in parallel
    #[arg(long, value_name = "N", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Include only accounts matching this glob pattern. Can be specified multiple times
    #[arg(long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Exclude accounts matching this glob pattern. Can be specified multiple times
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// How many blocks to load before stopping. Unlimited by default
    #[arg(long, value_name = "N")]
    pub limit: Option<u64>,

    /// Target dir or s3 location to write content to (`memory` for a dry run)
    #[arg(long, env = "NEARFS_STORAGE", value_name = "LOCATION", default_value = "storage")]
    pub storage: String,

    /// PostgreSQL URL to keep the checkpoint in instead of the content store
    #[arg(long, env = "DATABASE_URL", value_name = "URL")]
    pub database_url: Option<String>,

    /// Start height used when there is no checkpoint and no explicit start height
    #[arg(long, env = "NEARFS_DEFAULT_START_BLOCK_HEIGHT", value_name = "HEIGHT")]
    pub default_start_block_height: Option<u64>,

    /// Maximum number of concurrent writes within a block
    #[arg(long, value_name = "N", default_value_t = DEFAULT_WRITE_CONCURRENCY)]
    pub write_concurrency: usize,

    /// Method name whose arguments are stored
    #[arg(long, value_name = "NAME", default_value = DEFAULT_SENTINEL_METHOD)]
    pub method_name: String,

    /// Stop at the chain tip instead of waiting for new blocks
    #[arg(long)]
    pub exit_at_tip: bool,

    /// Whether the logs should be structured in JSON format
    #[arg(long)]
    pub json_log: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "nearfs-indexer",
            "--start-block-height",
            "9820210",
            "--bucket-name",
            "near-lake-data-testnet",
            "--batch-size",
            "50",
            "--include",
            "*.nearfs.near",
            "--include",
            "web4.near",
            "--exclude",
            "spam.nearfs.near",
            "--limit",
            "1000",
            "--exit-at-tip",
            "--json-log",
        ])
        .unwrap();

        assert_eq!(cli.start_block_height, Some(9820210));
        assert_eq!(cli.bucket_name, "near-lake-data-testnet");
        assert_eq!(cli.batch_size, 50);
        assert_eq!(cli.include, vec!["*.nearfs.near", "web4.near"]);
        assert_eq!(cli.exclude, vec!["spam.nearfs.near"]);
        assert_eq!(cli.limit, Some(1000));
        assert!(cli.exit_at_tip);
        assert!(cli.json_log);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["nearfs-indexer"]).unwrap();

        assert_eq!(cli.start_block_height, None);
        assert_eq!(cli.batch_size, 20);
        assert_eq!(cli.write_concurrency, 20);
        assert_eq!(cli.method_name, "fs_store");
        assert!(cli.include.is_empty());
        assert!(cli.exclude.is_empty());
        assert_eq!(cli.limit, None);
        assert!(!cli.exit_at_tip);
        assert!(!cli.json_log);
    }

    #[test]
    fn test_rejects_invalid_height() {
        assert!(Cli::try_parse_from(["nearfs-indexer", "--start-block-height", "-1"]).is_err());
        assert!(Cli::try_parse_from(["nearfs-indexer", "--limit", "many"]).is_err());
    }
}
