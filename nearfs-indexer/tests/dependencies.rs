//! Tests for dependency wiring that fail before any network connection.

use clap::Parser;
use nearfs_indexer::{Cli, Dependencies, IndexingError};
use nearfs_pipeline::errors::ProcessorError;
use nearfs_repository::BlobStoreError;

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["nearfs-indexer"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn test_invalid_include_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().to_str().unwrap().to_string();

    let result = Dependencies::new(&cli(&["--storage", storage.as_str(), "--include", "[oops"])).await;

    assert!(matches!(
        result,
        Err(IndexingError::FilterError(ProcessorError::InvalidPattern { .. }))
    ));
}

#[tokio::test]
async fn test_unsupported_storage_location() {
    let result = Dependencies::new(&cli(&["--storage", "gs://bucket/prefix"])).await;

    assert!(matches!(
        result,
        Err(IndexingError::StorageError(BlobStoreError::InvalidLocation(_)))
    ));
}

#[tokio::test]
async fn test_zero_batch_size() {
    let result = Dependencies::new(&cli(&["--storage", "memory", "--batch-size", "0"])).await;

    assert!(matches!(result, Err(IndexingError::ConfigError(_))));
}
