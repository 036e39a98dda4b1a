//! S3 content store creation against the AWS environment.
//!
//! Kept in its own test binary with a single test because it rewrites process
//! environment variables.

use nearfs_repository::{BlobStoreError, StorageSource};

#[tokio::test]
async fn test_s3_store_requires_region() {
    let profile_dir = tempfile::tempdir().unwrap();
    let missing = profile_dir.path().join("missing");

    for name in ["AWS_REGION", "AWS_DEFAULT_REGION", "AWS_PROFILE", "AWS_S3_ENDPOINT"] {
        std::env::remove_var(name);
    }
    std::env::set_var("AWS_CONFIG_FILE", &missing);
    std::env::set_var("AWS_SHARED_CREDENTIALS_FILE", &missing);
    std::env::set_var("AWS_EC2_METADATA_DISABLED", "true");

    let source = StorageSource::parse("s3://nearfs-data/mainnet").unwrap();
    let err = source.clone().into_store().await.err().unwrap();
    assert!(matches!(
        err,
        BlobStoreError::MissingRegion { ref bucket } if bucket == "nearfs-data"
    ));

    std::env::set_var("AWS_REGION", "eu-central-1");
    assert!(source.into_store().await.is_ok());
}
