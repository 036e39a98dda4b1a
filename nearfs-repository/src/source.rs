use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::errors::BlobStoreError;
use crate::interfaces::BlobStore;
use crate::local::LocalBlobStore;
use crate::memory::MemoryBlobStore;
use crate::s3::S3BlobStore;

/// Configuration for the content store backend.
///
/// Parsed from a location string:
/// - `memory` keeps everything in process (development only)
/// - `s3://bucket/prefix` writes to S3, honouring `AWS_S3_ENDPOINT`
/// - anything else is a local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSource {
    Memory,
    Local { root: PathBuf },
    S3 { bucket: String, prefix: String },
}

impl StorageSource {
    pub fn parse(location: &str) -> Result<Self, BlobStoreError> {
        if location == "memory" {
            return Ok(Self::Memory);
        }

        match Url::parse(location) {
            Ok(url) if url.scheme() == "s3" => {
                let bucket = url
                    .host_str()
                    .filter(|host| !host.is_empty())
                    .ok_or_else(|| {
                        BlobStoreError::InvalidLocation(format!("bucket is missing in {}", location))
                    })?;
                Ok(Self::S3 {
                    bucket: bucket.to_string(),
                    prefix: url.path().trim_matches('/').to_string(),
                })
            }
            // Single-letter schemes are Windows drive letters, not URLs.
            Ok(url) if url.scheme().len() > 1 => Err(BlobStoreError::InvalidLocation(format!(
                "unsupported protocol - {}",
                url.scheme()
            ))),
            _ if location.is_empty() => Err(BlobStoreError::InvalidLocation(
                "empty storage location".to_string(),
            )),
            _ => Ok(Self::Local {
                root: PathBuf::from(location),
            }),
        }
    }

    /// Builds the blob store for this source.
    ///
    /// An S3 store needs a region from the AWS environment (`AWS_REGION` or a
    /// profile); without one this fails here rather than on the first request.
    pub async fn into_store(self) -> Result<Arc<dyn BlobStore>, BlobStoreError> {
        match self {
            Self::Memory => {
                info!("Using in-memory content store");
                Ok(Arc::new(MemoryBlobStore::new()))
            }
            Self::Local { root } => {
                tokio::fs::create_dir_all(&root)
                    .await
                    .map_err(|e| BlobStoreError::io(root.display().to_string(), e))?;
                info!(root = %root.display(), "Using local content store");
                Ok(Arc::new(LocalBlobStore::new(root)))
            }
            Self::S3 { bucket, prefix } => {
                let mut config_loader = aws_config::from_env();
                if let Ok(s3_endpoint) = std::env::var("AWS_S3_ENDPOINT") {
                    config_loader = config_loader.endpoint_url(s3_endpoint);
                }
                let config = config_loader.load().await;
                if config.region().is_none() {
                    return Err(BlobStoreError::MissingRegion { bucket });
                }

                let client = aws_sdk_s3::Client::new(&config);
                info!(bucket = %bucket, prefix = %prefix, "Using S3 content store");
                Ok(Arc::new(S3BlobStore::new(client, bucket, prefix)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_memory() {
        assert_eq!(StorageSource::parse("memory").unwrap(), StorageSource::Memory);
    }

    #[test]
    fn test_parse_s3() {
        assert_eq!(
            StorageSource::parse("s3://nearfs-data/mainnet/blocks/").unwrap(),
            StorageSource::S3 {
                bucket: "nearfs-data".to_string(),
                prefix: "mainnet/blocks".to_string(),
            }
        );
        assert_eq!(
            StorageSource::parse("s3://nearfs-data").unwrap(),
            StorageSource::S3 {
                bucket: "nearfs-data".to_string(),
                prefix: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_local_paths() {
        assert_eq!(
            StorageSource::parse("storage").unwrap(),
            StorageSource::Local {
                root: PathBuf::from("storage")
            }
        );
        assert_eq!(
            StorageSource::parse("/var/lib/nearfs").unwrap(),
            StorageSource::Local {
                root: PathBuf::from("/var/lib/nearfs")
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_scheme_and_empty() {
        assert!(matches!(
            StorageSource::parse("gs://bucket/prefix"),
            Err(BlobStoreError::InvalidLocation(_))
        ));
        assert!(matches!(
            StorageSource::parse(""),
            Err(BlobStoreError::InvalidLocation(_))
        ));
    }
}
