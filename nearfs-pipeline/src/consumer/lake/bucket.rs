//! Object access to a NEAR Lake bucket.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::RequestPayer;

use crate::errors::ConsumerError;

/// The two bucket operations the lake stream needs.
#[async_trait]
pub trait LakeBucket: Send + Sync {
    /// Returns up to `max_keys` block folders (`000009820210/`) sorting after
    /// `start_after`, in ascending order.
    async fn list_block_folders(
        &self,
        start_after: &str,
        max_keys: usize,
    ) -> Result<Vec<String>, ConsumerError>;

    /// Reads a whole object.
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, ConsumerError>;
}

/// Requester-pays S3 bucket.
#[derive(Clone)]
pub struct S3LakeBucket {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3LakeBucket {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl LakeBucket for S3LakeBucket {
    async fn list_block_folders(
        &self,
        start_after: &str,
        max_keys: usize,
    ) -> Result<Vec<String>, ConsumerError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .delimiter("/")
            .start_after(start_after)
            .max_keys(i32::try_from(max_keys).unwrap_or(i32::MAX))
            .request_payer(RequestPayer::Requester)
            .send()
            .await
            .map_err(|e| ConsumerError::Listing {
                start_after: start_after.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(output
            .common_prefixes()
            .iter()
            .filter_map(|common_prefix| common_prefix.prefix())
            .map(str::to_string)
            .collect())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, ConsumerError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .request_payer(RequestPayer::Requester)
            .send()
            .await
            .map_err(|e| ConsumerError::Fetch {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| ConsumerError::Fetch {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(body.to_vec())
    }
}
