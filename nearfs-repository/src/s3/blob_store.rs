use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::errors::BlobStoreError;
use crate::interfaces::BlobStore;

/// Blob store backed by an S3 (or S3-compatible) bucket.
///
/// Objects live under `<bucket>/<prefix>/<key>`.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, prefix: String) -> Self {
        let prefix = prefix.trim_matches('/').to_string();
        Self {
            client,
            bucket,
            prefix,
        }
    }

    fn object_key(&self, key: &str) -> Result<String, BlobStoreError> {
        if key.is_empty() || key.contains('/') {
            return Err(BlobStoreError::InvalidKey(key.to_string()));
        }
        if self.prefix.is_empty() {
            Ok(key.to_string())
        } else {
            Ok(format!("{}/{}", self.prefix, key))
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
        let object_key = self.object_key(key)?;
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(false),
            Err(err) => Err(BlobStoreError::s3(
                object_key,
                DisplayErrorContext(&err).to_string(),
            )),
        }
    }

    async fn get(&self, key: &str) -> Result<Bytes, BlobStoreError> {
        let object_key = self.object_key(key)?;
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => {
                return Err(BlobStoreError::NotFound(key.to_string()));
            }
            Err(err) => {
                return Err(BlobStoreError::s3(
                    object_key,
                    DisplayErrorContext(&err).to_string(),
                ));
            }
        };

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| BlobStoreError::s3(&object_key, e.to_string()))?;
        Ok(body.into_bytes())
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<(), BlobStoreError> {
        let object_key = self.object_key(key)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| BlobStoreError::s3(&object_key, DisplayErrorContext(&err).to_string()))?;
        Ok(())
    }
}
