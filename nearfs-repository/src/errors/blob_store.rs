use thiserror::Error;

/// Represents errors that can occur within a blob store.
///
/// Every variant other than `NotFound` means the store could not confirm the
/// requested operation, and callers must treat the object as absent.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("IO error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("S3 error on '{key}': {message}")]
    S3 { key: String, message: String },
    #[error("Invalid object key: {0:?}")]
    InvalidKey(String),
    #[error("Invalid storage location: {0}")]
    InvalidLocation(String),
    #[error("No AWS region configured for the S3 store of bucket '{bucket}'")]
    MissingRegion { bucket: String },
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl BlobStoreError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }

    pub fn s3(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::S3 {
            key: key.into(),
            message: message.into(),
        }
    }
}
