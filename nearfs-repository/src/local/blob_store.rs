use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::errors::BlobStoreError;
use crate::interfaces::BlobStore;

/// Blob store keeping one file per key under a root directory.
///
/// Objects are written to a temporary file in the root, synced, and renamed
/// into place, so a key is either absent or holds the complete object.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, BlobStoreError> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\'])
            || key.starts_with(".tmp")
        {
            return Err(BlobStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
        let path = self.object_path(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| BlobStoreError::io(key, e))
    }

    async fn get(&self, key: &str) -> Result<Bytes, BlobStoreError> {
        let path = self.object_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobStoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(BlobStoreError::io(key, e)),
        }
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<(), BlobStoreError> {
        let path = self.object_path(key)?;
        let root = self.root.clone();
        let key = key.to_string();

        tokio::task::spawn_blocking(move || -> Result<(), BlobStoreError> {
            write_atomically(&root, &path, &data).map_err(|e| BlobStoreError::io(&key, e))?;
            debug!(key = %key, bytes = data.len(), "Stored object");
            Ok(())
        })
        .await?
    }
}

fn write_atomically(root: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(root)?;

    let mut file = tempfile::Builder::new().prefix(".tmp").tempfile_in(root)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    // Make the rename itself durable.
    #[cfg(unix)]
    std::fs::File::open(root)?.sync_all()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_keys_escaping_root() {
        let store = LocalBlobStore::new("/tmp/nearfs");
        for key in ["", ".", "..", "a/b", "..\\x", ".tmp123"] {
            assert!(
                matches!(store.object_path(key), Err(BlobStoreError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
        assert_eq!(
            store.object_path("latest_block_height").unwrap(),
            PathBuf::from("/tmp/nearfs/latest_block_height")
        );
    }
}
