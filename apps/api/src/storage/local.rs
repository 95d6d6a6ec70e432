use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use super::{object_key, Result, StorageError, StorageGateway};

/// Stores blobs as plain files under a root directory.
/// Used for local development and tests.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub async fn new<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path_for(&self, external_id: &str) -> Result<PathBuf> {
        let relative = Path::new(external_id);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if external_id.is_empty() || escapes {
            return Err(StorageError::InvalidName(external_id.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl StorageGateway for LocalStorage {
    async fn upload(&self, bytes: Bytes, name: &str, folder: &str) -> Result<String> {
        let key = object_key(folder, name)?;
        let path = self.path_for(&key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &bytes).await?;
        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(key)
    }

    async fn fetch(&self, external_id: &str) -> Result<Bytes> {
        let path = self.path_for(external_id)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(external_id.to_string()))
            }
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    async fn delete(&self, external_id: &str) -> Result<()> {
        let path = self.path_for(external_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(external_id.to_string()))
            }
            Err(err) => Err(StorageError::Io(err)),
        }
    }
}
