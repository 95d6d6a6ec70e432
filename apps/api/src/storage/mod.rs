//! Storage gateway: opaque byte blobs addressed by an external id.
//!
//! The gateway owns no business logic. Handlers and the analysis pipeline
//! only ever see `Arc<dyn StorageGateway>`.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod local;
pub mod s3;

pub use local::LocalStorage;
pub use s3::S3Storage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("invalid object name: {0}")]
    InvalidName(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[async_trait]
pub trait StorageGateway: Send + Sync + 'static {
    /// Stores `bytes` under `folder` and returns the external id of the new object.
    async fn upload(&self, bytes: Bytes, name: &str, folder: &str) -> Result<String>;

    async fn fetch(&self, external_id: &str) -> Result<Bytes>;

    async fn delete(&self, external_id: &str) -> Result<()>;
}

/// Builds the object key for a new upload. The uuid keeps keys unique even if a
/// filename is deleted and uploaded again.
pub(crate) fn object_key(folder: &str, name: &str) -> Result<String> {
    let name = sanitize_name(name)?;
    let folder = folder.trim_matches('/');
    let id = uuid::Uuid::new_v4();
    if folder.is_empty() {
        Ok(format!("{id}-{name}"))
    } else {
        Ok(format!("{folder}/{id}-{name}"))
    }
}

/// Keeps only the final path component so a client-supplied name cannot escape its folder.
fn sanitize_name(name: &str) -> Result<String> {
    let base = name.rsplit(&['/', '\\'][..]).next().unwrap_or("").trim();
    if base.is_empty() || base == "." || base == ".." {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(base.to_string())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_is_scoped_to_folder() {
        let key = object_key("resumes", "alice.pdf").unwrap();
        assert!(key.starts_with("resumes/"));
        assert!(key.ends_with("-alice.pdf"));
    }

    #[test]
    fn test_object_key_strips_path_components() {
        let key = object_key("/resumes/", "../../etc/passwd.pdf").unwrap();
        assert!(key.starts_with("resumes/"));
        assert!(key.ends_with("-passwd.pdf"));
        assert!(!key.contains(".."));
    }

    #[test]
    fn test_object_key_rejects_empty_name() {
        assert!(matches!(
            object_key("resumes", "dir/"),
            Err(StorageError::InvalidName(_))
        ));
    }
}
