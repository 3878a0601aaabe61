//! Named blobs backing the static pages and the speaker catalog.

#[cfg(test)]
use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::AppError;

pub const INDEX: &str = "index";
pub const STYLE: &str = "style";
pub const SCRIPT: &str = "script";
pub const SPEAKERS: &str = "speakers";

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// `Ok(None)` when the key has no value.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
}

/// Blobs stored as files in one directory.
pub struct DirBlobStore {
    root: PathBuf,
}

impl DirBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn file_name(key: &str) -> String {
        match key {
            INDEX => "index.html".to_string(),
            STYLE => "style.css".to_string(),
            SCRIPT => "script.js".to_string(),
            SPEAKERS => "speakers.json".to_string(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for DirBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.root.join(Self::file_name(key));
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No blob for {} at {}", key, path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryBlobStore {
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.blobs.insert(key.to_string(), value.into());
        self
    }
}

#[cfg(test)]
#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.blobs.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dir_store_maps_keys_to_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
        std::fs::write(dir.path().join("speakers.json"), "{}").unwrap();

        let store = DirBlobStore::new(dir.path().to_path_buf());
        assert_eq!(store.get(INDEX).await.unwrap().as_deref(), Some("<h1>hi</h1>"));
        assert_eq!(store.get(SPEAKERS).await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn dir_store_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirBlobStore::new(dir.path().to_path_buf());
        assert!(store.get(STYLE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn memory_store_returns_inserted_values() {
        let store = MemoryBlobStore::default().with(SCRIPT, "alert(1)");
        assert_eq!(store.get(SCRIPT).await.unwrap().as_deref(), Some("alert(1)"));
        assert!(store.get(INDEX).await.unwrap().is_none());
    }
}
