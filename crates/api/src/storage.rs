//! Filesystem-backed [`ObjectStore`] for uploaded assets.
//!
//! Objects are written under a root directory and served by the static file
//! route mounted at the configured public base URL.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use mediahub_core::store::{ObjectStore, StoreError};

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` under the root, rejecting absolute paths and `..`.
    fn resolve(&self, operation: &'static str, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StoreError::backend(
                operation,
                format!("refusing object path '{path}'"),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, path: &str, data: Vec<u8>, _mime_type: &str) -> Result<String, StoreError> {
        const OP: &str = "objects.put";
        let target = self.resolve(OP, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::backend(OP, e))?;
        }
        tokio::fs::write(&target, &data)
            .await
            .map_err(|e| StoreError::backend(OP, e))?;

        tracing::debug!(path, bytes = data.len(), "Stored object");
        Ok(format!("{}/{path}", self.public_base_url))
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        const OP: &str = "objects.delete";
        let target = self.resolve(OP, path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::backend(OP, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_writes_under_root_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "/files");

        let url = store
            .put("media/1/abc-photo.png", b"png".to_vec(), "image/png")
            .await
            .unwrap();

        assert_eq!(url, "/files/media/1/abc-photo.png");
        let written = std::fs::read(dir.path().join("media/1/abc-photo.png")).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "/files");
        store.put("a/b.txt", b"x".to_vec(), "text/plain").await.unwrap();

        store.delete("a/b.txt").await.unwrap();
        store.delete("a/b.txt").await.unwrap();
        assert!(!dir.path().join("a/b.txt").exists());
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "/files");
        for path in ["../escape.txt", "/etc/passwd", ""] {
            assert!(
                store.put(path, b"x".to_vec(), "text/plain").await.is_err(),
                "{path:?} must be rejected"
            );
        }
    }
}
