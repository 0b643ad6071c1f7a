//! Blob store on the local filesystem.
//!
//! Files live under `root/<path>`; their public address is
//! `<public_base_url>/<path>`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use actix_web::web::Bytes;
use async_trait::async_trait;
use tokio::fs;

use super::{BlobStore, StoreError};

pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a relative blob path inside `root`, refusing anything that
    /// could escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StoreError::InvalidAddress(path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn resolve_address(&self, address: &str) -> Result<PathBuf, StoreError> {
        let path = address
            .strip_prefix(&self.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StoreError::InvalidAddress(address.to_string()))?;
        self.resolve(path)
    }
}

fn not_found_or_io(e: std::io::Error) -> StoreError {
    if e.kind() == ErrorKind::NotFound {
        StoreError::NotFound
    } else {
        StoreError::Io(e)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, path: &str, content_type: &str, bytes: Bytes) -> Result<(), StoreError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &bytes).await?;
        tracing::debug!(path, content_type, size = bytes.len(), "Blob written");
        Ok(())
    }

    fn address_of(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }

    async fn get(&self, address: &str) -> Result<Bytes, StoreError> {
        let target = self.resolve_address(address)?;
        let data = fs::read(&target).await.map_err(not_found_or_io)?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, address: &str) -> Result<(), StoreError> {
        let target = self.resolve_address(address)?;
        fs::remove_file(&target).await.map_err(not_found_or_io)
    }
}
