//! Transient blob storage capability

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Short-lived storage for binary payloads, supplied by the host
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store `data` and return a URL it can be retrieved from
    async fn store_blob(&self, data: Bytes, content_type: &str) -> Result<String>;
}

/// [`BlobStorage`] over an `object_store` backend
#[derive(Debug, Clone)]
pub struct ObjectStoreBlobStorage {
    store: Arc<dyn ObjectStore>,
    url_prefix: String,
}

impl ObjectStoreBlobStorage {
    /// Process-local storage; URLs look like `memory:///{name}`
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            url_prefix: "memory://".to_string(),
        }
    }

    /// Files under `dir`, created if missing; URLs are `file://` paths
    pub fn local(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let dir = std::fs::canonicalize(dir)?;
        let store = LocalFileSystem::new_with_prefix(&dir)?;

        Ok(Self {
            store: Arc::new(store),
            url_prefix: format!("file://{}", dir.display()),
        })
    }

    /// Read a blob back by the URL `store_blob` returned
    pub async fn read_blob(&self, url: &str) -> Result<Bytes> {
        let name = url
            .strip_prefix(&self.url_prefix)
            .map(|rest| rest.trim_start_matches('/'))
            .ok_or_else(|| Error::Other(format!("Blob URL {url} is not from this store")))?;
        let result = self.store.get(&ObjectPath::from(name)).await?;
        Ok(result.bytes().await?)
    }
}

#[async_trait]
impl BlobStorage for ObjectStoreBlobStorage {
    async fn store_blob(&self, data: Bytes, content_type: &str) -> Result<String> {
        let name = format!("{}.{}", Uuid::new_v4(), extension_for(content_type));
        let len = data.len();

        self.store.put(&ObjectPath::from(name.as_str()), data.into()).await?;

        debug!("Stored {len} byte {content_type} blob as {name}");
        Ok(format!("{}/{name}", self.url_prefix))
    }
}

/// File extension for a MIME type
fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "application/pdf" => "pdf",
        "application/json" => "json",
        "text/plain" => "txt",
        "image/png" => "png",
        "image/jpeg" => "jpg",
        _ => "bin",
    }
}
