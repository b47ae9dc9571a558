//! In-process image store.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use super::{ImageError, ImageStore};
use super::local::UPLOADS_PATH;

/// Keeps image bytes in memory. URLs point at `/uploads/{key}` but nothing
/// serves them.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    images: DashMap<String, (String, Bytes)>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content type and bytes stored under `key`.
    pub fn get(&self, key: &str) -> Option<(String, Bytes)> {
        self.images.get(key).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Bytes) -> Result<String, ImageError> {
        self.images
            .insert(key.to_string(), (content_type.to_string(), bytes));
        Ok(format!("{UPLOADS_PATH}/{key}"))
    }
}
