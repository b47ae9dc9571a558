//! Product image storage.
//!
//! Uploaded bytes are stored under a content-addressed key and the store
//! returns the URL clients should use to fetch them.

pub mod local;
pub mod memory;

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

pub use local::LocalImageStore;
pub use memory::MemoryImageStore;

/// Image storage errors.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blob store for product images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    async fn put(&self, key: &str, content_type: &str, bytes: Bytes) -> Result<String, ImageError>;

    /// Directory to expose under `/uploads`, for stores that write to disk.
    fn served_dir(&self) -> Option<&Path> {
        None
    }
}

/// File extension for an accepted image content type.
pub fn extension_for(content_type: &str) -> Result<&'static str, ImageError> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => Ok("png"),
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        "image/avif" => Ok("avif"),
        _ => Err(ImageError::UnsupportedType(content_type.to_string())),
    }
}

/// Storage key for a product image: `{product_id}/{sha256}.{ext}`.
pub fn image_key(product_id: Uuid, content_type: &str, bytes: &[u8]) -> Result<String, ImageError> {
    let ext = extension_for(content_type)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{product_id}/{digest:x}.{ext}"))
}
