//! Filesystem image store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::{ImageError, ImageStore};

/// URL path prefix under which stored files are served.
pub const UPLOADS_PATH: &str = "/uploads";

/// Writes images below `root`; URLs are `{public_base_url}/uploads/{key}`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ImageError> {
        let relative = Path::new(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(ImageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid image key: {key}"),
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, key: &str, _content_type: &str, bytes: Bytes) -> Result<String, ImageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "stored image");
        Ok(format!("{}{UPLOADS_PATH}/{key}", self.public_base_url))
    }

    fn served_dir(&self) -> Option<&Path> {
        Some(&self.root)
    }
}
