//! Directory-backed photo bucket, served under `/media`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::io::AsyncWriteExt;

use crate::errors::AppError;
use crate::remote::ObjectBucket;

/// URL path the router serves the media directory from.
pub const MEDIA_ROUTE: &str = "/media";

pub struct LocalBucket {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalBucket {
    /// Open (and create if needed) the bucket directory.
    pub async fn open(dir: &Path, public_base_url: &str) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(dir).await?;
        Ok(Self {
            dir: dir.to_path_buf(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ObjectBucket for LocalBucket {
    async fn upload(&self, key: &str, bytes: Bytes, _content_type: &str) -> Result<(), AppError> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(AppError::Upload(format!("Invalid object name: {}", key)));
        }

        // create_new: uploads never overwrite an existing object
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.dir.join(key))
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        tracing::debug!(key, size = bytes.len(), "Stored photo");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.public_base_url,
            MEDIA_ROUTE,
            urlencoding::encode(key)
        )
    }
}
