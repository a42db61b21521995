use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::s3_client::S3ClientWrapper;
use super::s3_types::{S3UploadConfig, UploadResult, UploadTask};
use crate::config::S3Config;
use crate::error::UploadError;
use crate::utils::log_error::LogError;

/// Upload and persistence bridge over the S3 client. Shared, stateless
/// handle that is safe for concurrent jobs.
pub struct S3Storage {
    client: Arc<S3ClientWrapper>,
}

impl S3Storage {
    pub async fn new(config: &S3Config) -> Result<Self, UploadError> {
        let client = Arc::new(S3ClientWrapper::new(config).await?);
        Ok(Self { client })
    }

    /// Same handle with an explicit retry budget for the upload loop.
    pub async fn with_upload_config(
        config: &S3Config,
        upload_config: S3UploadConfig,
    ) -> Result<Self, UploadError> {
        let client = Arc::new(S3ClientWrapper::with_upload_config(config, upload_config).await?);
        Ok(Self { client })
    }

    /// Streams the finished reel to durable storage and returns its
    /// retrievable URL. On success the local file's deletion is scheduled;
    /// a failed deletion is logged, never propagated. On failure the local
    /// file is deliberately retained so a retry skips re-encoding.
    pub async fn upload_video(
        &self,
        local_path: &Path,
        remote_key: &str,
    ) -> Result<UploadResult, UploadError> {
        let task = UploadTask {
            file_path: local_path.to_path_buf(),
            s3_key: remote_key.to_string(),
            content_type: Self::get_content_type(local_path).to_string(),
        };

        let result = self.client.upload_file(&task).await?;
        info!("uploaded {} to {}", local_path.display(), result.remote_key);

        let local_path = local_path.to_path_buf();
        tokio::spawn(async move {
            tokio::fs::remove_file(&local_path)
                .await
                .log_error("failed to remove uploaded reel");
        });

        Ok(result)
    }

    /// Content-Type by file extension.
    fn get_content_type(path: &Path) -> &'static str {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("mp4") => "video/mp4",
            Some("mov") => "video/quicktime",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("png") => "image/png",
            Some("mp3") => "audio/mpeg",
            Some("json") => "application/json",
            _ => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(
            S3Storage::get_content_type(&PathBuf::from("reel.mp4")),
            "video/mp4"
        );
        assert_eq!(
            S3Storage::get_content_type(&PathBuf::from("cover.jpg")),
            "image/jpeg"
        );
        assert_eq!(
            S3Storage::get_content_type(&PathBuf::from("unknown.bin")),
            "application/octet-stream"
        );
    }
}
