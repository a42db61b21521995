use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use aws_types::region::Region;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;
use tracing::warn;

use super::s3_types::{S3UploadConfig, UploadResult, UploadTask};
use crate::config::S3Config;
use crate::error::UploadError;

/// S3 client wrapper with static credentials and retrying uploads.
pub struct S3ClientWrapper {
    client: S3Client,
    bucket: String,
    region: String,
    url_expiry: Option<Duration>,
    config: S3UploadConfig,
}

impl S3ClientWrapper {
    pub async fn new(s3_config: &S3Config) -> Result<Self, UploadError> {
        Self::with_upload_config(
            s3_config,
            S3UploadConfig {
                max_retries: 3,
                retry_delay_ms: 1000,
            },
        )
        .await
    }

    /// Retry behavior lives in the upload loop, so the SDK's own retry
    /// layer is disabled and the caller picks the attempt budget.
    pub async fn with_upload_config(
        s3_config: &S3Config,
        config: S3UploadConfig,
    ) -> Result<Self, UploadError> {
        let region = Region::new(s3_config.region.clone());

        let credentials = Credentials::new(
            &s3_config.access_key,
            &s3_config.secret_access_key,
            None, // session token
            None, // expires after
            "storyreel",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .retry_config(aws_config::retry::RetryConfig::disabled());
        if !s3_config.endpoint_uri.is_empty() {
            loader = loader.endpoint_url(&s3_config.endpoint_uri);
        }
        let aws_config = loader.load().await;

        let client = S3Client::new(&aws_config);

        Ok(Self {
            client,
            bucket: s3_config.bucket.clone(),
            region: s3_config.region.clone(),
            url_expiry: s3_config.url_expiry_secs.map(Duration::from_secs),
            config,
        })
    }

    /// Uploads one file and returns the retrievable URL for its key.
    pub async fn upload_file(&self, task: &UploadTask) -> Result<UploadResult, UploadError> {
        let file_content =
            tokio::fs::read(&task.file_path)
                .await
                .map_err(|e| UploadError::ReadFailed {
                    path: task.file_path.clone(),
                    detail: e.to_string(),
                })?;

        let mut retry_count = 0;

        loop {
            let retry_body = ByteStream::from(file_content.clone());

            match self
                .client
                .put_object()
                .bucket(&self.bucket)
                .key(&task.s3_key)
                .body(retry_body)
                .content_type(&task.content_type)
                .metadata("upload-timestamp", Utc::now().to_rfc3339())
                .send()
                .await
            {
                Ok(_response) => {
                    let (url, expires_at) = self.retrieval_url(&task.s3_key).await?;
                    return Ok(UploadResult {
                        remote_key: task.s3_key.clone(),
                        url,
                        expires_at,
                    });
                }
                Err(e) => {
                    retry_count += 1;

                    if retry_count >= self.config.max_retries {
                        return Err(UploadError::PutFailed {
                            key: task.s3_key.clone(),
                            attempts: retry_count,
                            detail: e.to_string(),
                        });
                    }

                    warn!(
                        "upload attempt {} for {} failed, retrying: {}",
                        retry_count, task.s3_key, e
                    );
                    tokio::time::sleep(Duration::from_millis(
                        self.config.retry_delay_ms * retry_count as u64,
                    ))
                    .await;
                }
            }
        }
    }

    /// Presigned GET URL when an expiry is configured, otherwise the
    /// public bucket URL form.
    async fn retrieval_url(
        &self,
        s3_key: &str,
    ) -> Result<(String, Option<DateTime<Utc>>), UploadError> {
        match self.url_expiry {
            Some(expiry) => {
                let presign_failed = |detail: String| UploadError::PresignFailed {
                    key: s3_key.to_string(),
                    detail,
                };
                let presigning = PresigningConfig::expires_in(expiry)
                    .map_err(|e| presign_failed(e.to_string()))?;
                let request = self
                    .client
                    .get_object()
                    .bucket(&self.bucket)
                    .key(s3_key)
                    .presigned(presigning)
                    .await
                    .map_err(|e| presign_failed(e.to_string()))?;
                let expires_at = Utc::now()
                    + ChronoDuration::seconds(expiry.as_secs() as i64);
                Ok((request.uri().to_string(), Some(expires_at)))
            }
            None => {
                let url = format!(
                    "https://{}.s3.{}.amazonaws.com/{}",
                    self.bucket, self.region, s3_key
                );
                Ok((url, None))
            }
        }
    }
}
