use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// One file handed to durable storage.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub file_path: PathBuf,
    pub s3_key: String,
    pub content_type: String,
}

/// Successful upload handoff. Ownership transfers to the caller, which
/// records the key and URL against its media record.
#[derive(Debug, Clone)]
pub struct UploadResult {
    pub remote_key: String,
    pub url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct S3UploadConfig {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}
