use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Input asset resolution failures. Raised before any encode is attempted.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("default asset missing on disk: {0}")]
    MissingDefault(PathBuf),
}

/// Audio duration probe failures. Audio length drives all timing, so
/// these abort the whole assembly instead of falling back.
#[derive(Debug, Error)]
pub enum DurationError {
    #[error("failed to probe audio duration of {path}: {detail}")]
    ProbeFailed { path: PathBuf, detail: String },
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("encoding engine failed: {detail}")]
    EngineFailure { detail: String, diagnostic: String },

    #[error("encoding engine timed out after {0:?}")]
    Timeout(Duration),
}

/// Upload failures are fatal for the request but retryable: the local
/// output file is kept so a retry does not need to re-encode.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read output file {path}: {detail}")]
    ReadFailed { path: PathBuf, detail: String },

    #[error("upload of {key} failed after {attempts} attempts: {detail}")]
    PutFailed {
        key: String,
        attempts: u32,
        detail: String,
    },

    #[error("failed to presign retrieval url for {key}: {detail}")]
    PresignFailed { key: String, detail: String },
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("assembly for '{0}' is cooling down, retry later")]
    CoolingDown(String),
}
