use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub assembly: AssemblyConfig,
    pub defaults: DefaultAssetConfig,
    pub s3: S3Config,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssemblyConfig {
    pub work_dir: String,
    pub per_image_duration: f64,
    pub scale_width: u32,
    pub encode_timeout_secs: u64,
    pub cooldown_secs: u64,
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
}

/// Built-in fallback assets used when a request arrives with no usable inputs.
#[derive(Debug, Deserialize, Clone)]
pub struct DefaultAssetConfig {
    pub image: String,
    pub audio: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_access_key: String,
    pub endpoint_uri: String,
    pub url_expiry_secs: Option<u64>,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let toml_str = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}
