use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::assets::AssetResolver;
use super::concat::ConcatManifest;
use super::duration::{expand_images, DurationPlanner};
use super::encoder::{EncodeJob, EncodeOrchestrator};
use super::overlay;
use crate::config::Config;
use crate::data_layer::storage::s3_storage::S3Storage;
use crate::data_layer::storage::s3_types::UploadResult;
use crate::error::AssemblyError;
use crate::utils::cooldown::CooldownMap;
use crate::utils::log_error::LogError;

/// One assembly request from the calling collaborator.
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    pub images: Vec<PathBuf>,
    pub audio: Option<PathBuf>,
    pub title: String,
    pub emotion_tag: String,
    pub caption: String,
    pub topic_tag: String,
    pub output_path: PathBuf,
    pub remote_key: String,
}

#[derive(Debug)]
pub struct AssemblyOutcome {
    pub output_path: PathBuf,
    pub upload: Option<UploadResult>,
}

/// Runs the full pipeline for one request: resolve assets, plan timings,
/// write the concat manifest, encode, then hand off to storage. Steps are
/// sequential since each output feeds the next; concurrent requests are
/// independent and get job-unique manifest paths.
pub struct AssemblyManager {
    resolver: AssetResolver,
    planner: DurationPlanner,
    encoder: EncodeOrchestrator,
    s3_storage: Option<Arc<S3Storage>>,
    cooldowns: CooldownMap,
    work_dir: PathBuf,
    scale_width: u32,
}

impl AssemblyManager {
    /// Builds the manager with S3 persistence. A failed S3 init degrades
    /// to local-only output with a warning instead of failing startup.
    pub async fn new(config: &Config) -> Self {
        let s3_storage = match S3Storage::new(&config.s3).await {
            Ok(storage) => {
                info!(
                    "S3 storage initialized: {}/{}",
                    config.s3.region, config.s3.bucket
                );
                Some(Arc::new(storage))
            }
            Err(e) => {
                warn!("failed to initialize S3 storage, uploads disabled: {}", e);
                None
            }
        };

        Self::with_storage(config, s3_storage)
    }

    /// Local-only manager; finished reels stay on disk.
    pub fn without_storage(config: &Config) -> Self {
        Self::with_storage(config, None)
    }

    fn with_storage(config: &Config, s3_storage: Option<Arc<S3Storage>>) -> Self {
        Self {
            resolver: AssetResolver::new(
                PathBuf::from(&config.defaults.image),
                PathBuf::from(&config.defaults.audio),
            ),
            planner: DurationPlanner::new(
                config.assembly.ffprobe_bin.clone(),
                config.assembly.per_image_duration,
            ),
            encoder: EncodeOrchestrator::new(
                config.assembly.ffmpeg_bin.clone(),
                Duration::from_secs(config.assembly.encode_timeout_secs),
            ),
            s3_storage,
            cooldowns: CooldownMap::new(config.assembly.cooldown_secs),
            work_dir: PathBuf::from(&config.assembly.work_dir),
            scale_width: config.assembly.scale_width,
        }
    }

    pub async fn assemble(
        &self,
        request: &AssemblyRequest,
    ) -> Result<AssemblyOutcome, AssemblyError> {
        if !self.cooldowns.try_begin(&request.remote_key).await {
            return Err(AssemblyError::CoolingDown(request.remote_key.clone()));
        }

        let outcome = self.run_pipeline(request).await;
        if outcome.is_err() {
            // Only a delivered reel holds the key; failed requests stay
            // immediately retryable.
            self.cooldowns.release(&request.remote_key).await;
        }
        outcome
    }

    async fn run_pipeline(
        &self,
        request: &AssemblyRequest,
    ) -> Result<AssemblyOutcome, AssemblyError> {
        let assets = self
            .resolver
            .resolve(&request.images, request.audio.as_deref())?;
        let plan = self.planner.plan(&assets.audio).await?;
        let expanded = expand_images(&assets.images, plan.required_slots);
        info!(
            "assembling {} slot(s) from {} image(s) over {:.2}s of audio",
            plan.required_slots,
            assets.images.len(),
            plan.audio_duration
        );

        let manifest = ConcatManifest::build(&expanded, plan.per_image);
        tokio::fs::create_dir_all(&self.work_dir).await?;
        let manifest_path = self.work_dir.join(format!("concat_{}.txt", job_id()));
        manifest.write_to(&manifest_path).await?;
        debug!(
            "wrote {} timed manifest entries to {}",
            manifest.entry_count(),
            manifest_path.display()
        );

        let spec = overlay::compose(
            &request.title,
            &request.emotion_tag,
            &request.caption,
            &request.topic_tag,
            self.scale_width,
        );
        let job = EncodeJob {
            manifest_path: manifest_path.clone(),
            audio_path: assets.audio.clone(),
            filter_chain: spec.to_filter_chain(),
            output_path: request.output_path.clone(),
        };

        let encoded = self.encoder.encode(&job).await;

        // The manifest is scoped to this job: gone on success and failure.
        tokio::fs::remove_file(&manifest_path)
            .await
            .log_error("failed to remove concat manifest");

        let output_path = match encoded {
            Ok(path) => path,
            Err(e) => {
                // The engine may have flushed part of the container before
                // dying; an invalid output must not survive the failure.
                if request.output_path.is_file() {
                    tokio::fs::remove_file(&request.output_path)
                        .await
                        .log_error("failed to discard partial output");
                }
                return Err(e.into());
            }
        };

        let upload = match &self.s3_storage {
            Some(storage) => Some(storage.upload_video(&output_path, &request.remote_key).await?),
            None => None,
        };

        Ok(AssemblyOutcome {
            output_path,
            upload,
        })
    }
}

/// Millisecond timestamp plus a random suffix; partitions the shared temp
/// namespace between concurrent jobs.
fn job_id() -> String {
    format!("{}_{:04x}", Utc::now().timestamp_millis(), rand::random::<u16>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_ids_are_unique_across_calls() {
        let a = job_id();
        let b = job_id();
        assert_ne!(a, b);
    }
}
