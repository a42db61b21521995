use crate::error::DurationError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

pub const DEFAULT_PER_IMAGE_SECS: f64 = 2.0;

/// Timing plan for one assembly, derived from the audio track length.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationPlan {
    pub audio_duration: f64,
    pub per_image: f64,
    pub required_slots: usize,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Probes audio length and computes how many image slots the reel needs.
pub struct DurationPlanner {
    ffprobe_bin: String,
    per_image: f64,
}

impl DurationPlanner {
    pub fn new(ffprobe_bin: String, per_image: f64) -> Self {
        let per_image = if per_image > 0.0 {
            per_image
        } else {
            DEFAULT_PER_IMAGE_SECS
        };
        Self {
            ffprobe_bin,
            per_image,
        }
    }

    pub async fn plan(&self, audio: &Path) -> Result<DurationPlan, DurationError> {
        let audio_duration = self.probe_duration(audio).await?;
        let plan = DurationPlan {
            audio_duration,
            per_image: self.per_image,
            required_slots: required_slots(audio_duration, self.per_image),
        };
        debug!(
            "duration plan: audio {:.3}s, {} slot(s) of {}s",
            plan.audio_duration, plan.required_slots, plan.per_image
        );
        Ok(plan)
    }

    /// Reads the container duration in seconds. A missing duration field
    /// counts as 0.0; a failed probe aborts the assembly.
    async fn probe_duration(&self, audio: &Path) -> Result<f64, DurationError> {
        let probe_failed = |detail: String| DurationError::ProbeFailed {
            path: audio.to_path_buf(),
            detail,
        };

        let output = Command::new(&self.ffprobe_bin)
            .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
            .arg(audio)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| probe_failed(format!("failed to run {}: {}", self.ffprobe_bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(probe_failed(format!(
                "probe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let probed: ProbeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| probe_failed(format!("unreadable probe output: {}", e)))?;

        match probed.format.and_then(|f| f.duration) {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map(|d| d.max(0.0))
                .map_err(|_| probe_failed(format!("corrupt duration field '{}'", raw))),
            None => Ok(0.0),
        }
    }
}

/// `max(1, ceil(audio / per_image))`; even silent audio fills one slot.
pub fn required_slots(audio_duration: f64, per_image: f64) -> usize {
    ((audio_duration / per_image).ceil() as usize).max(1)
}

/// Cyclically repeats `images` until exactly `slots` entries are filled.
pub fn expand_images(images: &[PathBuf], slots: usize) -> Vec<PathBuf> {
    if images.is_empty() {
        return Vec::new();
    }
    (0..slots).map(|i| images[i % images.len()].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_count_follows_ceiling_arithmetic() {
        assert_eq!(required_slots(0.0, 2.0), 1);
        assert_eq!(required_slots(4.0, 2.0), 2);
        assert_eq!(required_slots(4.1, 2.0), 3);
        assert_eq!(required_slots(5.0, 2.0), 3);
        assert_eq!(required_slots(0.1, 2.0), 1);
    }

    #[test]
    fn expansion_cycles_the_full_list_in_order() {
        let images = vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")];
        let expanded = expand_images(&images, 5);
        assert_eq!(
            expanded,
            ["a.jpg", "b.jpg", "a.jpg", "b.jpg", "a.jpg"]
                .iter()
                .map(PathBuf::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn expansion_truncates_when_images_exceed_slots() {
        let images: Vec<PathBuf> = ["a", "b", "c", "d"].iter().map(PathBuf::from).collect();
        let expanded = expand_images(&images, 2);
        assert_eq!(expanded, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn non_positive_per_image_falls_back_to_default() {
        let planner = DurationPlanner::new("ffprobe".into(), 0.0);
        assert_eq!(planner.per_image, DEFAULT_PER_IMAGE_SECS);
    }
}
