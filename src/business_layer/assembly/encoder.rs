use crate::error::EncodeError;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{error, info};

/// One encoding engine invocation. Exists only for the duration of the
/// subprocess call; the manifest file it references is owned by the caller.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub manifest_path: PathBuf,
    pub audio_path: PathBuf,
    pub filter_chain: String,
    pub output_path: PathBuf,
}

/// Terminal outcome of one engine invocation. Exactly one fires per job.
#[derive(Debug)]
pub enum EncodeEvent {
    Completed { output: PathBuf },
    Failed { detail: String, diagnostic: String },
    TimedOut { limit: Duration },
}

/// Drives the external encoding engine as a single subprocess per job.
pub struct EncodeOrchestrator {
    engine_bin: String,
    timeout: Duration,
}

impl EncodeOrchestrator {
    pub fn new(engine_bin: String, timeout: Duration) -> Self {
        Self {
            engine_bin,
            timeout,
        }
    }

    pub async fn encode(&self, job: &EncodeJob) -> Result<PathBuf, EncodeError> {
        match self.run_engine(job).await {
            EncodeEvent::Completed { output } => {
                info!("encode completed: {}", output.display());
                Ok(output)
            }
            EncodeEvent::Failed { detail, diagnostic } => {
                error!("encode failed: {}", detail);
                Err(EncodeError::EngineFailure { detail, diagnostic })
            }
            EncodeEvent::TimedOut { limit } => {
                error!("encode timed out after {:?}", limit);
                Err(EncodeError::Timeout(limit))
            }
        }
    }

    /// Spawns the engine and awaits its terminal event. The engine reads
    /// the concat manifest and audio, burns in the filter chain, and muxes
    /// a faststart mp4 truncated to the shorter input stream.
    async fn run_engine(&self, job: &EncodeJob) -> EncodeEvent {
        let mut cmd = Command::new(&self.engine_bin);
        cmd.arg("-y")
            .args(["-f", "concat", "-safe", "0"])
            .arg("-i")
            .arg(&job.manifest_path)
            .arg("-i")
            .arg(&job.audio_path)
            .arg("-vf")
            .arg(&job.filter_chain)
            .args(["-c:v", "libx264", "-preset", "veryfast"])
            .args(["-c:a", "aac", "-b:a", "128k"])
            .args(["-pix_fmt", "yuv420p"])
            .args(["-movflags", "+faststart"])
            .arg("-shortest")
            .arg(&job.output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!("encode started: {:?}", cmd.as_std());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return EncodeEvent::Failed {
                    detail: format!("failed to spawn {}: {}", self.engine_bin, e),
                    diagnostic: String::new(),
                }
            }
        };

        // Drain stderr concurrently so the engine never blocks on a full
        // pipe; the collected text is the failure diagnostic.
        let stderr = child.stderr.take();
        let diagnostic_task = tokio::spawn(async move {
            let mut diagnostic = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut diagnostic).await;
            }
            diagnostic
        });

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                let diagnostic = diagnostic_task.await.unwrap_or_default();
                if status.success() {
                    EncodeEvent::Completed {
                        output: job.output_path.clone(),
                    }
                } else {
                    EncodeEvent::Failed {
                        detail: format!("engine exited with {}", status),
                        diagnostic,
                    }
                }
            }
            Ok(Err(e)) => EncodeEvent::Failed {
                detail: format!("failed to wait on engine: {}", e),
                diagnostic: diagnostic_task.await.unwrap_or_default(),
            },
            Err(_) => {
                let _ = child.kill().await;
                diagnostic_task.abort();
                EncodeEvent::TimedOut {
                    limit: self.timeout,
                }
            }
        }
    }
}
