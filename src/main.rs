use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use storyreel::business_layer::assembly::assembly_manager::{AssemblyManager, AssemblyRequest};
use storyreel::config::Config;

#[derive(Parser, Debug)]
#[command(name = "storyreel")]
#[command(about = "Assemble a slideshow reel from stills and narration, then upload it", long_about = None)]
struct Args {
    /// Image files, in display order
    #[arg(short, long)]
    image: Vec<PathBuf>,

    /// Narration audio track
    #[arg(short, long)]
    audio: Option<PathBuf>,

    /// Title burned in at the top center
    #[arg(long, default_value = "")]
    title: String,

    /// Emotion tag burned in at the top right
    #[arg(long, default_value = "")]
    emotion: String,

    /// Story caption burned in at the bottom center
    #[arg(long, default_value = "")]
    caption: String,

    /// Topic tag burned in at the bottom left
    #[arg(long, default_value = "")]
    topic: String,

    /// Output video file path
    #[arg(short, long, default_value = "output.mp4")]
    output: PathBuf,

    /// Object storage key; defaults to reels/<output file name>
    #[arg(long)]
    remote_key: Option<String>,

    /// Configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Keep the reel local, skip the upload step
    #[arg(long)]
    no_upload: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::load_from(&args.config)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {}", args.config.display(), e))?;

    let manager = if args.no_upload {
        AssemblyManager::without_storage(&config)
    } else {
        AssemblyManager::new(&config).await
    };

    let remote_key = args.remote_key.unwrap_or_else(|| {
        let file_name = args
            .output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "reel.mp4".to_string());
        format!("reels/{}", file_name)
    });

    let request = AssemblyRequest {
        images: args.image,
        audio: args.audio,
        title: args.title,
        emotion_tag: args.emotion,
        caption: args.caption,
        topic_tag: args.topic,
        output_path: args.output,
        remote_key,
    };

    let outcome = manager
        .assemble(&request)
        .await
        .context("reel assembly failed")?;

    println!("🎬 Assembled reel: {}", outcome.output_path.display());
    if let Some(upload) = outcome.upload {
        println!("📤 Uploaded as {}", upload.remote_key);
        println!("🔗 {}", upload.url);
        if let Some(expires_at) = upload.expires_at {
            println!("⏳ URL expires at {}", expires_at);
        }
    }

    Ok(())
}
