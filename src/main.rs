use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use mediascribe::config::Config;
use mediascribe::error::MediascribeError;
use mediascribe::media::classify::supported_extensions;
use mediascribe::media::ffmpeg::FfmpegProcessor;
use mediascribe::pipeline::{print_summary, transcribe_media, PipelineConfig};
use mediascribe::transcribe::openai::{OpenAiClient, TranscribeModel};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "mediascribe")]
#[command(version, about = "Transcribe long audio and video files with OpenAI")]
#[command(
    long_about = "Split a long audio or video file into duration-bounded chunks, transcribe \
each chunk with OpenAI's speech-to-text API, and join the results into one text transcript."
)]
struct Cli {
    /// Input audio or video file
    #[arg(short, long)]
    input: PathBuf,

    /// Output transcript file
    #[arg(short, long)]
    output: PathBuf,

    /// Transcription model: gpt-4o-transcribe, gpt-4o-mini-transcribe, whisper-1
    #[arg(short, long, default_value = "gpt-4o-transcribe")]
    model: String,

    /// Maximum chunk duration in seconds (must stay below the API's 1500s limit)
    #[arg(long)]
    chunk_duration: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Describe the input file and suggest likely fixes after a fatal failure.
fn print_failure_report(input: &Path, error: &MediascribeError) {
    eprintln!();
    eprintln!("{} {}", style("Transcription failed:").red().bold(), error);
    eprintln!();
    if let Ok(meta) = std::fs::metadata(input) {
        eprintln!("  File:      {}", input.display());
        eprintln!(
            "  Size:      {:.2} MB",
            meta.len() as f64 / (1024.0 * 1024.0)
        );
        eprintln!(
            "  Extension: {}",
            input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
        );
        eprintln!();
    }
    eprintln!("  Things to check:");
    eprintln!(
        "    1. The file is in a supported format ({})",
        supported_extensions().join(", ")
    );
    eprintln!("    2. The file plays in a media player (it may be corrupted)");
    eprintln!("    3. OPENAI_API_KEY is set and has access to the transcription model");
    eprintln!();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let model: TranscribeModel = cli.model.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    // Load and validate configuration
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(duration) = cli.chunk_duration {
        config.max_chunk_duration_secs = duration;
    }
    config.validate().context("Configuration validation failed")?;

    FfmpegProcessor::check_tools().map_err(|_| {
        anyhow::anyhow!(
            "FFmpeg not found. Install it with: brew install ffmpeg (macOS) or apt install ffmpeg (Linux)"
        )
    })?;

    let api_key = config
        .openai_api_key
        .clone()
        .context("OPENAI_API_KEY is not configured")?;

    info!("Input:  {}", cli.input.display());
    info!("Output: {}", cli.output.display());
    info!("Model:  {}", model);

    let processor = FfmpegProcessor::new();
    let transcriber = OpenAiClient::new(api_key).with_model(model);
    let pipeline_config = PipelineConfig {
        max_chunk_duration_secs: config.max_chunk_duration_secs,
        show_progress: true,
    };

    match transcribe_media(
        &cli.input,
        &cli.output,
        &processor,
        &transcriber,
        &pipeline_config,
    )
    .await
    {
        Ok(result) => {
            print_summary(&result);
            Ok(())
        }
        Err(error) => {
            print_failure_report(&cli.input, &error);
            Err(error.into())
        }
    }
}
