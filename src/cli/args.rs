//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::{OutputChoice, QualityTier, SizeChoice};

/// Files and directories to convert
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Input videos/GIFs, or directories to scan for them
    #[arg(value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Descend into subdirectories when scanning directories
    #[arg(short, long)]
    pub recursive: bool,
}

/// Conversion settings. Numeric values are passed through as text and
/// validated together before the batch starts.
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// Keep the original size or scale to --width/--height
    #[arg(long, value_name = "MODE", value_parser = SizeChoice::parse)]
    pub size: Option<SizeChoice>,

    /// Target width in pixels (custom size)
    #[arg(long, allow_negative_numbers = true)]
    pub width: Option<String>,

    /// Target height in pixels, or "auto" to keep the aspect ratio (custom size)
    #[arg(long, allow_negative_numbers = true)]
    pub height: Option<String>,

    /// Output frame rate
    #[arg(long, value_name = "FPS", allow_negative_numbers = true)]
    pub fps: Option<String>,

    /// Seconds to skip at the start of each input
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub start: Option<String>,

    /// Seconds of output to keep; empty keeps everything
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub duration: Option<String>,

    /// Encoding quality
    #[arg(short, long, env = "VID2WEBP_QUALITY", value_parser = QualityTier::parse)]
    pub quality: Option<QualityTier>,

    /// Write outputs here instead of next to each input
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Where outputs go: "same" (next to input) or "custom" (--output-dir)
    #[arg(long, value_name = "MODE", value_parser = OutputChoice::parse)]
    pub output_mode: Option<OutputChoice>,
}

/// Transcoder process settings
#[derive(Args, Debug, Clone, Default)]
pub struct TranscoderArgs {
    /// Path to the ffmpeg executable
    #[arg(long, value_name = "PATH", env = "VID2WEBP_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Kill and fail any single file that runs longer than this many seconds
    #[arg(long, value_name = "SECONDS", env = "VID2WEBP_TIMEOUT")]
    pub timeout: Option<u64>,
}

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub form: FormArgs,

    #[command(flatten)]
    pub transcoder: TranscoderArgs,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub form: FormArgs,

    #[command(flatten)]
    pub transcoder: TranscoderArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
