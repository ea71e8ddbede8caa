//! vid2webp
//!
//! Command-line batch converter from video and GIF files to animated WebP.
//! Files are converted one at a time by an external ffmpeg.
//!
//! # Usage
//!
//! ```bash
//! vid2webp convert clip.mp4 intro.gif --fps 15 --quality high
//! vid2webp convert ./videos --recursive --size custom --width 320 --output-dir ./webp
//! vid2webp plan clip.mp4 --start 2 --duration 5
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};

use vid2webp::cli::{commands, Cli, Commands};
use vid2webp::config_initialization::{load_config, resolve_logging};
use vid2webp::utils::logging::init_logging;

/// Main entry point for the vid2webp CLI application
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let (config, source) = load_config(&cli)?;
    init_logging(&resolve_logging(&cli, &config)?);

    if let Some(path) = &source {
        debug!("Configuration file: {}", path.display());
    }

    match cli.command {
        Commands::Convert(args) => commands::convert(args, &config).await,
        Commands::Plan(args) => commands::plan(args, &config),
        Commands::Config => commands::show_config(&config, source.as_deref()),
    }
}
