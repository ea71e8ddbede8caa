//! CLI module for vid2webp
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{ConvertArgs, FormArgs, InputArgs, PlanArgs, TranscoderArgs};

/// vid2webp batch converter
///
/// Converts videos and GIFs into animated WebP files using an external
/// ffmpeg, one file at a time.
#[derive(Parser, Debug)]
#[command(name = "vid2webp")]
#[command(about = "vid2webp - Batch convert videos and GIFs to animated WebP")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, global = true, env = "VID2WEBP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (TOML or YAML)
    #[arg(long, global = true, value_name = "FILE", env = "VID2WEBP_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert files to animated WebP
    Convert(ConvertArgs),
    /// Print the ffmpeg command each file would run, without running it
    Plan(PlanArgs),
    /// Print the effective configuration as TOML
    Config,
}
