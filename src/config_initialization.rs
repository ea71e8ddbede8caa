//! Configuration initialization and hierarchy management
//!
//! Every setting is resolved with the precedence CLI > environment > config
//! file > built-in defaults. Environment variables are read by clap through
//! the `env` attribute, so they arrive here already merged with the CLI.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::adapters::{AppConfig, TomlConfigAdapter};
use crate::cli::{Cli, FormArgs, TranscoderArgs};
use crate::domain::model::{JobForm, OutputChoice};
use crate::error::VidWebpResult;
use crate::planner::default_thread_count;
use crate::utils::logging::{LogLevel, LoggingConfig};

/// Everything needed to locate and drive the transcoder
#[derive(Debug, Clone, PartialEq)]
pub struct TranscoderSettings {
    pub ffmpeg_path: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub threads: usize,
}

/// Load the file layer: `--config`/`VID2WEBP_CONFIG`, else a default file, else nothing
pub fn load_config(cli: &Cli) -> VidWebpResult<(AppConfig, Option<PathBuf>)> {
    TomlConfigAdapter::load(cli.config.as_deref())
}

/// Logging level from CLI/env, else the config file, else warnings only
pub fn resolve_logging(cli: &Cli, config: &AppConfig) -> VidWebpResult<LoggingConfig> {
    let level = match cli.log_level.as_deref().or(config.log_level.as_deref()) {
        Some(level) => LogLevel::parse(level)?,
        None => LoggingConfig::default().level,
    };
    Ok(LoggingConfig {
        level,
        json: cli.log_json,
    })
}

/// Overlay command-line form values on the configured defaults
pub fn resolve_form(args: &FormArgs, defaults: &JobForm) -> JobForm {
    let mut form = defaults.clone();
    let mut overrides = 0;

    let mut set = |slot: &mut String, value: &Option<String>| {
        if let Some(value) = value {
            *slot = value.clone();
            overrides += 1;
        }
    };
    set(&mut form.width, &args.width);
    set(&mut form.height, &args.height);
    set(&mut form.frame_rate, &args.fps);
    set(&mut form.start_time, &args.start);
    set(&mut form.duration, &args.duration);
    set(&mut form.output_directory, &args.output_dir);

    if let Some(size) = args.size {
        form.size_mode = size;
        overrides += 1;
    }
    if let Some(quality) = args.quality {
        form.quality = quality;
        overrides += 1;
    }

    // An explicit directory implies custom output unless the mode says otherwise
    match args.output_mode {
        Some(mode) => {
            form.output_mode = mode;
            overrides += 1;
        }
        None if args.output_dir.is_some() => form.output_mode = OutputChoice::Custom,
        None => {}
    }

    if overrides > 0 {
        debug!("Applied {} command-line form overrides", overrides);
    }
    form
}

/// Transcoder location, time limit and thread budget
pub fn resolve_transcoder(args: &TranscoderArgs, config: &AppConfig) -> TranscoderSettings {
    let ffmpeg_path = args.ffmpeg.clone().or_else(|| config.ffmpeg_path.clone());
    let timeout = args
        .timeout
        .or(config.timeout_secs)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    let settings = TranscoderSettings {
        ffmpeg_path,
        timeout,
        threads: default_thread_count(),
    };
    info!(
        "Transcoder settings: ffmpeg={}, timeout={:?}, threads={}",
        settings
            .ffmpeg_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "auto".to_string()),
        settings.timeout,
        settings.threads
    );
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{QualityTier, SizeChoice};
    use clap::Parser;

    fn form_args(argv: &[&str]) -> FormArgs {
        let mut full = vec!["vid2webp", "plan"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            crate::cli::Commands::Plan(args) => args.form,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_value_beats_file_value_beats_default() {
        let file_defaults = JobForm {
            frame_rate: "15".to_string(),
            width: "320".to_string(),
            ..JobForm::default()
        };

        let form = resolve_form(&form_args(&["--fps", "24"]), &file_defaults);
        assert_eq!(form.frame_rate, "24");
        assert_eq!(form.width, "320");
        assert_eq!(form.height, JobForm::default().height);
    }

    #[test]
    fn test_choice_flags_are_parsed() {
        let form = resolve_form(
            &form_args(&["--size", "custom", "--quality", "HIGH", "--width", "640"]),
            &JobForm::default(),
        );
        assert_eq!(form.size_mode, SizeChoice::Custom);
        assert_eq!(form.quality, QualityTier::High);
        assert_eq!(form.width, "640");
    }

    #[test]
    fn test_unknown_choice_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["vid2webp", "plan", "--size", "huge"]).is_err());
    }

    #[test]
    fn test_output_dir_implies_custom_mode() {
        let form = resolve_form(&form_args(&["--output-dir", "/tmp/out"]), &JobForm::default());
        assert_eq!(form.output_mode, OutputChoice::Custom);
        assert_eq!(form.output_directory, "/tmp/out");

        let form = resolve_form(
            &form_args(&["--output-dir", "/tmp/out", "--output-mode", "same"]),
            &JobForm::default(),
        );
        assert_eq!(form.output_mode, OutputChoice::Same);
    }

    #[test]
    fn test_transcoder_settings_precedence() {
        let config = AppConfig {
            ffmpeg_path: Some(PathBuf::from("/from/file/ffmpeg")),
            timeout_secs: Some(60),
            ..AppConfig::default()
        };

        let from_file = resolve_transcoder(&TranscoderArgs::default(), &config);
        assert_eq!(from_file.ffmpeg_path, Some(PathBuf::from("/from/file/ffmpeg")));
        assert_eq!(from_file.timeout, Some(Duration::from_secs(60)));
        assert!(from_file.threads >= 1);

        let args = TranscoderArgs {
            ffmpeg: Some(PathBuf::from("/from/cli/ffmpeg")),
            timeout: Some(0),
        };
        let from_cli = resolve_transcoder(&args, &config);
        assert_eq!(from_cli.ffmpeg_path, Some(PathBuf::from("/from/cli/ffmpeg")));
        // Zero disables the limit
        assert_eq!(from_cli.timeout, None);
    }

    #[test]
    fn test_logging_level_precedence() {
        let config = AppConfig {
            log_level: Some("debug".to_string()),
            ..AppConfig::default()
        };
        let cli = Cli::try_parse_from(["vid2webp", "config"]).unwrap();
        if cli.log_level.is_none() {
            assert_eq!(resolve_logging(&cli, &config).unwrap().level, LogLevel::Debug);
        }

        let cli = Cli::try_parse_from(["vid2webp", "--log-level", "error", "config"]).unwrap();
        assert_eq!(resolve_logging(&cli, &config).unwrap().level, LogLevel::Error);

        let cli = Cli::try_parse_from(["vid2webp", "--log-level", "loud", "config"]).unwrap();
        assert!(resolve_logging(&cli, &config).is_err());
    }
}
