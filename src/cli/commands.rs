//! Command implementations

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapters::{AppConfig, FFmpegAdapter, TomlConfigAdapter};
use crate::app::{create_event_channel, AppContainer, BatchEvent, BatchRequest, DefaultAppContainer};
use crate::cli::args::{ConvertArgs, InputArgs, PlanArgs};
use crate::config_initialization::{resolve_form, resolve_transcoder};
use crate::domain::model::{BatchOutcome, BatchSummary, ConversionResult};
use crate::domain::rules::ParameterValidator;
use crate::error::VidWebpError;
use crate::planner::CommandBuilder;
use crate::ports::TranscoderPort;
use crate::utils::path::PathUtils;
use crate::utils::Utils;

/// Exit status for a batch-level error, validation failure or empty selection
const EXIT_BATCH_ERROR: u8 = 1;
/// Exit status when some files failed or the batch was cancelled
const EXIT_INCOMPLETE: u8 = 2;

/// Execute the convert command
pub async fn convert(args: ConvertArgs, config: &AppConfig) -> Result<ExitCode> {
    let form = resolve_form(&args.form, &config.defaults);
    let files = collect(&args.input)?;
    let settings = resolve_transcoder(&args.transcoder, config);

    let container = DefaultAppContainer::new(&settings);
    let runner = container.batch_runner();

    let (events, mut receiver) = create_event_channel();
    let worker = runner.spawn(BatchRequest { files, form }, events);

    let cancel = runner.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current file");
            eprintln!("Stopping after the current file...");
            cancel.cancel();
        }
    });

    let mut reporter = ConsoleReporter::new(args.json);
    while let Some(event) = receiver.recv().await {
        reporter.handle(&event)?;
    }

    let outcome = worker.await.context("Conversion worker panicked")?;
    interrupt.abort();

    Ok(match outcome {
        Ok(summary) => exit_code(summary.outcome()),
        Err(_) => ExitCode::from(EXIT_BATCH_ERROR),
    })
}

/// Execute the plan command
pub fn plan(args: PlanArgs, config: &AppConfig) -> Result<ExitCode> {
    let form = resolve_form(&args.form, &config.defaults);
    let files = collect(&args.input)?;
    if files.is_empty() {
        eprintln!("{}", VidWebpError::NoInputFiles);
        return Ok(ExitCode::from(EXIT_BATCH_ERROR));
    }

    let parameters = match ParameterValidator::validate(&form) {
        Ok(parameters) => parameters,
        Err(errors) => {
            eprintln!("{}", VidWebpError::from(errors));
            return Ok(ExitCode::from(EXIT_BATCH_ERROR));
        }
    };

    let settings = resolve_transcoder(&args.transcoder, config);
    let transcoder = FFmpegAdapter::locate(settings.ffmpeg_path);
    let builder = CommandBuilder::new(settings.threads);

    let mut entries = Vec::with_capacity(files.len());
    for input in &files {
        let command = builder.build(input, &parameters).map_err(VidWebpError::from)?;
        entries.push(PlanEntry {
            input: command.input.clone(),
            output: command.output.clone(),
            command_line: command.display_with(transcoder.program()),
            args: command.args_lossy(),
        });
    }
    info!("Planned {} conversion(s)", entries.len());

    if args.json {
        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize plan to JSON")?;
        println!("{}", json);
    } else {
        for entry in &entries {
            println!("{}", entry.command_line);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Execute the config command
pub fn show_config(config: &AppConfig, source: Option<&Path>) -> Result<ExitCode> {
    match source {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# Built-in defaults"),
    }
    print!("{}", TomlConfigAdapter::to_toml(config)?);
    Ok(ExitCode::SUCCESS)
}

/// One planned conversion as printed by `plan --json`
#[derive(Debug, Serialize)]
struct PlanEntry {
    input: PathBuf,
    output: PathBuf,
    command_line: String,
    args: Vec<String>,
}

fn collect(input: &InputArgs) -> Result<Vec<PathBuf>> {
    let files = PathUtils::collect_inputs(&input.files, input.recursive)?;
    debug!("Collected {} input file(s)", files.len());
    Ok(files)
}

fn exit_code(outcome: BatchOutcome) -> ExitCode {
    match outcome {
        BatchOutcome::AllSucceeded => ExitCode::SUCCESS,
        BatchOutcome::PartialFailure | BatchOutcome::Cancelled => ExitCode::from(EXIT_INCOMPLETE),
    }
}

/// Renders runner events on the terminal
struct ConsoleReporter {
    json: bool,
    total: usize,
}

impl ConsoleReporter {
    fn new(json: bool) -> Self {
        Self { json, total: 0 }
    }

    fn handle(&mut self, event: &BatchEvent) -> Result<()> {
        match event {
            BatchEvent::Started { total } => {
                self.total = *total;
                if !self.json {
                    println!("Converting {} file(s)", total);
                }
            }
            BatchEvent::FileStarted { index, total, input } => {
                if !self.json {
                    println!("[{}/{}] {}", index + 1, total, input.display());
                }
            }
            BatchEvent::FileFinished { index, result } => {
                if !self.json {
                    self.print_result(*index, result);
                }
            }
            BatchEvent::Progress { processed, total } => {
                debug!(
                    "Progress: {}/{} ({:.0}%)",
                    processed,
                    total,
                    Utils::calculate_progress(*processed, *total)
                );
            }
            BatchEvent::Completed(summary) => {
                if self.json {
                    let json = serde_json::to_string_pretty(summary)
                        .context("Failed to serialize summary to JSON")?;
                    println!("{}", json);
                } else {
                    print_summary(summary);
                }
            }
            BatchEvent::Failed { message } => {
                eprintln!("Error: {}", message);
            }
        }
        Ok(())
    }

    fn print_result(&self, index: usize, result: &ConversionResult) {
        let position = format!("[{}/{}]", index + 1, self.total);
        let elapsed = Utils::format_duration(result.elapsed);
        match (&result.output, &result.error) {
            (Some(output), None) => {
                println!("{} done in {} -> {}", position, elapsed, output.display());
            }
            (_, Some(error)) => {
                println!("{} failed after {}: {}", position, elapsed, error);
            }
            (None, None) => println!("{} done in {}", position, elapsed),
        }
    }
}

fn print_summary(summary: &BatchSummary) {
    println!();
    match summary.outcome() {
        BatchOutcome::Cancelled => println!(
            "Conversion cancelled after {}/{} file(s). Successfully converted {}/{}",
            summary.processed(),
            summary.total,
            summary.succeeded,
            summary.total
        ),
        _ => println!(
            "Conversion complete! Successfully converted {}/{} file(s)",
            summary.succeeded, summary.total
        ),
    }

    let errors = summary.errors();
    if !errors.is_empty() {
        println!("Failed:");
        for (input, error) in errors {
            println!("  {}: {}", input.display(), error);
        }
    }
}
