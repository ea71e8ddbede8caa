//! Transcoder command planning
//!
//! Turns one input path plus validated [`JobParameters`] into the exact
//! argument vector handed to the transcoder. Planning is pure: nothing here
//! touches the filesystem or spawns processes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::domain::errors::PlanError;
use crate::domain::model::{JobParameters, OutputTarget, OUTPUT_EXTENSION};
use crate::utils::path::PathUtils;
use crate::utils::Utils;

pub mod filters;

pub use filters::{Filter, FilterChain};

/// Upper bound on encoder threads regardless of core count
pub const MAX_THREADS: usize = 8;

/// Fixed encoder settings: lossy libwebp, level 4, default preset, infinite loop
const ENCODER_ARGS: &[&str] = &[
    "-c:v",
    "libwebp",
    "-lossless",
    "0",
    "-compression_level",
    "4",
    "-preset",
    "default",
    "-loop",
    "0",
];

/// Encoder threads for a machine with `cores` logical CPUs.
///
/// One core is left for the rest of the system: `clamp(cores - 1, 1, 8)`.
pub fn thread_count(cores: usize) -> usize {
    cores.saturating_sub(1).clamp(1, MAX_THREADS)
}

/// Thread count for the current machine
pub fn default_thread_count() -> usize {
    thread_count(num_cpus::get())
}

/// Fully planned transcoder invocation for one input
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeCommand {
    pub input: PathBuf,
    pub output: PathBuf,
    pub args: Vec<OsString>,
}

impl TranscodeCommand {
    /// Arguments as lossy strings, for logs and tests
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Human-readable command line; arguments with spaces are quoted
    pub fn display_with(&self, program: &Path) -> String {
        std::iter::once(program.to_string_lossy().into_owned())
            .chain(self.args_lossy())
            .map(|a| {
                if a.is_empty() || a.contains(char::is_whitespace) {
                    format!("\"{}\"", a)
                } else {
                    a
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builds transcoder commands with a fixed thread budget
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    threads: usize,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new(default_thread_count())
    }
}

impl CommandBuilder {
    pub fn new(threads: usize) -> Self {
        Self { threads }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Resolve where `input` will be written
    pub fn output_path(input: &Path, params: &JobParameters) -> Result<PathBuf, PlanError> {
        let stem = input
            .file_stem()
            .ok_or_else(|| PlanError::NoFileName(input.to_path_buf()))?;

        let dir = match &params.output {
            OutputTarget::SameDirectoryAsInput => input.parent().unwrap_or_else(|| Path::new("")),
            OutputTarget::Directory(dir) => dir.as_path(),
        };

        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(OUTPUT_EXTENSION);

        Ok(PathUtils::normalize(&dir.join(file_name)))
    }

    /// Plan the invocation for one input; `params` must already be validated
    pub fn build(&self, input: &Path, params: &JobParameters) -> Result<TranscodeCommand, PlanError> {
        let output = Self::output_path(input, params)?;

        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-threads".into(),
            self.threads.to_string().into(),
        ];

        if params.start_time_seconds > 0.0 {
            args.push("-ss".into());
            args.push(Utils::format_seconds(params.start_time_seconds).into());
        }

        args.push("-i".into());
        args.push(input.as_os_str().to_os_string());

        if let Some(duration) = params.duration_seconds {
            args.push("-t".into());
            args.push(Utils::format_seconds(duration).into());
        }

        if let Some(chain) = FilterChain::for_input(input, params).to_arg() {
            args.push("-vf".into());
            args.push(chain.into());
        }

        args.extend(ENCODER_ARGS.iter().map(OsString::from));

        args.push("-qscale".into());
        args.push(params.quality.score().to_string().into());

        args.push(output.as_os_str().to_os_string());

        Ok(TranscodeCommand {
            input: input.to_path_buf(),
            output,
            args,
        })
    }
}
