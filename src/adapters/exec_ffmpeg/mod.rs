//! FFmpeg execution adapter
//!
//! Runs planned commands against an external `ffmpeg` executable. Arguments
//! are passed as a vector straight to the process; no shell is involved.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::errors::ConversionError;
use crate::planner::TranscodeCommand;
use crate::ports::TranscoderPort;

/// Directory next to the executable where a bundled ffmpeg is looked up
const BUNDLED_DIR: &str = "ffmpeg";

#[cfg(windows)]
const FFMPEG_BINARY: &str = "ffmpeg.exe";
#[cfg(not(windows))]
const FFMPEG_BINARY: &str = "ffmpeg";

/// FFmpeg-based execution adapter
#[derive(Debug, Clone)]
pub struct FFmpegAdapter {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl FFmpegAdapter {
    /// Create adapter for an explicit executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Create adapter for the explicit path, a bundled copy, or `ffmpeg` on PATH
    pub fn locate(explicit: Option<PathBuf>) -> Self {
        Self::new(Self::resolve_program(explicit))
    }

    /// Kill and fail any single file that runs longer than `limit`
    pub fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn resolve_program(explicit: Option<PathBuf>) -> PathBuf {
        if let Some(path) = explicit {
            debug!("Using configured transcoder: {}", path.display());
            return path;
        }

        if let Some(bundled) = Self::bundled_program() {
            debug!("Using bundled transcoder: {}", bundled.display());
            return bundled;
        }

        debug!("Falling back to {} on PATH", FFMPEG_BINARY);
        PathBuf::from(FFMPEG_BINARY)
    }

    /// `<install dir>/ffmpeg/ffmpeg[.exe]` if it exists
    fn bundled_program() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        let candidate = exe.parent()?.join(BUNDLED_DIR).join(FFMPEG_BINARY);
        candidate.is_file().then_some(candidate)
    }

    fn command(&self, planned: &TranscodeCommand) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&planned.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Keep a console window from flashing up for every file.
        #[cfg(windows)]
        cmd.creation_flags(winapi::um::winbase::CREATE_NO_WINDOW);

        cmd
    }
}

#[async_trait]
impl TranscoderPort for FFmpegAdapter {
    async fn transcode(&self, planned: &TranscodeCommand) -> Result<(), ConversionError> {
        info!("WebP conversion command: {}", planned.display_with(&self.program));
        let started = Instant::now();

        let child = self
            .command(planned)
            .spawn()
            .map_err(|source| ConversionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output?,
                Err(_) => {
                    // Dropping the wait future drops the child, which kills it.
                    warn!("Transcoder exceeded {:?} on {}", limit, planned.input.display());
                    return Err(ConversionError::TimedOut(limit));
                }
            },
            None => child.wait_with_output().await?,
        };

        debug!(
            "Transcoder finished in {:.2}s with {}",
            started.elapsed().as_secs_f64(),
            output.status
        );

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(ConversionError::Transcode {
            status: describe_status(&output.status),
            stderr: if stderr.is_empty() {
                "unknown error".to_string()
            } else {
                stderr
            },
        })
    }

    fn program(&self) -> &Path {
        &self.program
    }
}

fn describe_status(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}
