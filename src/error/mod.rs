//! Error handling module for vid2webp

use thiserror::Error;

use crate::domain::errors::{PlanError, ValidationErrors};

/// Batch-level error type; per-file failures live in `ConversionResult`
#[derive(Error, Debug)]
pub enum VidWebpError {
    /// Form input rejected before any file was touched
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Batch submitted without any input files
    #[error("No files selected. Please choose files to convert first")]
    NoInputFiles,

    /// A batch is already in flight on this runner
    #[error("A conversion is already running")]
    AlreadyRunning,

    /// Unexpected failure in the runner itself
    #[error("Conversion process failed: {message}")]
    Orchestration { message: String },

    /// Configuration file or value problem
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<PlanError> for VidWebpError {
    fn from(e: PlanError) -> Self {
        VidWebpError::Orchestration {
            message: e.to_string(),
        }
    }
}

/// Result type alias for vid2webp operations
pub type VidWebpResult<T> = std::result::Result<T, VidWebpError>;
