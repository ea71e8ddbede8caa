// Domain errors - Error types for the domain layer

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Form field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FrameRate,
    StartTime,
    Duration,
    Width,
    Height,
    OutputDirectory,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::FrameRate => "frame rate",
            FormField::StartTime => "start time",
            FormField::Duration => "duration",
            FormField::Width => "width",
            FormField::Height => "height",
            FormField::OutputDirectory => "output directory",
        };
        f.write_str(name)
    }
}

/// A single rejected form value
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value could not be parsed at all
    NotANumber { field: FormField, value: String },
    /// Value parsed but must be strictly positive
    NotPositive { field: FormField },
    /// Value parsed but must not be negative
    Negative { field: FormField },
    /// Whole number beyond what the field can hold
    TooLarge { field: FormField, max: u32 },
    /// Required value left empty
    Missing { field: FormField },
}

impl ValidationError {
    /// Field this error refers to
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::NotANumber { field, .. }
            | ValidationError::NotPositive { field }
            | ValidationError::Negative { field }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::Missing { field } => *field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotANumber { field, value } => {
                write!(f, "{} must be a number, got '{}'", field, value)
            }
            ValidationError::NotPositive { field } => {
                write!(f, "{} must be greater than 0", field)
            }
            ValidationError::Negative { field } => write!(f, "{} cannot be negative", field),
            ValidationError::TooLarge { field, max } => write!(f, "{} must be at most {}", field, max),
            ValidationError::Missing { field } => write!(f, "{} is required", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every violation found in one form, in field order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Whether any error refers to `field`
    pub fn mentions(&self, field: FormField) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.iter().map(|e| e.to_string()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Unknown value for one of the choice fields (size, output, quality)
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {what} '{value}'. Valid values: {expected}")]
pub struct DomainParseError {
    pub what: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl DomainParseError {
    pub fn new(what: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            what,
            value: value.to_string(),
            expected,
        }
    }
}

/// Failure of a single file's conversion; never aborts the batch
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Transcoder missing or not executable
    #[error("failed to start transcoder '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transcoder exited unsuccessfully
    #[error("transcoder failed ({status}): {stderr}")]
    Transcode { status: String, stderr: String },

    /// Transcoder exceeded the per-file time limit and was killed
    #[error("transcoder timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    /// Waiting on the child process failed
    #[error("I/O error while waiting for transcoder: {0}")]
    Io(#[from] std::io::Error),
}

/// Orchestration failure while turning an input into a command
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("input path has no file name: {}", .0.display())]
    NoFileName(PathBuf),
}
