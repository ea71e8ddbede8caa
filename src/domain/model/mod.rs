// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainParseError;

/// Frame rate the transcoder applies to GIF input when no filter is given
pub const DEFAULT_GIF_FRAME_RATE: u32 = 10;

/// Input extensions offered by the file picker (lowercase, no dot)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "gif"];

/// Extension of every produced file
pub const OUTPUT_EXTENSION: &str = "webp";

/// Size radio button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeChoice {
    #[default]
    Original,
    Custom,
}

impl SizeChoice {
    /// Parse size mode from string
    pub fn parse(s: &str) -> Result<Self, DomainParseError> {
        match s.trim().to_lowercase().as_str() {
            "original" => Ok(SizeChoice::Original),
            "custom" => Ok(SizeChoice::Custom),
            _ => Err(DomainParseError::new("size mode", s, "original, custom")),
        }
    }
}

/// Output location radio button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputChoice {
    #[default]
    Same,
    Custom,
}

impl OutputChoice {
    /// Parse output mode from string
    pub fn parse(s: &str) -> Result<Self, DomainParseError> {
        match s.trim().to_lowercase().as_str() {
            "same" => Ok(OutputChoice::Same),
            "custom" => Ok(OutputChoice::Custom),
            _ => Err(DomainParseError::new("output mode", s, "same, custom")),
        }
    }
}

/// Coarse quality selector mapped to a fixed transcoder score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    High,
    #[default]
    Medium,
    Low,
}

impl QualityTier {
    /// Parse quality tier from string (case insensitive)
    pub fn parse(s: &str) -> Result<Self, DomainParseError> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(QualityTier::High),
            "medium" => Ok(QualityTier::Medium),
            "low" => Ok(QualityTier::Low),
            _ => Err(DomainParseError::new("quality", s, "high, medium, low")),
        }
    }

    /// WebP quality score (0-100) passed to the encoder
    pub fn score(self) -> u8 {
        match self {
            QualityTier::High => 90,
            QualityTier::Medium => 75,
            QualityTier::Low => 60,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        };
        f.write_str(name)
    }
}

/// Raw form state exactly as entered; every numeric field is still text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobForm {
    pub size_mode: SizeChoice,
    pub width: String,
    pub height: String,
    pub frame_rate: String,
    pub start_time: String,
    pub duration: String,
    pub quality: QualityTier,
    pub output_mode: OutputChoice,
    pub output_directory: String,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            size_mode: SizeChoice::Original,
            width: "480".to_string(),
            height: "auto".to_string(),
            frame_rate: DEFAULT_GIF_FRAME_RATE.to_string(),
            start_time: "0".to_string(),
            duration: String::new(),
            quality: QualityTier::Medium,
            output_mode: OutputChoice::Same,
            output_directory: String::new(),
        }
    }
}

/// Target height of a custom size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Height {
    /// Keep the aspect ratio of the input
    Auto,
    Pixels(u32),
}

impl Height {
    /// Value understood by the scale filter; -1 preserves aspect ratio
    pub fn filter_value(self) -> i64 {
        match self {
            Height::Auto => -1,
            Height::Pixels(px) => i64::from(px),
        }
    }
}

/// Output dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    Original,
    Custom { width: u32, height: Height },
}

/// Where converted files are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTarget {
    SameDirectoryAsInput,
    Directory(PathBuf),
}

/// Validated conversion parameters shared by every file of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobParameters {
    pub size: SizeMode,
    pub frame_rate: u32,
    /// Frame rate field was left exactly as the default text "10"
    pub frame_rate_is_default: bool,
    pub start_time_seconds: f64,
    pub duration_seconds: Option<f64>,
    pub quality: QualityTier,
    pub output: OutputTarget,
}

impl Default for JobParameters {
    fn default() -> Self {
        Self {
            size: SizeMode::Original,
            frame_rate: DEFAULT_GIF_FRAME_RATE,
            frame_rate_is_default: true,
            start_time_seconds: 0.0,
            duration_seconds: None,
            quality: QualityTier::Medium,
            output: OutputTarget::SameDirectoryAsInput,
        }
    }
}

/// Ordered inputs converted under one parameter set
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub files: Vec<PathBuf>,
    pub parameters: JobParameters,
}

impl BatchJob {
    pub fn new(files: Vec<PathBuf>, parameters: JobParameters) -> Self {
        Self { files, parameters }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Outcome of converting one input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub input: PathBuf,
    pub success: bool,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl ConversionResult {
    pub fn succeeded(input: PathBuf, output: PathBuf, elapsed: Duration) -> Self {
        Self {
            input,
            success: true,
            output: Some(output),
            error: None,
            elapsed,
        }
    }

    pub fn failed(
        input: PathBuf,
        output: Option<PathBuf>,
        error: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            input,
            success: false,
            output,
            error: Some(error.into()),
            elapsed,
        }
    }
}

/// Overall outcome classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    AllSucceeded,
    PartialFailure,
    Cancelled,
}

/// Terminal report of a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub cancelled: bool,
    pub results: Vec<ConversionResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchSummary {
    /// Number of files actually attempted
    pub fn processed(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.cancelled {
            BatchOutcome::Cancelled
        } else if self.succeeded == self.total {
            BatchOutcome::AllSucceeded
        } else {
            BatchOutcome::PartialFailure
        }
    }

    /// (input, error detail) for every failed file
    pub fn errors(&self) -> Vec<(&Path, &str)> {
        self.results
            .iter()
            .filter_map(|r| r.error.as_deref().map(|e| (r.input.as_path(), e)))
            .collect()
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
