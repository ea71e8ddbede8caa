//! vid2webp Library
//!
//! Batch conversion of videos and GIFs to animated WebP through an external
//! ffmpeg process.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{ConversionError, ValidationError, ValidationErrors};
pub use domain::model::{BatchSummary, ConversionResult, JobForm, JobParameters, QualityTier};
pub use error::{VidWebpError, VidWebpResult};
