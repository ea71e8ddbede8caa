//! Video filter chain construction

use std::fmt;
use std::path::Path;

use crate::domain::model::{JobParameters, SizeMode};
use crate::utils::path::PathUtils;

/// One transformation applied before encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Fps(u32),
    Scale { width: u32, height: i64 },
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Fps(rate) => write!(f, "fps={}", rate),
            Filter::Scale { width, height } => write!(f, "scale={}:{}", width, height),
        }
    }
}

/// Ordered filters for one input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChain(Vec<Filter>);

impl FilterChain {
    /// Build the chain for `input` under `params`.
    ///
    /// GIFs keep their native timing unless the frame rate text differs from
    /// the default "10"; every other input always gets an explicit fps filter.
    pub fn for_input(input: &Path, params: &JobParameters) -> Self {
        let mut filters = Vec::new();

        if !PathUtils::is_gif(input) || !params.frame_rate_is_default {
            filters.push(Filter::Fps(params.frame_rate));
        }

        if let SizeMode::Custom { width, height } = params.size {
            filters.push(Filter::Scale {
                width,
                height: height.filter_value(),
            });
        }

        Self(filters)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined form passed as a single `-vf` value
    pub fn to_arg(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.0.iter().map(|f| f.to_string()).collect();
        Some(parts.join(","))
    }
}
