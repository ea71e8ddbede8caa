// TOML config adapter - Configuration file loading (TOML or YAML)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::model::JobForm;
use crate::error::{VidWebpError, VidWebpResult};

/// Files probed in the working directory when no config path is given
const DEFAULT_CONFIG_PATHS: &[&str] = &["vid2webp.toml", "vid2webp.yaml", "vid2webp.yml"];

/// Contents of a vid2webp configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Transcoder executable
    pub ffmpeg_path: Option<PathBuf>,
    /// Per-file time limit in seconds
    pub timeout_secs: Option<u64>,
    /// Log level used when neither RUST_LOG nor --log-level is set
    pub log_level: Option<String>,
    /// Initial form values
    pub defaults: JobForm,
}

/// Config file format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Toml,
        }
    }
}

/// TOML/YAML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Load the explicit file, or the first default file found, or defaults
    pub fn load(explicit: Option<&Path>) -> VidWebpResult<(AppConfig, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let config = Self::load_file(path)?;
            return Ok((config, Some(path.to_path_buf())));
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let path = Path::new(candidate);
            if path.is_file() {
                let config = Self::load_file(path)?;
                return Ok((config, Some(path.to_path_buf())));
            }
        }

        debug!("No configuration file found, using built-in defaults");
        Ok((AppConfig::default(), None))
    }

    /// Load and parse one configuration file
    pub fn load_file(path: &Path) -> VidWebpResult<AppConfig> {
        info!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| VidWebpError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Self::parse(&content, ConfigFormat::from_path(path)).map_err(|message| {
            VidWebpError::Config {
                message: format!("{}: {}", path.display(), message),
            }
        })
    }

    /// Parse configuration text
    pub fn parse(content: &str, format: ConfigFormat) -> Result<AppConfig, String> {
        match format {
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| format!("Failed to parse TOML config: {}", e))
            }
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
        }
    }

    /// Serialize configuration to TOML
    pub fn to_toml(config: &AppConfig) -> VidWebpResult<String> {
        toml::to_string_pretty(config).map_err(|e| VidWebpError::Config {
            message: format!("Failed to serialize config: {}", e),
        })
    }
}
