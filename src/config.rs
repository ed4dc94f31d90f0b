use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::OriginOffset;
use crate::items::DEFAULT_PLUGIN_ID;

/// Environment variable pointing at an explicit configuration file
pub const CONFIG_ENV: &str = "UVTT_IMPORT_CONFIG";

/// Root of the importer configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Locate the configuration: `UVTT_IMPORT_CONFIG` first, then
    /// `./config/default.toml`. A missing file yields the defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "failed to resolve the current directory".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// What to do when items are imported into a scene that is still loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessPolicy {
    /// Refuse the import
    #[default]
    Block,
    /// Log a warning and import anyway
    Warn,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Grid DPI reported by the directory-backed scene
    #[serde(default = "ImportConfig::default_grid_dpi")]
    pub grid_dpi: f64,
    #[serde(default)]
    pub readiness: ReadinessPolicy,
    #[serde(default)]
    pub include_lights: bool,
    #[serde(default)]
    pub origin_offset: OriginOffset,
    #[serde(default = "ImportConfig::default_plugin_id")]
    pub plugin_id: String,
    #[serde(default = "ImportConfig::default_player_id")]
    pub player_id: String,
}

impl ImportConfig {
    fn default_grid_dpi() -> f64 {
        150.0
    }

    fn default_plugin_id() -> String {
        DEFAULT_PLUGIN_ID.to_string()
    }

    fn default_player_id() -> String {
        "local-player".to_string()
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            grid_dpi: Self::default_grid_dpi(),
            readiness: ReadinessPolicy::default(),
            include_lights: false,
            origin_offset: OriginOffset::default(),
            plugin_id: Self::default_plugin_id(),
            player_id: Self::default_player_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_directory")]
    pub directory: PathBuf,
}

impl OutputConfig {
    fn default_directory() -> PathBuf {
        PathBuf::from("uvtt-out")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: Self::default_directory(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}
