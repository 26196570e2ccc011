use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "stencil.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("toml decode error in {}: {source}", path.display())]
    TomlDecode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter when neither `RUST_LOG` nor `-v`/`-q` is given.
    pub level: Option<String>,
    /// JSON lines log file.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model_dir: Option<PathBuf>,
    pub mock_dir: Option<PathBuf>,
    pub validator_dir: Option<PathBuf>,
    pub keep_going: bool,
    /// Where to write the run report JSON.
    pub report: Option<PathBuf>,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn from_toml_str(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlDecode {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load settings from `explicit`, else from `stencil.toml` when present, else defaults.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !path.exists() {
                return Ok(Settings::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Settings::from_toml_str(&path, &content)
}
