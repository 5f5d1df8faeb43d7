//! # Configuration
//!
//! Optional `tessera.toml` settings. Precedence, highest first:
//! 1. CLI flags
//! 2. Environment variables (`TESSERA_LOG_FORMAT`, `TESSERA_LOG`, `RUST_LOG`)
//! 3. The config file (`--config <path>`, else `./tessera.toml` if present)
//! 4. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tessera_core::TesseraError;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "tessera.toml";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines (default).
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names fall back to text.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Asset directory: read for persisted state, written with output.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// `EnvFilter` directive used when no environment filter is set.
    #[serde(default)]
    pub filter: Option<String>,
}

/// Parsed `tessera.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self, TesseraError> {
        toml::from_str(text)
            .map_err(|e| TesseraError::Serialization(format!("{CONFIG_FILE_NAME}: {e}")))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, TesseraError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            TesseraError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(TesseraError::Io(format!(
                "Config '{}' exceeds maximum size of {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            TesseraError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Load the explicit config, or `./tessera.toml`, or defaults.
    ///
    /// An explicitly named file must exist; the implicit one is optional.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, TesseraError> {
        let config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let implicit = Path::new(CONFIG_FILE_NAME);
                if implicit.is_file() {
                    Self::load(implicit)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.with_env_overrides())
    }

    /// Apply `TESSERA_LOG_FORMAT`.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(format) = std::env::var("TESSERA_LOG_FORMAT") {
            self.log.format = LogFormat::from_name(&format);
        }
        self
    }

    /// The asset directory: CLI flag, then `[output] dir`, then `.`.
    #[must_use]
    pub fn asset_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.output.dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
