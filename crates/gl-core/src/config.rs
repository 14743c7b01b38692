use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::timeline::{TimelineOptions, MAX_RANGE_DAYS};

/// Top-level configuration loaded from `~/.growline/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

impl Config {
    /// Load config from `path` (usually [`Config::default_path`]), falling
    /// back to defaults when the file does not exist.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.exists() {
            Self::load_from(path)
        } else {
            let cfg = Config::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        self.validate()?;
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        let path = path.into();
        let text = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        std::fs::write(&path, text).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Semantic validation for settings that are not fully expressible via type checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.general.validate()?;
        self.timeline.validate()?;
        self.source.validate()?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".growline")
            .join("config.toml")
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("validation: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Section structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// `human` or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl GeneralConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.log_format.as_str() {
            "human" | "json" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "general.log_format must be \"human\" or \"json\", got {other:?}"
            ))),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "human".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_nominal_range_days")]
    pub nominal_range_days: u32,
    #[serde(default = "default_padding_fraction")]
    pub padding_fraction: f64,
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            nominal_range_days: default_nominal_range_days(),
            padding_fraction: default_padding_fraction(),
            default_zoom: default_zoom(),
        }
    }
}

impl TimelineConfig {
    pub fn options(&self) -> TimelineOptions {
        TimelineOptions {
            nominal_range_days: self.nominal_range_days,
            padding_fraction: self.padding_fraction,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.nominal_range_days > MAX_RANGE_DAYS {
            return Err(ConfigError::Validation(format!(
                "timeline.nominal_range_days must be at most {MAX_RANGE_DAYS}, got {}",
                self.nominal_range_days
            )));
        }
        if !(0.0..=1.0).contains(&self.padding_fraction) {
            return Err(ConfigError::Validation(format!(
                "timeline.padding_fraction must be within 0.0..=1.0, got {}",
                self.padding_fraction
            )));
        }
        if !(self.default_zoom.is_finite() && self.default_zoom > 0.0) {
            return Err(ConfigError::Validation(format!(
                "timeline.default_zoom must be positive, got {}",
                self.default_zoom
            )));
        }
        Ok(())
    }
}

fn default_nominal_range_days() -> u32 {
    90
}
fn default_padding_fraction() -> f64 {
    0.1
}
fn default_zoom() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    File,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_kind")]
    pub kind: SourceKind,
    #[serde(default = "default_source_path")]
    pub path: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            path: default_source_path(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SourceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "source.timeout_secs must be greater than zero".into(),
            ));
        }
        match self.kind {
            SourceKind::File if self.path.trim().is_empty() => Err(ConfigError::Validation(
                "source.path is required when source.kind = \"file\"".into(),
            )),
            SourceKind::Http
                if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) =>
            {
                Err(ConfigError::Validation(format!(
                    "source.base_url must start with http:// or https://, got {:?}",
                    self.base_url
                )))
            }
            _ => Ok(()),
        }
    }
}

fn default_source_kind() -> SourceKind {
    SourceKind::File
}
fn default_source_path() -> String {
    "grows.json".into()
}
fn default_base_url() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_timeout_secs() -> u64 {
    10
}
