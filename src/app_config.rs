use anyhow::{anyhow, Context, Result};
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles loading and validating the settings shared by the
/// library scan and the subtitle tools.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language used for audio tracks without a language tag (ISO 639-1)
    #[serde(default = "default_undefined_language")]
    pub undefined_language: String,

    /// File extensions included in a library scan
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Suffix appended to a subtitle file when backing it up before an in-place rewrite
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,

    /// ffprobe executable name or path
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_undefined_language() -> String {
    "en".to_string()
}

fn default_extensions() -> Vec<String> {
    [".mp4", ".mkv", ".avi", ".mov"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_backup_suffix() -> String {
    ".bak".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

impl Config {
    /// Load the configuration from a JSON file, falling back to defaults
    /// when the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file {:?} not found, using defaults", path);
            return Ok(Config::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.undefined_language)
            .context("Invalid undefined_language")?;

        if self.extensions.is_empty() {
            return Err(anyhow!("At least one file extension is required"));
        }
        if let Some(ext) = self.extensions.iter().find(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(anyhow!("Invalid file extension: '{}'", ext));
        }

        if self.backup_suffix.is_empty() {
            return Err(anyhow!("Backup suffix must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            undefined_language: default_undefined_language(),
            extensions: default_extensions(),
            backup_suffix: default_backup_suffix(),
            ffprobe_path: default_ffprobe_path(),
            log_level: LogLevel::default(),
        }
    }
}
