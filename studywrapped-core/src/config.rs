//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/studywrapped/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/studywrapped/` (~/.config/studywrapped/)
//! - Data: `$XDG_DATA_HOME/studywrapped/` (~/.local/share/studywrapped/)
//! - State/Logs: `$XDG_STATE_HOME/studywrapped/` (~/.local/state/studywrapped/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// QBank reports API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Statistics computation configuration
    #[serde(default)]
    pub stats: StatsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// QBank reports API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the reports API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_api_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://qbank-api.example.com/v3".to_string()
}

fn default_api_timeout() -> u64 {
    30
}

/// Statistics computation configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StatsConfig {
    /// Calendar year the recap covers
    #[serde(default = "default_year")]
    pub year: i32,

    /// Fixed UTC offset in hours for the student's calendar (São Paulo: -3).
    ///
    /// Every day boundary and hour-of-day derivation uses this offset.
    /// Computing against UTC would shift streaks and peak hours by up
    /// to a day for most users.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// Gap cap in seconds between consecutive flashcard reviews
    #[serde(default = "default_flashcard_gap_cap")]
    pub flashcard_gap_cap_secs: i64,

    /// Gap cap in seconds between consecutive question answers
    #[serde(default = "default_question_gap_cap")]
    pub question_gap_cap_secs: i64,

    /// Flat per-question estimate used when no question timestamps exist
    #[serde(default = "default_seconds_per_question")]
    pub seconds_per_question: i64,

    /// Number of top specialties to rank
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,

    /// Peak study hour reported when no timestamped events are available
    #[serde(default = "default_peak_hour")]
    pub default_peak_hour: u8,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            utc_offset_hours: default_utc_offset_hours(),
            flashcard_gap_cap_secs: default_flashcard_gap_cap(),
            question_gap_cap_secs: default_question_gap_cap(),
            seconds_per_question: default_seconds_per_question(),
            top_categories: default_top_categories(),
            default_peak_hour: default_peak_hour(),
        }
    }
}

fn default_year() -> i32 {
    2025
}

fn default_utc_offset_hours() -> i32 {
    -3
}

fn default_flashcard_gap_cap() -> i64 {
    60
}

fn default_question_gap_cap() -> i64 {
    300
}

fn default_seconds_per_question() -> i64 {
    60
}

fn default_top_categories() -> usize {
    5
}

fn default_peak_hour() -> u8 {
    20
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/studywrapped/config.toml`
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("studywrapped").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite store)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("studywrapped")
    }

    /// Returns the state directory path (for logs)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("studywrapped")
    }

    /// Returns the store file path
    pub fn store_path() -> PathBuf {
        Self::data_dir().join("activity.db")
    }

    /// Returns the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("studywrapped.log")
    }
}
