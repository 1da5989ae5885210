//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default analysis tunables.
    pub analysis: AnalysisDefaults,

    /// Coaching feedback service settings.
    pub feedback: FeedbackConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default analysis parameters, applied when the command line omits them.
///
/// Values are stored as given; coercion to safe ranges happens when the
/// analysis parameters are built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Acquisition mode: `clip`/`interval` or `match`/`rally`.
    pub mode: String,

    /// Seconds between samples in interval mode.
    pub interval_sec: f64,

    /// Smoothed motion level that counts as active play.
    pub motion_threshold: f64,

    /// Seconds of low motion that end a rally.
    pub gap_sec: f64,

    /// Exponential smoothing weight of the previous value.
    pub alpha: f64,

    /// Working width frames are reduced to before differencing.
    pub downscale_width: u32,

    /// Frames buffered between the decode thread and the analyzer.
    pub decode_queue_depth: usize,
}

/// Coaching feedback service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Whether `analyze` requests feedback by default.
    pub enabled: bool,

    /// Chat model name.
    pub model: String,

    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Completion token budget per event.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "courtside=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            mode: "clip".to_string(),
            interval_sec: 2.0,
            motion_threshold: 4.0,
            gap_sec: 2.0,
            alpha: 0.9,
            downscale_width: 640,
            decode_queue_depth: 8,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: 250,
            temperature: 0.6,
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl FeedbackConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("courtside").join("config.json")
}
