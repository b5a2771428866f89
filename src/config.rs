use crate::locale::Language;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "medical-vision-lab.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_rate: Duration,
    pub progress_tick_rate: Duration,
    pub analysis_latency: Duration,
    /// Seconds. Controls how fast the displayed progress approaches its ceiling.
    pub progress_time_constant: f32,
    pub progress_ceiling: f32,
    pub max_upload_size_bytes: u64,
    pub allowed_mime_types: Vec<String>,
    pub history_capacity: usize,
    pub toast_duration: Duration,
    pub language: Language,
    pub report_dir: PathBuf,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            progress_tick_rate: Duration::from_millis(120),
            analysis_latency: Duration::from_millis(2000),
            progress_time_constant: 1.6,
            progress_ceiling: 92.0,
            max_upload_size_bytes: 8 * 1024 * 1024,
            allowed_mime_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/webp".to_string(),
            ],
            history_capacity: 8,
            toast_duration: Duration::from_millis(2600),
            language: Language::English,
            report_dir: PathBuf::from("."),
            logger_timezone: local_offset(),
        }
    }
}

/// Optional overrides read from disk. Anything missing keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    language: Option<Language>,
    analysis_latency_ms: Option<u64>,
    max_upload_size_mb: Option<u64>,
    history_capacity: Option<usize>,
    report_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history_capacity must be at least 1")]
    EmptyHistory,

    #[error("max_upload_size_mb is too large: {0}")]
    UploadLimitTooLarge(u64),
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(text)?;
        let mut config = Self::default();

        if let Some(language) = file.language {
            config.language = language;
        }
        if let Some(latency) = file.analysis_latency_ms {
            config.analysis_latency = Duration::from_millis(latency);
        }
        if let Some(max_mb) = file.max_upload_size_mb {
            config.max_upload_size_bytes = max_mb
                .checked_mul(1024 * 1024)
                .ok_or(ConfigError::UploadLimitTooLarge(max_mb))?;
        }
        if let Some(capacity) = file.history_capacity {
            if capacity == 0 {
                return Err(ConfigError::EmptyHistory);
            }
            config.history_capacity = capacity;
        }
        if let Some(report_dir) = file.report_dir {
            config.report_dir = report_dir;
        }

        Ok(config)
    }
}

fn local_offset() -> chrono::FixedOffset {
    *chrono::Local::now().offset()
}
