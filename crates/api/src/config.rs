use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub parse: ParseConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub data_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParseConfig {
    /// Title used when nothing in the text looks like one.
    pub title_placeholder: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty, // Human readable, for local runs
    Json,   // One JSON object per line
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub filter: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("tasks.json"),
        }
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            title_placeholder: "제목을 입력해주세요".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            parse: ParseConfig::default(),
            logging: LoggingConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `TASKS_CONFIG` names an optional JSON file; the remaining variables
    /// override individual settings on top of it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("TASKS_CONFIG") {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(bind) = lookup("TASKS_BIND") {
            config.server.bind = bind;
        }
        if let Some(data_file) = lookup("TASKS_DATA_FILE") {
            config.storage.data_file = PathBuf::from(data_file);
        }
        if let Some(placeholder) = lookup("TASKS_TITLE_PLACEHOLDER") {
            config.parse.title_placeholder = placeholder;
        }
        if let Some(format) = lookup("TASKS_LOG_FORMAT") {
            config.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                other => anyhow::bail!("Unsupported log format: {}", other),
            };
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.logging.filter = filter;
        }
        if let Some(origins) = lookup("TASKS_CORS_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path))?;
        serde_json::from_str(&content).context(format!("Failed to parse config file: {}", path))
    }
}
