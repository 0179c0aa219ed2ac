// Configuration utilities
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::AppError;
use crate::processing::DEFAULT_MAX_FEATURES;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub pipeline: PipelineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    pub enable_cors: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// Pipeline defaults applied to every session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Vocabulary bound for TF-IDF when a request gives none
    pub max_features: usize,
    /// Newline-separated stop-word list replacing the bundled English one
    pub stop_words: Option<String>,
    pub csv_delimiter: char,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            enable_cors: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            max_features: DEFAULT_MAX_FEATURES,
            stop_words: None,
            csv_delimiter: ',',
        }
    }
}

impl ServerConfig {
    /// Number of HTTP workers, defaulting to the CPU count
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }
}

impl Config {
    /// Load configuration from a JSON or YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let config: Config = match extension {
            "json" => serde_json::from_str(&contents)
                .map_err(|err| AppError::Config(err.to_string()))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|err| AppError::Config(err.to_string()))?,
            _ => {
                return Err(AppError::Config(format!(
                    "Unsupported config file format: {}",
                    path.display()
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), AppError> {
        if self.pipeline.max_features == 0 {
            return Err(AppError::Config("pipeline.max_features must be at least 1".to_string()));
        }
        if !self.pipeline.csv_delimiter.is_ascii() {
            return Err(AppError::Config("pipeline.csv_delimiter must be ASCII".to_string()));
        }
        Ok(())
    }

    /// CSV delimiter as a byte
    pub fn delimiter(&self) -> u8 {
        self.pipeline.csv_delimiter as u8
    }

    /// Get the log level filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.pipeline.max_features, 10);
        assert_eq!(config.delimiter(), b',');
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
        assert!(config.server.workers() >= 1);

        let pinned = ServerConfig {
            workers: Some(3),
            ..ServerConfig::default()
        };
        assert_eq!(pinned.workers(), 3);
    }

    #[test]
    fn test_from_yaml_with_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "logging:\n  level: debug\npipeline:\n  max_features: 25").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
        assert_eq!(config.pipeline.max_features, 25);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_from_json_rejects_zero_features() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"pipeline": {{"max_features": 0}}}}"#).unwrap();

        assert!(matches!(Config::from_file(file.path()), Err(AppError::Config(_))));
    }

    #[test]
    fn test_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(Config::from_file(file.path()).is_err());
    }
}
