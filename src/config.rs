use anyhow::Result;
use config::{Config, Environment, File, Value};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sensors::StepConfig;
use crate::store::Codec;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub sensors: StepConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
    pub codec: Codec,
    pub flush_on_write: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                path: "./habbit-data".to_string(),
                codec: Codec::Json,
                flush_on_write: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            sensors: StepConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config files and `HABBIT__*` environment variables
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], with an extra required file layered on top
    pub fn load_from(extra_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        for (key, value) in Self::default().flatten() {
            builder = builder.set_default(key, value)?;
        }

        builder = builder
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("habbit").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix("HABBIT").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.storage.path.trim().is_empty() {
            return Err(anyhow::anyhow!("storage.path cannot be empty"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        if self.sensors.step_threshold <= 0.0 {
            return Err(anyhow::anyhow!("sensors.step_threshold must be greater than 0"));
        }
        if self.sensors.min_step_interval_ms < 0 {
            return Err(anyhow::anyhow!("sensors.min_step_interval_ms cannot be negative"));
        }
        if self.sensors.auto_complete_steps == 0 {
            return Err(anyhow::anyhow!("sensors.auto_complete_steps must be greater than 0"));
        }
        if self.sensors.shake_threshold <= 0.0 {
            return Err(anyhow::anyhow!("sensors.shake_threshold must be greater than 0"));
        }

        Ok(())
    }

    /// Get storage directory from environment or config
    pub fn get_storage_path(&self) -> PathBuf {
        std::env::var("HABBIT_DATA_DIR").map_or_else(|_| PathBuf::from(&self.storage.path), PathBuf::from)
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }

    /// Flatten the configuration into dotted key-value pairs
    fn flatten(self) -> Vec<(&'static str, Value)> {
        let codec = match self.storage.codec {
            Codec::Json => "json",
            Codec::Bincode => "bincode",
        };

        let mut pairs = vec![
            ("storage.path", Value::from(self.storage.path)),
            ("storage.codec", Value::from(codec)),
            ("storage.flush_on_write", Value::from(self.storage.flush_on_write)),
            ("logging.level", Value::from(self.logging.level)),
            ("logging.format", Value::from(self.logging.format)),
            ("sensors.step_threshold", Value::from(f64::from(self.sensors.step_threshold))),
            ("sensors.min_step_interval_ms", Value::from(self.sensors.min_step_interval_ms)),
            ("sensors.auto_complete_steps", Value::from(i64::from(self.sensors.auto_complete_steps))),
            ("sensors.shake_threshold", Value::from(f64::from(self.sensors.shake_threshold))),
        ];
        if let Some(file_path) = self.logging.file_path {
            pairs.push(("logging.file_path", Value::from(file_path)));
        }
        pairs
    }
}
