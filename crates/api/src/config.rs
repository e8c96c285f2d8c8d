//! Service configuration

use crate::rate_limit::RateLimitConfig;
use config::{Config, ConfigError, Environment, File};
use feature_engine::{AgeGroupPolicy, ValidationConfig};
use inference_engine::ModelConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an extra configuration file
pub const CONFIG_PATH_ENV: &str = "PREMIUM_CONFIG";

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub pipeline: PipelineConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Range checking applied to incoming requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Ranges of the input form
    #[default]
    Strict,
    /// Only the mathematical domain of the derived features
    Lenient,
}

impl ValidationMode {
    pub fn to_config(self) -> ValidationConfig {
        match self {
            ValidationMode::Strict => ValidationConfig::default(),
            ValidationMode::Lenient => ValidationConfig::lenient(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fitted scaler and encoder parameters
    pub preprocessing_path: PathBuf,
    pub age_group_policy: AgeGroupPolicy,
    pub validation: ValidationMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            preprocessing_path: PathBuf::from("models/preprocessing.json"),
            age_group_policy: AgeGroupPolicy::default(),
            validation: ValidationMode::default(),
        }
    }
}

impl ServiceConfig {
    /// Load `config/default.toml`, the file named by `PREMIUM_CONFIG` and
    /// `PREMIUM__*` environment variables, later sources winning
    pub fn load() -> Result<Self, ConfigError> {
        let extra = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from(extra.as_deref())
    }

    /// Same as [`ServiceConfig::load`] with an explicit extra file
    pub fn load_from(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::with_name("config/default").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix("PREMIUM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
