//! Configuration management for glot
//!
//! Configuration is layered with `figment`: built-in defaults, then a TOML file, then
//! `GLOT__`-prefixed environment variables.

use glot_language_api::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod logging;

/// Config files probed in the working directory; the first one found is used
pub const CONFIG_PATHS: &[&str] = &["glot.toml", ".glot/config.toml"];

/// Prefix for environment overrides (`GLOT__LOGGING__LEVEL=debug`)
pub const ENV_PREFIX: &str = "GLOT__";

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language registry behavior
    pub registry: RegistryConfig,
    /// Where language definition modules are looked up
    pub modules: ModulesConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// What happens when a language id is registered twice
    pub duplicate_policy: DuplicatePolicy,
}

/// Definition module lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Directories searched, in order, for `<module>.json`
    pub search_paths: Vec<PathBuf>,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from("languages/definitions")],
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from the working directory and environment
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (`GLOT__*`, `__` separates nested keys)
    /// 2. The first of `glot.toml` / `.glot/config.toml`
    /// 3. Default values
    pub fn load() -> ConfigResult<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        for config_path in CONFIG_PATHS {
            let path = Path::new(config_path);
            if path.exists() {
                tracing::info!(path = %config_path, "Loading TOML configuration");
                figment = figment.merge(Toml::file(path));
                break;
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        config.validate()?;

        tracing::debug!(
            duplicate_policy = config.registry.duplicate_policy.as_str(),
            search_paths = ?config.modules.search_paths,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        if self.modules.search_paths.is_empty() {
            return Err(ConfigError::invalid(
                "At least one module search path must be configured",
            ));
        }

        Ok(())
    }
}
