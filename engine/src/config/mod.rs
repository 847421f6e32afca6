//! Configuration management
//!
//! This module handles loading, validation, and management of the
//! Colloquy configuration. Configuration is stored in TOML format at
//! ~/.colloquy/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **model**: Default model, endpoint URL, API key env var, timeout
//! - **loop** (`loop_policy` in code): Default iteration bound and
//!   bound-exceeded policy
//!
//! API keys never live in the config file; the config names the
//! environment variable that holds the key.

use crate::agent::BoundPolicy;
use crate::errors::SessionError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Model endpoint configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Loop bound configuration
    #[serde(default, rename = "loop")]
    pub loop_policy: LoopConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Model endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model used when the caller does not choose one
    #[serde(default = "default_model")]
    pub default: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Name of the environment variable holding the API key
    ///
    /// Empty means no authentication (local endpoints).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Loop bound configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Iteration bound used when the caller passes zero
    #[serde(default = "default_max_loops")]
    pub default_max_loops: usize,

    /// Strict (error) or lenient (partial session) bound handling
    #[serde(default)]
    pub bound_policy: BoundPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            default: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            default_max_loops: default_max_loops(),
            bound_policy: BoundPolicy::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            model: ModelConfig::default(),
            loop_policy: LoopConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_request_timeout() -> u64 {
    300
}

fn default_max_loops() -> usize {
    crate::agent::DEFAULT_MAX_LOOPS
}

impl Config {
    /// Load configuration from the default location, creating a default
    /// file on first run
    pub fn load_or_create() -> Result<Self, SessionError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, SessionError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SessionError::Config(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| SessionError::Config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Create default configuration and save it to `path`
    fn create_default(path: &Path) -> Result<Self, SessionError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SessionError::Config(format!("Failed to create config directory: {e}"))
            })?;
        }

        let config = Config::default();
        let contents = toml::to_string_pretty(&config)
            .map_err(|e| SessionError::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, contents)
            .map_err(|e| SessionError::Config(format!("Failed to write config file: {e}")))?;

        tracing::info!("Created default configuration at {:?}", path);
        Ok(config)
    }

    /// Default configuration file path: ~/.colloquy/config.toml
    fn default_config_path() -> Result<PathBuf, SessionError> {
        let home = dirs::home_dir()
            .ok_or_else(|| SessionError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".colloquy").join("config.toml"))
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), SessionError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(SessionError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if self.model.default.is_empty() {
            return Err(SessionError::Config(
                "model.default must not be empty".to_string(),
            ));
        }

        if self.loop_policy.default_max_loops == 0 {
            return Err(SessionError::Config(
                "loop.default_max_loops must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the API key from the configured environment variable
    ///
    /// Returns `None` when no variable is configured or it is unset.
    pub fn api_key(&self) -> Option<String> {
        if self.model.api_key_env.is_empty() {
            return None;
        }
        std::env::var(&self.model.api_key_env).ok()
    }
}
