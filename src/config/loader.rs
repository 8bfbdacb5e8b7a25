//! Configuration Loader
//!
//! Environment-aware layered loading with the `config` crate:
//!
//! 1. built-in defaults
//! 2. `{config_dir}/opsfeed.toml` (optional)
//! 3. `{config_dir}/opsfeed.{environment}.toml` (optional)
//! 4. `OPSFEED__SECTION__KEY` environment variables
//!
//! The merged result is validated before it is handed out.

use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::FeedConfig;
use crate::error::FeedResult;

const BASE_FILE: &str = "opsfeed.toml";
const ENV_PREFIX: &str = "OPSFEED";
const ENV_SEPARATOR: &str = "__";

/// Loaded configuration plus where it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: FeedConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> FeedResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> FeedResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> FeedResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));

        debug!(
            environment = %environment,
            config_directory = %config_directory.display(),
            "Loading configuration"
        );

        let config = Self::build(&config_directory, environment)?;
        config.validate()?;

        info!(
            environment = %environment,
            metrics_interval_ms = config.scheduler.metrics_interval_ms,
            tasks_interval_ms = config.scheduler.tasks_interval_ms,
            alerts_interval_ms = config.scheduler.alerts_interval_ms,
            simulation_enabled = config.simulation.enabled,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Wrap an already-built configuration (tests, embedding)
    pub fn from_config(config: FeedConfig, environment: &str) -> FeedResult<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: PathBuf::from("config"),
        }))
    }

    fn build(config_directory: &Path, environment: &str) -> FeedResult<FeedConfig> {
        let base = config_directory.join(BASE_FILE);
        let overlay = config_directory.join(format!("opsfeed.{environment}.toml"));

        let config = Config::builder()
            .add_source(File::from(base).required(false))
            .add_source(File::from(overlay).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize::<FeedConfig>()?)
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Get the current environment
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Get the configuration directory
    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Detect current environment: OPSFEED_ENV || APP_ENV || 'development'
    pub fn detect_environment() -> String {
        env::var("OPSFEED_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }
}
