//! Configuration service implementation.
//!
//! Loads [`AppConfig`] from `config.toml` under the platform config dir, or
//! from an explicit path.

use crate::paths::ConfschedPaths;
use confsched_core::config::AppConfig;
use confsched_core::{Result, ScheduleError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Loads and caches the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    /// Uses `path`, or the default config file when `None`.
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => ConfschedPaths::config_file()?,
        };
        Ok(Self {
            path,
            config: Arc::new(RwLock::new(None)),
        })
    }

    /// Reads and validates the file at `path`. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<AppConfig> {
        Self::new(path)?.get_config()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configuration, reading the file on first access.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let cached = self
                .config
                .read()
                .map_err(|_| ScheduleError::internal("Config cache lock poisoned"))?;
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = Self::read_file(&self.path)?;
        let mut cached = self
            .config
            .write()
            .map_err(|_| ScheduleError::internal("Config cache lock poisoned"))?;
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Forces a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cached) = self.config.write() {
            *cached = None;
        }
    }

    fn read_file(path: &Path) -> Result<AppConfig> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                ScheduleError::config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            toml::from_str::<AppConfig>(&content).map_err(|e| {
                ScheduleError::config(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            AppConfig::default()
        };

        config.validate()?;
        info!(path = %path.display(), conference = %config.conference.name, "Loaded configuration");
        Ok(config)
    }
}
