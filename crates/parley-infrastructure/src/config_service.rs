//! Configuration service implementation.
//!
//! Loads `ClientConfig` from `config.toml`, then applies environment
//! overrides (`PARLEY_API_URL`, `PARLEY_API_KEY`, `PARLEY_MODEL_ID`).

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use parley_core::config::ClientConfig;
use parley_core::{ParleyError, Result};

use crate::paths::ParleyPaths;

pub const ENV_API_URL: &str = "PARLEY_API_URL";
pub const ENV_API_KEY: &str = "PARLEY_API_KEY";
pub const ENV_MODEL_ID: &str = "PARLEY_MODEL_ID";

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading `config.toml` from the resolved config dir.
    pub fn new(paths: &ParleyPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| ParleyError::config(format!("Failed to get config path: {}", e)))?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets the configuration, loading from file and the process environment
    /// if not cached.
    ///
    /// Not validated here: callers layer their own overrides (CLI flags)
    /// on top and call `ClientConfig::validate` last.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Ok(read_lock) = self.config.read()
            && let Some(cached) = read_lock.as_ref()
        {
            return Ok(cached.clone());
        }

        let mut loaded = self.load_file()?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    /// Reads the config file. A missing file yields the defaults.
    pub fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(
                path = %self.path.display(),
                "[ConfigService] No config file, using defaults"
            );
            return Ok(ClientConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::info!(path = %self.path.display(), "[ConfigService] Loaded config");
        Ok(config)
    }

    /// Writes `config` to the config file, creating the directory if needed.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, content)?;
        self.invalidate_cache();
        Ok(())
    }
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty(ENV_API_URL) {
        config.api.base_url = url;
    }
    if let Some(key) = non_empty(ENV_API_KEY) {
        config.api.api_key = Some(key);
    }
    if let Some(model) = non_empty(ENV_MODEL_ID) {
        config.session.model_id = model;
    }
}
