//! Loads `AssistantSettings` from `config.toml` and the environment.
//!
//! Priority: environment variables > config.toml > built-in defaults.
//! A missing or empty file is not an error.

use crate::paths::OpsdeskPaths;
use opsdesk_core::config::AssistantSettings;
use opsdesk_core::error::{OpsdeskError, Result};
use std::fs;
use std::path::PathBuf;

pub const ENV_API_URL: &str = "OPSDESK_API_URL";
pub const ENV_MODEL_PROVIDER: &str = "OPSDESK_MODEL_PROVIDER";
pub const ENV_LOG: &str = "OPSDESK_LOG";

pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Uses `~/.config/opsdesk/config.toml`.
    pub fn with_default_path() -> Result<Self> {
        let path = OpsdeskPaths::config_file().map_err(|e| OpsdeskError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads settings from the file and process environment.
    pub fn load(&self) -> Result<AssistantSettings> {
        let settings = self.load_file()?;
        apply_env_overrides(settings, |key| std::env::var(key).ok())
    }

    /// Loads settings from the file only.
    pub fn load_file(&self) -> Result<AssistantSettings> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                self.path.display()
            );
            return Ok(AssistantSettings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AssistantSettings::default());
        }

        let settings: AssistantSettings = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded {}", self.path.display());
        Ok(settings)
    }
}

/// Applies `OPSDESK_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(mut settings: AssistantSettings, lookup: F) -> Result<AssistantSettings>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        settings.api_base_url = url.trim().to_string();
    }
    if let Some(provider) = lookup(ENV_MODEL_PROVIDER).filter(|v| !v.trim().is_empty()) {
        settings.model_provider = provider.parse()?;
    }
    if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
        settings.log_level = level.trim().to_string();
    }
    Ok(settings)
}
