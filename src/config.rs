//! Configuration management for the Rollo engine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, RolloError};

/// Default name of the page listing recurring items
fn default_source_page() -> String {
    "Recurring".to_string()
}

/// Default heading that marks the rollover section in daily records
fn default_rollover_header() -> String {
    "## Tasks".to_string()
}

/// Default number of past days inspected by the due scan and the vacuum
fn default_max_lookback_days() -> u32 {
    7
}

/// Engine configuration.
///
/// Loaded from `rollo.toml` in the vault root, falling back to the
/// per-user configuration file, then to built-in defaults. Every field
/// is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Name of the vault page holding the recurring item list
    #[serde(default = "default_source_page")]
    pub source_page: String,

    /// Prefix prepended to the ISO date when naming daily records
    /// (e.g. "journal/" yields "journal/2025-06-02")
    #[serde(default)]
    pub daily_note_prefix: String,

    /// Heading under which rolled-over and generated items are filed
    #[serde(default = "default_rollover_header")]
    pub rollover_header: String,

    /// How many past days the due scan and the vacuum inspect
    #[serde(default = "default_max_lookback_days")]
    pub max_lookback_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source_page: default_source_page(),
            daily_note_prefix: String::new(),
            rollover_header: default_rollover_header(),
            max_lookback_days: default_max_lookback_days(),
        }
    }
}

impl EngineConfig {
    /// Load configuration for the given vault.
    ///
    /// Resolution order: `<vault>/rollo.toml`, then the per-user
    /// configuration file, then built-in defaults.
    pub fn load(vault: &Path) -> Result<Self> {
        let local = Self::vault_config_path(vault);
        if local.exists() {
            debug!("Loading configuration from {}", local.display());
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                debug!("Loading configuration from {}", global.display());
                return Self::load_from(&global);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RolloError::config_with_path(format!("failed to read config file: {}", e), path)
        })?;
        toml::from_str(&content).map_err(|e| {
            RolloError::config_with_path(format!("failed to parse config file: {}", e), path)
        })
    }

    /// Path of the vault-local configuration file.
    #[must_use]
    pub fn vault_config_path(vault: &Path) -> PathBuf {
        vault.join("rollo.toml")
    }

    /// Path of the per-user configuration file, if a config dir exists.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rollo").join("config.toml"))
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.source_page.trim().is_empty() {
            return Err(RolloError::invalid_config(
                "source_page",
                "must not be empty",
            ));
        }
        if !self.rollover_header.starts_with('#') {
            return Err(RolloError::invalid_config(
                "rollover_header",
                "must be a markdown heading starting with '#'",
            ));
        }
        Ok(())
    }
}
