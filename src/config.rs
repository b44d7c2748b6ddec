//! Configuration management for Heliocoin

use serde::Deserialize;
use std::fs;

use crate::error::{ChainError, Result};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Diagnostic switches. Passed into the query methods that can emit log
/// lines, so the computed values never depend on process-wide state.
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct DiagnosticsConfig {
    /// Log each stake-entropy-bit computation while the stake modifier is
    /// being accumulated.
    #[serde(default)]
    pub print_stake_modifier: bool,
}

pub fn load_config() -> Result<Config> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    if config_str.is_empty() {
        // Sane defaults when config.toml is absent
        return Ok(Config::default());
    }
    toml::from_str(&config_str).map_err(|e| ChainError::ConfigError(e.to_string()))
}
