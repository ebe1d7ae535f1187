//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::LucidacConfig;
use lucidac_common::NUM_SLOTS;
use std::path::Path;

/// Name of the configuration file inside a circuit directory.
pub const CONFIG_FILE: &str = "lucidac.toml";

/// Loads and validates a `lucidac.toml` configuration from a directory.
///
/// Reads `<dir>/lucidac.toml`, parses it, and validates its values.
pub fn load_config(dir: &Path) -> Result<LucidacConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `lucidac.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<LucidacConfig, ConfigError> {
    let config: LucidacConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates value ranges and the slot list.
fn validate_config(config: &LucidacConfig) -> Result<(), ConfigError> {
    let hw = &config.hardware;
    if hw.slots.len() != NUM_SLOTS {
        return Err(ConfigError::ValidationError(format!(
            "hardware.slots needs {NUM_SLOTS} entries, found {}",
            hw.slots.len()
        )));
    }
    for slot in &hw.slots {
        crate::resolve::parse_block_kind(slot)?;
    }
    if hw.cluster.is_empty() {
        return Err(ConfigError::ValidationError(
            "hardware.cluster must not be empty".to_string(),
        ));
    }

    let int = &config.integrators;
    if int.k == 0 {
        return Err(ConfigError::ValidationError(
            "integrators.k must be positive".to_string(),
        ));
    }
    if !(-1.0..=1.0).contains(&int.ic) {
        return Err(ConfigError::ValidationError(format!(
            "integrators.ic = {} outside [-1, 1]",
            int.ic
        )));
    }
    Ok(())
}
