//! Configuration loading from TOML files

mod catalog;
mod constants;

pub use catalog::{Catalog, SpeciesDef, MAX_POWER};
pub use constants::{
    AiConstants, BattleConstants, BurnPreset, ConditionPresets, ConfusionPreset, ParalysisPreset, PoisonPreset,
    ResetPreset, TeamConstants,
};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
    #[error("Unknown species: {0}")]
    UnknownSpecies(String),
    #[error("Species {species} references unknown move {id}")]
    UnknownMove { species: String, id: String },
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Fail with a validation error unless `value` is a probability
pub(crate) fn check_unit(what: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!("{what} must be within [0, 1], got {value}")))
    }
}
