//! Launch configuration read from the environment.
//!
//! Gameplay constants live in `crate::consts` and are fixed at compile time;
//! only where the binary finds its assets, where it logs, and an optional RNG
//! seed can be chosen at launch.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_ASSET_DIR: &str = "res";
pub const DEFAULT_LOG_FILE: &str = "invaders.log";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Directory sprites and sounds are loaded from (`INVADERS_ASSETS`)
    pub asset_dir: PathBuf,
    /// Log output file (`INVADERS_LOG`)
    pub log_file: PathBuf,
    /// Fixed RNG seed for a reproducible run (`INVADERS_SEED`)
    pub seed: Option<u64>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            seed: None,
        }
    }
}

impl LaunchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = LaunchConfig::default();
        let seed = match lookup("INVADERS_SEED") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed(raw.clone()))?,
            ),
            None => None,
        };

        Ok(Self {
            asset_dir: lookup("INVADERS_ASSETS")
                .map(PathBuf::from)
                .unwrap_or(defaults.asset_dir),
            log_file: lookup("INVADERS_LOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            seed,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("INVADERS_SEED must be an unsigned integer, got {0:?}")]
    InvalidSeed(String),
}
