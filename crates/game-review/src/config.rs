//! Configuration file loading for game reviews.
//!
//! Settings live in `review.toml` by default. Every field is optional and
//! command-line flags override whatever the file provides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chess_analysis::SessionOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// How to start and tune the engine.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// Executable to run. Defaults to "stockfish" (assumes it's in PATH).
    #[serde(default = "default_engine_path")]
    pub path: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Playing strength 0-20; left at the engine default when unset.
    #[serde(default)]
    pub skill_level: Option<u32>,
    /// Extra `setoption` pairs, e.g. `Threads = "4"`.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: default_engine_path(),
            args: Vec::new(),
            skill_level: None,
            options: BTreeMap::new(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
        }
    }
}

fn default_engine_path() -> String {
    "stockfish".to_string()
}

fn default_handshake_timeout_ms() -> u64 {
    10_000
}

/// Top-level review settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReviewConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Search depth per position. Defaults to 16.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Candidate lines per position. Defaults to 3.
    #[serde(default = "default_multi_pv")]
    pub multi_pv: u32,
    /// Budget for a single-position evaluation.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// JSON file that keeps evaluations between runs.
    #[serde(default)]
    pub store: Option<PathBuf>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            depth: default_depth(),
            multi_pv: default_multi_pv(),
            timeout_ms: default_timeout_ms(),
            store: None,
        }
    }
}

fn default_depth() -> u32 {
    16
}

fn default_multi_pv() -> u32 {
    3
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl ReviewConfig {
    /// Loads the configuration at `path`, or the defaults if it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            handshake_timeout: Duration::from_millis(self.engine.handshake_timeout_ms),
            init_options: self
                .engine
                .options
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
