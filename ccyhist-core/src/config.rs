//! Run configuration, loadable from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Target currencies, in output column order.
    pub target_currencies: Vec<String>,

    /// Minimum milliseconds between successive requests to one source.
    pub pacing_ms: u64,

    /// Maximum chunks fetched per symbol; bounds pathological sources.
    pub max_chunks: usize,

    /// Directory that receives one CSV per exchange.
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_currencies: vec!["USD".to_string(), "BTC".to_string()],
            pacing_ms: 1000,
            max_chunks: 10,
            output_dir: PathBuf::from("exchanges"),
        }
    }
}

impl RunConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read config file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse config TOML: {e}"))
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}
