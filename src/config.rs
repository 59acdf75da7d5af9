//! Configuration file parsing for debug-toggle.toml.
//!
//! The config is optional: a missing, unreadable or invalid file yields the
//! defaults (the latter two with a warning). It is loaded once per invocation
//! from the project root and passed down.
//!
//! Patterns in `exclude` are matched against paths relative to the root, the
//! same way as `--exclude`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "debug-toggle.toml";

/// Main configuration structure matching debug-toggle.toml
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Exclusion patterns (gitignore-style)
    pub exclude: Vec<String>,

    /// Only process these extensions (empty = every extension with a known marker)
    pub extensions: Vec<String>,

    /// Extra or overriding comment markers, keyed by extension
    pub markers: BTreeMap<String, String>,

    /// Watch mode settings
    pub watch: WatchConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period before a burst of file events is forwarded to the session
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100 }
    }
}

impl Config {
    /// Load configuration from debug-toggle.toml in the given root directory
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %config_path.display(), error = %e, "failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "failed to read config, using defaults");
                Self::default()
            }
        }
    }
}
