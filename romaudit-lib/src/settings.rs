//! Persistent defaults read from `<config_dir>/romaudit/settings.toml`.
//!
//! Every field is optional. Command-line flags take precedence over the
//! file, and the file over built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use romaudit_dat::HashAlgorithm;

use crate::audit::DEFAULT_WORKERS;

/// Contents of `settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog used when `--datfile` is not given
    pub datfile: Option<PathBuf>,
    pub method: Option<HashAlgorithm>,
    pub workers: Option<usize>,
    /// Extensions always excluded, merged with `--exclude`
    pub exclude: Vec<String>,
    pub sort_sets: Option<bool>,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields the defaults silently; an unreadable or
    /// malformed file yields the defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Unable to read {}: {e}", path.display());
                return Self::default();
            }
        };
        match Self::parse(&contents) {
            Ok(settings) => {
                log::debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load settings from the canonical location.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    pub fn method_or_default(&self) -> HashAlgorithm {
        self.method.unwrap_or_default()
    }

    pub fn workers_or_default(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_WORKERS)
    }

    pub fn sort_sets_or_default(&self) -> bool {
        self.sort_sets.unwrap_or(false)
    }

    /// Pretty-printed TOML for display.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Canonical path to the settings file: `~/.config/romaudit/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romaudit").join("settings.toml")
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
