// SPDX-License-Identifier: MPL-2.0
//! This module handles the crate's configuration, including loading and
//! saving user preferences to a `settings.toml` file.
//!
//! Every field is optional in the file; absent or invalid fields fall back
//! to the defaults in [`defaults`]. The engine consumes a [`Config`]
//! through [`crate::tracker::TrackerParams`], which clamps each value to
//! its valid range.

pub mod defaults;

pub use defaults::*;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "seekback";

/// Persisted tracker preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Minimum distance in seconds between remembered positions.
    #[serde(default)]
    pub min_seek_gap_secs: Option<f64>,
    /// Number of positions kept in the history.
    #[serde(default)]
    pub history_capacity: Option<u32>,
    /// Debounce window in milliseconds for keyboard/button seeks.
    #[serde(default)]
    pub debounce_ms: Option<u64>,
    /// Load-time capture window in milliseconds.
    #[serde(default)]
    pub capture_window_ms: Option<u64>,
    /// Settle delay in milliseconds.
    #[serde(default)]
    pub settle_delay_ms: Option<u64>,
    /// Bounded polling tick interval in milliseconds.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_seek_gap_secs: Some(DEFAULT_MIN_SEEK_GAP_SECS),
            history_capacity: Some(DEFAULT_HISTORY_CAPACITY as u32),
            debounce_ms: Some(DEFAULT_DEBOUNCE_MS),
            capture_window_ms: Some(DEFAULT_CAPTURE_WINDOW_MS),
            settle_delay_ms: Some(DEFAULT_SETTLE_DELAY_MS),
            poll_interval_ms: Some(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
