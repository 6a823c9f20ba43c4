//! Application configuration: TOML file loading and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. Explicit `--config` path
//! 2. `$PANEVIEW_CONFIG` environment variable (path to config file)
//! 3. Project-local `.paneview.toml` in the current working directory
//! 4. Global `~/.config/paneview/config.toml`
//! 5. Built-in defaults

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Embedded HTTP service settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the API binds on (loopback only).
    pub port: Option<u16>,
}

/// Pane/preview behavior settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    /// Minimum visible duration of the right pane's loading state, in
    /// milliseconds. Keeps instant listings from flashing.
    pub settle_ms: Option<u64>,
    /// How many bytes of a file's head the preview column fetches.
    pub preview_head_bytes: Option<u64>,
}

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (higher-priority sources override lower).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ui: UiConfig,
    /// Key → action-name bindings, overlaid on the default keymap.
    pub keys: HashMap<String, String>,
}

/// Default API port.
pub const DEFAULT_PORT: u16 = 5173;
/// Default minimum visible loading duration (≈ two frames at 60 Hz).
pub const DEFAULT_SETTLE_MS: u64 = 35;
/// Default preview head size (64 KiB).
pub const DEFAULT_PREVIEW_HEAD_BYTES: u64 = 65_536;

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("PANEVIEW_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".paneview.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("paneview").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!("Warning: failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

impl AppConfig {
    /// Merge `other` on top of `self`: `other`'s `Some` values and key
    /// bindings win.
    pub fn merge(mut self, other: &AppConfig) -> AppConfig {
        self.server.port = other.server.port.or(self.server.port);
        self.ui.settle_ms = other.ui.settle_ms.or(self.ui.settle_ms);
        self.ui.preview_head_bytes = other.ui.preview_head_bytes.or(self.ui.preview_head_bytes);
        for (k, v) in &other.keys {
            self.keys.insert(k.clone(), v.clone());
        }
        self
    }

    /// Load the final merged configuration. `cli_config_path` is an explicit
    /// config file path from `--config`, taking priority over candidates.
    pub fn load(cli_config_path: Option<&Path>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk candidates in reverse so that higher priority overwrites.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn port(&self) -> u16 {
        self.server.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn settle_ms(&self) -> u64 {
        self.ui.settle_ms.unwrap_or(DEFAULT_SETTLE_MS)
    }

    pub fn preview_head_bytes(&self) -> u64 {
        self.ui.preview_head_bytes.unwrap_or(DEFAULT_PREVIEW_HEAD_BYTES)
    }
}
