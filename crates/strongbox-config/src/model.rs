// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Strongbox credential vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Strongbox configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StrongboxConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Where the two vault files live.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Browser profile discovery overrides.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Secure eraser tuning.
    #[serde(default)]
    pub eraser: EraserConfig,
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Vault file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Per-user application-data directory holding both vault files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File name of the main credential vault.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// File name of the browser-backup vault. Must differ from `vault_file`.
    #[serde(default = "default_browser_vault_file")]
    pub browser_vault_file: String,
}

impl StorageConfig {
    /// Absolute path of the main credential vault.
    pub fn vault_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.vault_file)
    }

    /// Absolute path of the browser-backup vault.
    pub fn browser_vault_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.browser_vault_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            vault_file: default_vault_file(),
            browser_vault_file: default_browser_vault_file(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("strongbox"))
        .unwrap_or_else(|| PathBuf::from("strongbox"))
        .to_string_lossy()
        .into_owned()
}

fn default_vault_file() -> String {
    "vault.safp".to_string()
}

fn default_browser_vault_file() -> String {
    "browser_vault.safp".to_string()
}

/// Browser discovery configuration.
///
/// Both fields are unset by default, which selects the platform's standard
/// browser locations.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Firefox base directory (the one containing `profiles.ini`).
    #[serde(default)]
    pub firefox_dir: Option<String>,

    /// Chromium-family brand base directories (each containing `Default`, `Profile N`).
    #[serde(default)]
    pub chromium_dirs: Option<Vec<String>>,
}

/// Secure eraser configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EraserConfig {
    /// Size in bytes of the reusable overwrite buffer.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_buffer_size() -> usize {
    4096
}
