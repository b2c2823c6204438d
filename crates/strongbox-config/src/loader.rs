// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./strongbox.toml` > `~/.config/strongbox/strongbox.toml` >
//! `/etc/strongbox/strongbox.toml` with environment variable overrides via `STRONGBOX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::StrongboxConfig;

/// Config sections reachable from environment variables.
const ENV_SECTIONS: &[&str] = &["general_", "storage_", "discovery_", "eraser_"];

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/strongbox/strongbox.toml";

/// Local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = "strongbox.toml";

/// User config file under the platform config directory.
pub fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("strongbox/strongbox.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/strongbox/strongbox.toml` (system-wide)
/// 3. `~/.config/strongbox/strongbox.toml` (user XDG config)
/// 4. `./strongbox.toml` (local directory)
/// 5. `STRONGBOX_*` environment variables
pub fn load_config() -> Result<StrongboxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<StrongboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StrongboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StrongboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StrongboxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(StrongboxConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider mapping `STRONGBOX_<SECTION>_<KEY>` to `section.key`.
///
/// Only variables naming a known section are considered, so unrelated
/// `STRONGBOX_*` variables (such as the master password) never reach the
/// `deny_unknown_fields` check. The first underscore after the section name is
/// the only one turned into a dot: `STRONGBOX_ERASER_BUFFER_SIZE` maps to
/// `eraser.buffer_size`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("STRONGBOX_")
        .filter(|key| {
            let key = key.as_str().to_ascii_lowercase();
            ENV_SECTIONS.iter().any(|section| key.starts_with(section))
        })
        .map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    match ENV_SECTIONS.iter().find(|section| key.starts_with(*section)) {
        Some(section) => format!("{}.{}", &section[..section.len() - 1], &key[section.len()..]),
        None => key,
    }
}
