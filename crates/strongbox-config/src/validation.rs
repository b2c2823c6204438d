// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as distinct vault file names and eraser buffer bounds.

use crate::diagnostic::ConfigError;
use crate::model::StrongboxConfig;

/// Smallest accepted eraser buffer.
pub const MIN_ERASER_BUFFER: usize = 512;

/// Largest accepted eraser buffer (16 MiB).
pub const MAX_ERASER_BUFFER: usize = 16 * 1024 * 1024;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &StrongboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.general.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "general.log_level `{}` must be one of {}",
                config.general.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.data_dir must not be empty".to_string(),
        });
    }

    for (key, name) in [
        ("storage.vault_file", &config.storage.vault_file),
        ("storage.browser_vault_file", &config.storage.browser_vault_file),
    ] {
        if name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if name.contains(['/', '\\']) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{name}` must be a file name, not a path"),
            });
        }
    }

    // Case-insensitive so the two vaults stay distinct on Windows and macOS too.
    if config
        .storage
        .vault_file
        .eq_ignore_ascii_case(&config.storage.browser_vault_file)
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "storage.browser_vault_file must differ from storage.vault_file (both `{}`)",
                config.storage.vault_file
            ),
        });
    }

    let buffer = config.eraser.buffer_size;
    if !(MIN_ERASER_BUFFER..=MAX_ERASER_BUFFER).contains(&buffer) {
        errors.push(ConfigError::Validation {
            message: format!(
                "eraser.buffer_size must be between {MIN_ERASER_BUFFER} and {MAX_ERASER_BUFFER} bytes, got {buffer}"
            ),
        });
    }

    if let Some(dirs) = &config.discovery.chromium_dirs
        && dirs.iter().any(|d| d.trim().is_empty())
    {
        errors.push(ConfigError::Validation {
            message: "discovery.chromium_dirs must not contain empty entries".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
