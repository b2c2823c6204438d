// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Firefox-family profile discovery through `profiles.ini`.

use std::path::{Path, PathBuf};

use strongbox_core::{CredentialSource, DiscoveredFiles, StrongboxError};
use tracing::debug;

use super::{probe_files, profiles_ini};

/// Files inside a Firefox profile that hold saved logins and their key.
pub const FIREFOX_FILES: &[&str] = &["logins.json", "key4.db"];

/// Platform location of the Firefox data directory, if the home directory is known.
pub fn default_base_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        dirs::config_dir().map(|d| d.join("Mozilla").join("Firefox"))
    } else if cfg!(target_os = "macos") {
        dirs::home_dir().map(|d| d.join("Library").join("Application Support").join("Firefox"))
    } else {
        dirs::home_dir().map(|d| d.join(".mozilla").join("firefox"))
    }
}

/// Finds credential files in every profile listed by `profiles.ini`.
#[derive(Debug, Clone)]
pub struct FirefoxSource {
    base_dir: Option<PathBuf>,
}

impl FirefoxSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    pub fn platform_default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Existing profile directories named by `profiles.ini`.
    pub fn profile_dirs(&self) -> Result<Vec<PathBuf>, StrongboxError> {
        let Some(base) = self.base_dir.as_deref() else {
            return Ok(Vec::new());
        };
        let ini = base.join("profiles.ini");
        if !ini.is_file() {
            debug!(path = %ini.display(), "no Firefox profiles.ini");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&ini)
            .map_err(|e| StrongboxError::io(format!("failed to read {}", ini.display()), e))?;

        Ok(profiles_ini::parse_profiles(&content)
            .iter()
            .map(|entry| entry.resolve(base))
            .filter(|dir| dir.is_dir())
            .collect())
    }
}

impl CredentialSource for FirefoxSource {
    fn name(&self) -> &'static str {
        "firefox"
    }

    fn find_files(&self) -> Result<DiscoveredFiles, StrongboxError> {
        let mut found = DiscoveredFiles::new();
        for dir in self.profile_dirs()? {
            found.extend(probe_files(&dir, FIREFOX_FILES));
        }
        Ok(found)
    }
}
