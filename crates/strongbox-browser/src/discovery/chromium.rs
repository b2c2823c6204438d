// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chromium-family profile discovery (Chrome, Edge, Brave, Vivaldi).

use std::path::{Path, PathBuf};

use strongbox_core::{CredentialSource, DiscoveredFiles, StrongboxError};
use tracing::debug;

use super::probe_files;

/// Files inside a Chromium profile or user-data directory that hold logins
/// and the key protecting them.
pub const CHROMIUM_FILES: &[&str] = &["Login Data", "Local State"];

/// Brand user-data directories for the current platform.
pub fn default_base_dirs() -> Vec<PathBuf> {
    if cfg!(windows) {
        let Some(local) = dirs::data_local_dir() else {
            return Vec::new();
        };
        [
            "Google/Chrome/User Data",
            "Microsoft/Edge/User Data",
            "BraveSoftware/Brave-Browser/User Data",
            "Vivaldi/User Data",
        ]
        .iter()
        .map(|rel| local.join(rel))
        .collect()
    } else if cfg!(target_os = "macos") {
        let Some(home) = dirs::home_dir() else {
            return Vec::new();
        };
        let support = home.join("Library").join("Application Support");
        [
            "Google/Chrome",
            "Microsoft Edge",
            "BraveSoftware/Brave-Browser",
            "Vivaldi",
        ]
        .iter()
        .map(|rel| support.join(rel))
        .collect()
    } else {
        let Some(home) = dirs::home_dir() else {
            return Vec::new();
        };
        let config = home.join(".config");
        [
            "google-chrome",
            "chromium",
            "microsoft-edge",
            "microsoft-edge-dev",
            "BraveSoftware/Brave-Browser",
            "brave-browser",
            "vivaldi",
        ]
        .iter()
        .map(|rel| config.join(rel))
        .collect()
    }
}

/// True for `Profile <n>` directory names.
pub fn is_numbered_profile(name: &str) -> bool {
    name.strip_prefix("Profile ")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Probes `Default` and `Profile <n>` under each brand directory.
#[derive(Debug, Clone)]
pub struct ChromiumSource {
    base_dirs: Vec<PathBuf>,
}

impl ChromiumSource {
    pub fn new(base_dirs: Vec<PathBuf>) -> Self {
        Self { base_dirs }
    }

    pub fn platform_default() -> Self {
        Self::new(default_base_dirs())
    }

    pub fn base_dirs(&self) -> &[PathBuf] {
        &self.base_dirs
    }

    /// Existing profile directories under one brand directory, `Default` first.
    fn profile_dirs(base: &Path) -> Vec<PathBuf> {
        let mut dirs = vec![base.join("Default")];

        match std::fs::read_dir(base) {
            Ok(entries) => {
                let mut numbered: Vec<PathBuf> = entries
                    .filter_map(Result::ok)
                    .filter(|entry| is_numbered_profile(&entry.file_name().to_string_lossy()))
                    .map(|entry| entry.path())
                    .collect();
                numbered.sort();
                dirs.extend(numbered);
            }
            Err(e) => debug!(path = %base.display(), error = %e, "cannot list Chromium profiles"),
        }

        dirs.retain(|dir| dir.is_dir());
        dirs
    }
}

impl CredentialSource for ChromiumSource {
    fn name(&self) -> &'static str {
        "chromium"
    }

    fn find_files(&self) -> Result<DiscoveredFiles, StrongboxError> {
        let mut found = DiscoveredFiles::new();
        for base in self.base_dirs.iter().filter(|dir| dir.is_dir()) {
            for profile in Self::profile_dirs(base) {
                found.extend(probe_files(&profile, CHROMIUM_FILES));
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn numbered_profile_names() {
        assert!(is_numbered_profile("Profile 1"));
        assert!(is_numbered_profile("Profile 12"));
        assert!(!is_numbered_profile("Profile"));
        assert!(!is_numbered_profile("Profile "));
        assert!(!is_numbered_profile("Profile Picture"));
        assert!(!is_numbered_profile("System Profile"));
    }

    #[test]
    fn probes_default_and_numbered_profiles() {
        let root = tempfile::tempdir().unwrap();
        let brand = root.path().join("chromium");
        for profile in ["Default", "Profile 1", "Profile 7", "Guest Profile"] {
            fs::create_dir_all(brand.join(profile)).unwrap();
            fs::write(brand.join(profile).join("Login Data"), b"sqlite").unwrap();
        }
        fs::write(brand.join("Default").join("Local State"), b"{}").unwrap();

        let files = ChromiumSource::new(vec![brand.clone()]).find_files().unwrap();
        assert_eq!(files.len(), 4);
        assert!(files.contains(&brand.join("Profile 7").join("Login Data")));
        assert!(!files.contains(&brand.join("Guest Profile").join("Login Data")));
    }

    #[test]
    fn missing_brand_directories_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        let present = root.path().join("vivaldi").join("Default");
        fs::create_dir_all(&present).unwrap();
        fs::write(present.join("Login Data"), b"x").unwrap();

        let source = ChromiumSource::new(vec![
            root.path().join("google-chrome"),
            root.path().join("vivaldi"),
        ]);
        assert_eq!(source.find_files().unwrap().len(), 1);
    }
}
