// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fake browser profile trees for integration tests.
//!
//! `BrowserFixture` lays out a Firefox data directory (with `profiles.ini`)
//! and Chromium brand directories inside a temp dir, and hands back a
//! `StrongboxConfig` whose discovery and storage point into it.

use std::fs;
use std::path::{Path, PathBuf};

use strongbox_config::model::{DiscoveryConfig, StorageConfig};
use strongbox_config::StrongboxConfig;
use strongbox_core::StrongboxError;

struct FirefoxProfile {
    path: String,
    relative: bool,
    files: Vec<(String, Vec<u8>)>,
}

struct ChromiumProfile {
    brand: String,
    profile: String,
    files: Vec<(String, Vec<u8>)>,
}

/// Builder for creating browser fixtures with configurable profiles.
#[derive(Default)]
pub struct BrowserFixtureBuilder {
    firefox: Vec<FirefoxProfile>,
    chromium: Vec<ChromiumProfile>,
}

fn owned(files: Vec<(&str, Vec<u8>)>) -> Vec<(String, Vec<u8>)> {
    files
        .into_iter()
        .map(|(name, bytes)| (name.to_string(), bytes))
        .collect()
}

impl BrowserFixtureBuilder {
    /// Add a Firefox profile stored relative to the Firefox base directory.
    pub fn firefox_profile(mut self, relative_path: &str, files: Vec<(&str, Vec<u8>)>) -> Self {
        self.firefox.push(FirefoxProfile {
            path: relative_path.to_string(),
            relative: true,
            files: owned(files),
        });
        self
    }

    /// Add a Firefox profile stored outside the base directory (`IsRelative=0`).
    pub fn external_firefox_profile(mut self, name: &str, files: Vec<(&str, Vec<u8>)>) -> Self {
        self.firefox.push(FirefoxProfile {
            path: name.to_string(),
            relative: false,
            files: owned(files),
        });
        self
    }

    /// Add a Chromium profile directory (`Default`, `Profile 1`, ...) under `brand`.
    pub fn chromium_profile(mut self, brand: &str, profile: &str, files: Vec<(&str, Vec<u8>)>) -> Self {
        self.chromium.push(ChromiumProfile {
            brand: brand.to_string(),
            profile: profile.to_string(),
            files: owned(files),
        });
        self
    }

    /// Write the tree to a fresh temp directory.
    pub fn build(self) -> Result<BrowserFixture, StrongboxError> {
        let dir = tempfile::TempDir::new()
            .map_err(|e| StrongboxError::io("failed to create fixture directory", e))?;
        let root = dir.path().to_path_buf();
        let firefox_dir = root.join("firefox");
        let chromium_root = root.join("chromium");
        let mut files = Vec::new();
        let mut ini = String::new();

        for (index, profile) in self.firefox.iter().enumerate() {
            let (profile_dir, ini_path) = if profile.relative {
                (firefox_dir.join(&profile.path), profile.path.clone())
            } else {
                let external = root.join("external").join(&profile.path);
                let display = external.to_string_lossy().into_owned();
                (external, display)
            };
            ini.push_str(&format!(
                "[Profile{index}]\nName=profile{index}\nIsRelative={}\nPath={ini_path}\n\n",
                u8::from(profile.relative)
            ));
            files.extend(write_files(&profile_dir, &profile.files)?);
        }
        ini.push_str("[General]\nStartWithLastProfile=1\nVersion=2\n");
        create_dir(&firefox_dir)?;
        write(&firefox_dir.join("profiles.ini"), ini.as_bytes())?;

        let mut brands: Vec<PathBuf> = Vec::new();
        for profile in &self.chromium {
            let brand_dir = chromium_root.join(&profile.brand);
            if !brands.contains(&brand_dir) {
                brands.push(brand_dir.clone());
            }
            files.extend(write_files(&brand_dir.join(&profile.profile), &profile.files)?);
        }

        Ok(BrowserFixture {
            firefox_dir,
            chromium_dirs: brands,
            files,
            dir,
        })
    }
}

fn create_dir(path: &Path) -> Result<(), StrongboxError> {
    fs::create_dir_all(path)
        .map_err(|e| StrongboxError::io(format!("failed to create {}", path.display()), e))
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), StrongboxError> {
    fs::write(path, bytes)
        .map_err(|e| StrongboxError::io(format!("failed to write {}", path.display()), e))
}

fn write_files(dir: &Path, files: &[(String, Vec<u8>)]) -> Result<Vec<PathBuf>, StrongboxError> {
    create_dir(dir)?;
    files
        .iter()
        .map(|(name, bytes)| {
            let path = dir.join(name);
            write(&path, bytes).map(|()| path)
        })
        .collect()
}

/// A temp directory holding fake browser profiles. Removed on drop.
pub struct BrowserFixture {
    firefox_dir: PathBuf,
    chromium_dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
    dir: tempfile::TempDir,
}

impl BrowserFixture {
    pub fn builder() -> BrowserFixtureBuilder {
        BrowserFixtureBuilder::default()
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn firefox_dir(&self) -> &Path {
        &self.firefox_dir
    }

    /// Every credential file the fixture wrote, in creation order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Directory used for vault files.
    pub fn data_dir(&self) -> PathBuf {
        self.root().join("data")
    }

    pub fn discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            firefox_dir: Some(self.firefox_dir.to_string_lossy().into_owned()),
            chromium_dirs: Some(
                self.chromium_dirs
                    .iter()
                    .map(|d| d.to_string_lossy().into_owned())
                    .collect(),
            ),
        }
    }

    /// Full config pointing discovery and storage into the fixture.
    pub fn config(&self) -> StrongboxConfig {
        StrongboxConfig {
            storage: StorageConfig {
                data_dir: self.data_dir().to_string_lossy().into_owned(),
                ..StorageConfig::default()
            },
            discovery: self.discovery_config(),
            ..StrongboxConfig::default()
        }
    }

    /// Delete every fixture credential file, simulating a wiped profile.
    pub fn remove_files(&self) -> Result<(), StrongboxError> {
        for path in &self.files {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(StrongboxError::io(
                        format!("failed to remove {}", path.display()),
                        e,
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_firefox_and_chromium_trees() {
        let fixture = BrowserFixture::builder()
            .firefox_profile(
                "Profiles/a.default",
                vec![("logins.json", b"{}".to_vec()), ("key4.db", b"k".to_vec())],
            )
            .external_firefox_profile("work", vec![("key4.db", b"w".to_vec())])
            .chromium_profile("google-chrome", "Default", vec![("Login Data", b"l".to_vec())])
            .chromium_profile("google-chrome", "Profile 2", vec![("Login Data", b"m".to_vec())])
            .build()
            .unwrap();

        assert_eq!(fixture.files().len(), 5);
        assert!(fixture.files().iter().all(|p| p.is_file()));

        let ini = fs::read_to_string(fixture.firefox_dir().join("profiles.ini")).unwrap();
        assert!(ini.contains("IsRelative=1\nPath=Profiles/a.default"));
        assert!(ini.contains("IsRelative=0"));

        let discovery = fixture.discovery_config();
        assert_eq!(discovery.chromium_dirs.map(|d| d.len()), Some(1));
    }

    #[test]
    fn remove_files_is_idempotent() {
        let fixture = BrowserFixture::builder()
            .chromium_profile("vivaldi", "Default", vec![("Local State", b"{}".to_vec())])
            .build()
            .unwrap();
        fixture.remove_files().unwrap();
        fixture.remove_files().unwrap();
        assert!(fixture.files().iter().all(|p| !p.exists()));
    }
}
