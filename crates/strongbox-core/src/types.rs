// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model shared by the vault engine and the browser subsystem.
//!
//! Field names serialize in PascalCase so vault payloads stay readable by
//! files written with that convention.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Category assigned to records that were created without one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// One stored credential.
///
/// The record id is never part of the record; it is the key under which the
/// record lives in its owning collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CredentialRecord {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub notes: String,
}

impl Default for CredentialRecord {
    fn default() -> Self {
        Self {
            category: default_category(),
            service: String::new(),
            username: String::new(),
            password: String::new(),
            notes: String::new(),
        }
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Encrypted payload of the browser-backup vault.
///
/// Both maps are keyed by the absolute source path. `original_paths` repeats
/// the path as a value so restore does not depend on how keys were normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BrowserBackupPayload {
    /// Source path -> base64-encoded file content.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    /// Source path -> literal original path.
    #[serde(default)]
    pub original_paths: BTreeMap<String, String>,
}

impl BrowserBackupPayload {
    /// Record one file under its absolute path.
    ///
    /// Returns `false` and records nothing when the path is not valid UTF-8,
    /// since a lossy key would restore to a different path.
    pub fn insert(&mut self, path: &Path, encoded_content: String) -> bool {
        let Some(key) = path.to_str() else {
            return false;
        };
        self.original_paths.insert(key.to_string(), key.to_string());
        self.files.insert(key.to_string(), encoded_content);
        true
    }

    /// Number of files carried by the payload.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Existing browser credential files, deduplicated case-insensitively.
///
/// Windows paths are case-insensitive; the set applies the same rule on every
/// platform so discovery results are deterministic. The first spelling seen wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredFiles {
    entries: BTreeMap<String, PathBuf>,
}

impl DiscoveredFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path; returns `false` when a case-insensitive duplicate was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        let key = path.to_string_lossy().to_lowercase();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, path);
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries
            .contains_key(&path.to_string_lossy().to_lowercase())
    }

    pub fn extend(&mut self, other: DiscoveredFiles) {
        for path in other.entries.into_values() {
            self.insert(path);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.entries.values().map(PathBuf::as_path)
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.entries.into_values().collect()
    }
}

impl FromIterator<PathBuf> for DiscoveredFiles {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut files = Self::new();
        for path in iter {
            files.insert(path);
        }
        files
    }
}

/// Result of a multi-file backup or restore batch that succeeded for at least one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files backed up or restored.
    pub processed: usize,
    /// Per-file problems that did not abort the batch.
    pub warnings: Vec<String>,
}

/// Result of a protective deletion pass over every discovered browser file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    /// False when any file remains, or, under immediate mode, only achieved deferred deletion.
    pub success: bool,
    /// Files removed (immediately, or deferred when deferral is acceptable).
    pub deleted: usize,
    /// Human-readable per-file notes.
    pub warnings: Vec<String>,
    /// Files that could not be removed synchronously.
    pub locked_files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_defaults_to_other_category() {
        let record: CredentialRecord = serde_json::from_str(r#"{"Service":"mail"}"#).unwrap();
        assert_eq!(record.category, "Other");
        assert_eq!(record.service, "mail");
        assert!(record.password.is_empty());
    }

    #[test]
    fn record_serializes_pascal_case_without_id() {
        let record = CredentialRecord {
            service: "bank".into(),
            username: "alice".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"Service\":\"bank\""));
        assert!(json.contains("\"Username\":\"alice\""));
        assert!(!json.to_lowercase().contains("\"id\""));
    }

    #[test]
    fn payload_insert_fills_both_maps() {
        let mut payload = BrowserBackupPayload::default();
        assert!(payload.insert(Path::new("/home/a/.mozilla/logins.json"), "AAEC".into()));

        assert_eq!(payload.len(), 1);
        assert_eq!(
            payload.original_paths.get("/home/a/.mozilla/logins.json").map(String::as_str),
            Some("/home/a/.mozilla/logins.json")
        );
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"Files\""));
        assert!(json.contains("\"OriginalPaths\""));
    }

    #[cfg(unix)]
    #[test]
    fn payload_rejects_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut payload = BrowserBackupPayload::default();
        let path = Path::new(OsStr::from_bytes(b"/home/a/prof\xff/key4.db"));

        assert!(!payload.insert(path, "AAEC".into()));
        assert!(payload.is_empty());
        assert!(payload.original_paths.is_empty());
    }

    #[test]
    fn discovered_files_dedup_case_insensitively() {
        let mut files = DiscoveredFiles::new();
        assert!(files.insert(PathBuf::from("/Users/Bob/Chrome/Default/Login Data")));
        assert!(!files.insert(PathBuf::from("/users/bob/chrome/default/login data")));
        assert_eq!(files.len(), 1);
        assert!(files.contains(Path::new("/USERS/BOB/CHROME/DEFAULT/LOGIN DATA")));
        // First spelling wins.
        assert_eq!(
            files.iter().next(),
            Some(Path::new("/Users/Bob/Chrome/Default/Login Data"))
        );
    }

    #[test]
    fn discovered_files_extend_keeps_union() {
        let mut a: DiscoveredFiles = vec![PathBuf::from("/a/key4.db")].into_iter().collect();
        let b: DiscoveredFiles = vec![PathBuf::from("/A/KEY4.DB"), PathBuf::from("/b/Login Data")]
            .into_iter()
            .collect();
        a.extend(b);
        assert_eq!(a.len(), 2);
    }
}
