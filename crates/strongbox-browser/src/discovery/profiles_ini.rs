// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal reader for Firefox's `profiles.ini`.

use std::path::{Path, PathBuf};

/// One `[Profile*]` section that named a `Path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub path: String,
    pub is_relative: bool,
}

impl ProfileEntry {
    /// Resolve against the Firefox base directory when the entry is relative.
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        if self.is_relative {
            base_dir.join(&self.path)
        } else {
            PathBuf::from(&self.path)
        }
    }
}

#[derive(Default)]
struct Section {
    name: String,
    path: Option<String>,
    is_relative: bool,
}

impl Section {
    fn into_entry(self) -> Option<ProfileEntry> {
        if !self.name.starts_with("Profile") {
            return None;
        }
        self.path.map(|path| ProfileEntry {
            path,
            is_relative: self.is_relative,
        })
    }
}

/// Collect profile entries in file order.
///
/// Blank lines and `#`/`;` comments are ignored. Keys are matched
/// case-insensitively; `IsRelative=1` marks a relative path. Sections other
/// than `Profile*` (`General`, `Install*`) are skipped.
pub fn parse_profiles(content: &str) -> Vec<ProfileEntry> {
    let mut entries = Vec::new();
    let mut current: Option<Section> = None;

    let lines = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with(';'));

    for line in lines {
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if let Some(entry) = current.take().and_then(Section::into_entry) {
                entries.push(entry);
            }
            current = Some(Section {
                name: name.to_string(),
                ..Section::default()
            });
            continue;
        }

        let (Some(section), Some((key, value))) = (current.as_mut(), line.split_once('=')) else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.eq_ignore_ascii_case("Path") {
            section.path = Some(value.to_string());
        } else if key.eq_ignore_ascii_case("IsRelative") {
            section.is_relative = value == "1";
        }
    }

    if let Some(entry) = current.and_then(Section::into_entry) {
        entries.push(entry);
    }
    entries
}
