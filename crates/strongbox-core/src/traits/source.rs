// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential source trait for browser-family discovery strategies.

use crate::error::StrongboxError;
use crate::types::DiscoveredFiles;

/// One browser family's way of locating credential-bearing files.
///
/// Implementations resolve their platform base directories, enumerate profiles,
/// and return every existing credential file as an absolute path. An error
/// means the whole source was unreachable; callers log it and move on to the
/// next source.
pub trait CredentialSource: Send + Sync {
    /// Short family name used in log fields (e.g. `"firefox"`).
    fn name(&self) -> &'static str;

    /// Enumerate existing credential files for this family.
    fn find_files(&self) -> Result<DiscoveredFiles, StrongboxError>;
}
