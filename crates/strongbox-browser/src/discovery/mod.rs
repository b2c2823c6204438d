// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser credential file discovery.
//!
//! Each browser family is a [`CredentialSource`]. [`Discovery`] unions their
//! results into one case-insensitive set; a source that fails is logged and
//! skipped so one unreadable browser never hides the others.

pub mod chromium;
pub mod firefox;
pub mod profiles_ini;

use std::path::{Path, PathBuf};

use strongbox_config::DiscoveryConfig;
use strongbox_core::{CredentialSource, DiscoveredFiles};
use tracing::{debug, warn};

pub use chromium::ChromiumSource;
pub use firefox::FirefoxSource;

/// Ordered set of discovery sources.
pub struct Discovery {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("Discovery").field("sources", &names).finish()
    }
}

impl Discovery {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Firefox and Chromium sources at their platform locations.
    pub fn platform_default() -> Self {
        Self::from_config(&DiscoveryConfig::default())
    }

    /// Sources with configured overrides applied; unset fields keep platform defaults.
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let firefox = match &config.firefox_dir {
            Some(dir) => FirefoxSource::new(dir),
            None => FirefoxSource::platform_default(),
        };
        let chromium = match &config.chromium_dirs {
            Some(dirs) => ChromiumSource::new(dirs.iter().map(PathBuf::from).collect()),
            None => ChromiumSource::platform_default(),
        };
        Self::new(vec![Box::new(firefox), Box::new(chromium)])
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Every existing credential file across all sources.
    pub fn find_credential_files(&self) -> DiscoveredFiles {
        let mut all = DiscoveredFiles::new();
        for source in &self.sources {
            match source.find_files() {
                Ok(files) => {
                    debug!(source = source.name(), count = files.len(), "discovery source done");
                    all.extend(files);
                }
                Err(e) => warn!(source = source.name(), error = %e, "skipping discovery source"),
            }
        }
        debug!(count = all.len(), "browser credential files found");
        all
    }
}

/// Existing regular files named `names` inside `dir`, as absolute paths.
pub(crate) fn probe_files(dir: &Path, names: &[&str]) -> DiscoveredFiles {
    names
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .map(|path| std::path::absolute(&path).unwrap_or(path))
        .collect()
}
