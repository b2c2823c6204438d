// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser credential protection for Strongbox.
//!
//! Finds Firefox and Chromium credential files, backs them up into a
//! dedicated encrypted vault, restores them, and securely deletes the
//! originals. File contents are treated as opaque bytes.

pub mod discovery;
pub mod eraser;
pub mod lifecycle;
pub mod manager;

pub use discovery::{ChromiumSource, Discovery, FirefoxSource};
pub use eraser::{ErasureOutcome, SecureEraser};
pub use lifecycle::{ExitReport, Lifecycle, StartupAction};
pub use manager::BrowserBackupManager;
