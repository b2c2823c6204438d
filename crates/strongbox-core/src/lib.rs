// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strongbox credential vault.
//!
//! This crate provides the error taxonomy, the shared data model, and the
//! discovery trait used throughout the Strongbox workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StrongboxError;
pub use traits::CredentialSource;
pub use types::{
    BatchReport, BrowserBackupPayload, CredentialRecord, DeletionReport, DiscoveredFiles,
    DEFAULT_CATEGORY,
};
