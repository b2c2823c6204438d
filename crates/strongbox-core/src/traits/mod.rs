// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams shared across Strongbox crates.

pub mod source;

pub use source::CredentialSource;
