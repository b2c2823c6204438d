// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Strongbox integration tests.
//!
//! - [`BrowserFixture`] - fake Firefox and Chromium profile trees in a temp dir

pub mod fixture;

pub use fixture::{BrowserFixture, BrowserFixtureBuilder};
