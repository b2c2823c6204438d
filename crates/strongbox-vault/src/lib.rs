// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted vault files for the Strongbox credential vault.
//!
//! Each vault is one file holding one serde payload, sealed with AES-256-GCM
//! under a key derived from the master password via PBKDF2-HMAC-SHA256. Both
//! the credential book and the browser backup use this format.

pub mod book;
pub mod codec;
pub mod crypto;
pub mod generator;
pub mod kdf;
pub mod prompt;
pub mod store;
pub mod strength;

pub use book::CredentialBook;
pub use generator::{generate_id, generate_password, mask_secret};
pub use prompt::{master_password, master_password_with_confirm};
pub use store::VaultStore;
pub use strength::{estimate_strength, StrengthEstimate};
