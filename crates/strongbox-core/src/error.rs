// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strongbox credential vault.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across the vault engine and the browser subsystem.
///
/// Variants map one-to-one onto the failure kinds callers must tell apart:
/// a wrong master password is [`StrongboxError::Authentication`], never
/// [`StrongboxError::CorruptData`] or [`StrongboxError::Io`].
#[derive(Debug, Error)]
pub enum StrongboxError {
    /// Tag verification failed: wrong master password or tampered ciphertext.
    #[error("authentication failed: wrong master password or tampered vault")]
    Authentication,

    /// The vault file or its decrypted payload is structurally invalid.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// Read, write, rename or permission failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Files held open by another process that could not be removed synchronously.
    #[error("{} file(s) locked by another process", paths.len())]
    LockedFile { paths: Vec<PathBuf> },

    /// Password generation exhausted its retry budget.
    #[error("password generation failed: {0}")]
    Generation(String),

    /// A caller supplied an argument outside the accepted domain (empty password, bad salt).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A multi-file batch finished without a single file succeeding.
    #[error("{operation} failed: no file succeeded")]
    BatchFailed {
        operation: &'static str,
        warnings: Vec<String>,
    },

    /// Internal or unexpected errors (worker thread panics, RNG failure).
    #[error("internal error: {0}")]
    Internal(String),
}

impl StrongboxError {
    /// Wrap an I/O error with a short description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// True when the failure means "wrong master password or tampering".
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication)
    }

    /// Warnings collected before a batch gave up, if this is a batch failure.
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::BatchFailed { warnings, .. } => warnings,
            _ => &[],
        }
    }
}
