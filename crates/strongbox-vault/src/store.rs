// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One encrypted vault file on disk.
//!
//! A [`VaultStore`] never keeps key material between calls: every `load` and
//! `save` derives the key from the supplied password, uses it, and drops it.
//! KDF and cipher work run on the blocking pool. A `save` whose future is
//! dropped still finishes on that pool, so the file is either fully replaced
//! or left untouched.

use std::io::Write;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use strongbox_core::StrongboxError;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::codec::{self, VaultFrame};

/// Handle to a single vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultStore {
    path: PathBuf,
}

impl VaultStore {
    /// Bind a store to `path`. Nothing is touched on disk until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the vault file has been written at least once.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Decrypt and deserialize the vault.
    ///
    /// A missing file yields `T::default()`. A file shorter than the fixed
    /// frame is [`StrongboxError::CorruptData`]; a tag mismatch is
    /// [`StrongboxError::Authentication`].
    pub async fn load<T>(&self, password: &SecretString) -> Result<T, StrongboxError>
    where
        T: DeserializeOwned + Default + Send + 'static,
    {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "vault file absent, using empty payload");
                return Ok(T::default());
            }
            Err(e) => {
                return Err(StrongboxError::io(
                    format!("failed to read vault {}", self.path.display()),
                    e,
                ));
            }
        };

        let password = secret_bytes(password);
        let data = tokio::task::spawn_blocking(move || -> Result<T, StrongboxError> {
            let frame = VaultFrame::parse(&bytes)?;
            let plaintext = codec::open(&password, &frame)?;
            codec::decode_payload(&plaintext)
        })
        .await
        .map_err(join_error)??;

        debug!(path = %self.path.display(), "vault loaded");
        Ok(data)
    }

    /// Encrypt `data` under a fresh salt and nonce and atomically replace the vault file.
    pub async fn save<T>(&self, data: &T, password: &SecretString) -> Result<(), StrongboxError>
    where
        T: Serialize + ?Sized,
    {
        if password.expose_secret().is_empty() {
            return Err(StrongboxError::InvalidInput(
                "master password must not be empty".to_string(),
            ));
        }

        let plaintext = codec::encode_payload(data)?;
        let password = secret_bytes(password);
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || -> Result<(), StrongboxError> {
            let frame = codec::seal(&password, &plaintext)?;
            write_atomic(&path, &frame.to_bytes())
        })
        .await
        .map_err(join_error)??;

        info!(path = %self.path.display(), "vault saved");
        Ok(())
    }
}

fn secret_bytes(password: &SecretString) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(password.expose_secret().as_bytes().to_vec())
}

fn join_error(e: tokio::task::JoinError) -> StrongboxError {
    StrongboxError::Internal(format!("vault worker failed: {e}"))
}

/// Write to a temp file beside `path`, fsync, then rename over `path`.
///
/// The temp file is removed when any step fails before the rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StrongboxError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| {
        StrongboxError::io(format!("failed to create vault directory {}", dir.display()), e)
    })?;

    let prefix = path
        .file_name()
        .map(|name| format!(".{}.", name.to_string_lossy()))
        .unwrap_or_else(|| ".vault.".to_string());

    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| StrongboxError::io("failed to create temporary vault file", e))?;

    tmp.write_all(bytes)
        .map_err(|e| StrongboxError::io("failed to write temporary vault file", e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StrongboxError::io("failed to flush temporary vault file", e))?;

    tmp.persist(path).map_err(|e| {
        StrongboxError::io(format!("failed to replace vault {}", path.display()), e.error)
    })?;
    Ok(())
}
