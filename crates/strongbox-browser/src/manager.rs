// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backup, restore and protective deletion of browser credential files.
//!
//! The manager owns its own [`VaultStore`] bound to the browser-backup file,
//! separate from the main credential vault. Discovery and deletion never need
//! the master password; only backup and restore do.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::SecretString;
use strongbox_config::StrongboxConfig;
use strongbox_core::{
    BatchReport, BrowserBackupPayload, DeletionReport, DiscoveredFiles, StrongboxError,
};
use strongbox_vault::VaultStore;
use tracing::{debug, info, warn};

use crate::discovery::Discovery;
use crate::eraser::SecureEraser;

/// Orchestrates discovery, the browser-backup vault and the secure eraser.
#[derive(Debug, Clone)]
pub struct BrowserBackupManager {
    discovery: Arc<Discovery>,
    store: VaultStore,
    eraser: Arc<SecureEraser>,
}

impl BrowserBackupManager {
    pub fn new(discovery: Discovery, store: VaultStore, eraser: SecureEraser) -> Self {
        Self {
            discovery: Arc::new(discovery),
            store,
            eraser: Arc::new(eraser),
        }
    }

    /// Manager wired from the `[storage]`, `[discovery]` and `[eraser]` sections.
    pub fn from_config(config: &StrongboxConfig) -> Self {
        Self::new(
            Discovery::from_config(&config.discovery),
            VaultStore::new(config.storage.browser_vault_path()),
            SecureEraser::new(config.eraser.buffer_size),
        )
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// Every browser credential file currently on disk.
    pub fn find_files(&self) -> DiscoveredFiles {
        self.discovery.find_credential_files()
    }

    pub fn backup_exists(&self) -> bool {
        self.store.exists()
    }

    pub fn browser_files_exist(&self) -> bool {
        !self.find_files().is_empty()
    }

    /// Copy every discovered file into the browser vault.
    ///
    /// Per-file failures become warnings. If no file could be read the vault
    /// is left untouched and [`StrongboxError::BatchFailed`] is returned.
    pub async fn backup(&self, password: &SecretString) -> Result<BatchReport, StrongboxError> {
        let discovery = Arc::clone(&self.discovery);
        let (payload, warnings) = tokio::task::spawn_blocking(move || {
            let files = discovery.find_credential_files();
            collect_payload(&files)
        })
        .await
        .map_err(join_error)??;

        if payload.is_empty() {
            return Err(StrongboxError::BatchFailed {
                operation: "backup",
                warnings,
            });
        }

        self.store.save(&payload, password).await?;
        info!(files = payload.len(), warnings = warnings.len(), "browser files backed up");
        Ok(BatchReport {
            processed: payload.len(),
            warnings,
        })
    }

    /// Write every file in the browser vault back to its original path.
    ///
    /// Authentication and corruption errors from the vault propagate
    /// unchanged and nothing is written. A missing or empty backup, or a
    /// batch where no file could be written, is [`StrongboxError::BatchFailed`].
    pub async fn restore(&self, password: &SecretString) -> Result<BatchReport, StrongboxError> {
        if !self.store.exists() {
            return Err(StrongboxError::BatchFailed {
                operation: "restore",
                warnings: vec![format!(
                    "backup file not found: {}",
                    self.store.path().display()
                )],
            });
        }

        let payload: BrowserBackupPayload = self.store.load(password).await?;
        if payload.is_empty() {
            return Err(StrongboxError::BatchFailed {
                operation: "restore",
                warnings: vec!["backup contains no files".to_string()],
            });
        }

        let report = tokio::task::spawn_blocking(move || restore_payload(&payload))
            .await
            .map_err(join_error)?;

        if report.processed == 0 {
            return Err(StrongboxError::BatchFailed {
                operation: "restore",
                warnings: report.warnings,
            });
        }
        info!(files = report.processed, warnings = report.warnings.len(), "browser files restored");
        Ok(report)
    }

    /// Securely delete every discovered browser file.
    ///
    /// With `require_immediate`, files whose removal was only deferred (pending
    /// handle close or reboot) are listed in `locked_files` and fail the run.
    pub async fn secure_delete_all(
        &self,
        require_immediate: bool,
    ) -> Result<DeletionReport, StrongboxError> {
        let discovery = Arc::clone(&self.discovery);
        let eraser = Arc::clone(&self.eraser);
        tokio::task::spawn_blocking(move || {
            let files = discovery.find_credential_files();
            delete_files(&eraser, &files, require_immediate)
        })
        .await
        .map_err(join_error)
    }

    /// Back up, then delete the originals with deferral allowed.
    ///
    /// Nothing is deleted unless the backup succeeded.
    pub async fn backup_then_secure_delete(
        &self,
        password: &SecretString,
    ) -> Result<(BatchReport, DeletionReport), StrongboxError> {
        let backup = self.backup(password).await.inspect_err(|e| {
            warn!(error = %e, "backup failed, browser files not deleted");
        })?;
        let deletion = self.secure_delete_all(false).await?;
        Ok((backup, deletion))
    }
}

fn join_error(e: tokio::task::JoinError) -> StrongboxError {
    StrongboxError::Internal(format!("browser worker failed: {e}"))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read each file through a private temp copy and base64-encode it.
fn collect_payload(
    files: &DiscoveredFiles,
) -> Result<(BrowserBackupPayload, Vec<String>), StrongboxError> {
    let mut payload = BrowserBackupPayload::default();
    let mut warnings = Vec::new();

    if files.is_empty() {
        warnings.push("no supported browser credential files found".to_string());
        return Ok((payload, warnings));
    }

    let staging = tempfile::Builder::new()
        .prefix("strongbox_backup_")
        .tempdir()
        .map_err(|e| StrongboxError::io("failed to create backup staging directory", e))?;

    for source in files.iter() {
        if source.to_str().is_none() {
            warn!(path = %source.display(), "skipping file with non UTF-8 path");
            warnings.push(format!(
                "skipped {}: path is not valid UTF-8",
                source.display()
            ));
            continue;
        }

        let copy = staging
            .path()
            .join(format!("{}_{}", uuid::Uuid::new_v4(), file_label(source)));

        let read = std::fs::copy(source, &copy).and_then(|_| std::fs::read(&copy));
        if let Err(e) = std::fs::remove_file(&copy)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            debug!(path = %copy.display(), error = %e, "failed to remove staging copy");
        }

        match read {
            Ok(content) => {
                if !payload.insert(source, STANDARD.encode(&content)) {
                    continue;
                }
                debug!(path = %source.display(), bytes = content.len(), "file staged for backup");
            }
            Err(e) => {
                warn!(path = %source.display(), error = %e, "skipping file in backup");
                warnings.push(format!("error copying {}: {e}", file_label(source)));
            }
        }
    }

    Ok((payload, warnings))
}

fn restore_payload(payload: &BrowserBackupPayload) -> BatchReport {
    let mut report = BatchReport::default();

    for (key, encoded) in &payload.files {
        let Some(target) = payload.original_paths.get(key).filter(|p| !p.is_empty()) else {
            warn!(key = %key, "backup entry has no original path");
            report
                .warnings
                .push(format!("missing original path for {key}, skipped"));
            continue;
        };
        let target = PathBuf::from(target);

        match restore_one(&target, encoded) {
            Ok(()) => {
                debug!(path = %target.display(), "file restored");
                report.processed += 1;
            }
            Err(e) => {
                warn!(path = %target.display(), error = %e, "failed to restore file");
                report
                    .warnings
                    .push(format!("error restoring {}: {e}", file_label(&target)));
            }
        }
    }

    report
}

/// Decode and atomically replace `target` through a temp file in its directory.
fn restore_one(target: &Path, encoded: &str) -> Result<(), StrongboxError> {
    let content = STANDARD
        .decode(encoded)
        .map_err(|e| StrongboxError::CorruptData(format!("invalid base64 content: {e}")))?;

    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| StrongboxError::InvalidInput(format!("{} has no parent", target.display())))?;
    std::fs::create_dir_all(dir)
        .map_err(|e| StrongboxError::io(format!("failed to create {}", dir.display()), e))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!("_restore_{}_", file_label(target)))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| StrongboxError::io("failed to create restore temp file", e))?;
    tmp.write_all(&content)
        .map_err(|e| StrongboxError::io("failed to write restore temp file", e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StrongboxError::io("failed to flush restore temp file", e))?;
    tmp.persist(target)
        .map_err(|e| StrongboxError::io(format!("failed to replace {}", target.display()), e.error))?;
    Ok(())
}

fn delete_files(
    eraser: &SecureEraser,
    files: &DiscoveredFiles,
    require_immediate: bool,
) -> DeletionReport {
    let mut report = DeletionReport {
        success: true,
        ..DeletionReport::default()
    };
    if files.is_empty() {
        report.warnings.push("no browser files found to delete".to_string());
        return report;
    }

    for path in files.iter() {
        match eraser.secure_delete(path) {
            Ok(outcome) if outcome.is_immediate() => report.deleted += 1,
            Ok(outcome) if !require_immediate => {
                report.deleted += 1;
                report
                    .warnings
                    .push(format!("{} will be deleted later ({outcome:?})", file_label(path)));
            }
            Ok(outcome) => {
                report.success = false;
                report.locked_files.push(path.to_path_buf());
                report.warnings.push(format!(
                    "{} is still in use; only deferred deletion was possible ({outcome:?})",
                    file_label(path)
                ));
            }
            Err(StrongboxError::LockedFile { .. }) => {
                report.success = false;
                report.locked_files.push(path.to_path_buf());
                report
                    .warnings
                    .push(format!("{} is locked by another process", file_label(path)));
            }
            Err(e) => {
                report.success = false;
                report
                    .warnings
                    .push(format!("could not delete {}: {e}", file_label(path)));
            }
        }
    }

    info!(
        deleted = report.deleted,
        locked = report.locked_files.len(),
        success = report.success,
        "browser file deletion finished"
    );
    report
}
