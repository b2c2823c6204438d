// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! When browser files are protected or restored across an application session.
//!
//! - First run (no main vault yet): create an empty main vault under the new
//!   master password, then, if browser files exist, back them up and delete
//!   the originals, accepting deferred deletion.
//! - Anything that writes the browser vault first unlocks the main vault with
//!   the same password, so a mistyped password never re-encrypts the backup.
//! - Later startups: if a browser backup exists and no browser files are
//!   present, restore. Partial presence does not trigger a restore.
//! - Exit: back up, then delete requiring immediate removal. The caller may
//!   drop the master password once this returns.

use secrecy::SecretString;
use strongbox_core::{BatchReport, DeletionReport, StrongboxError};
use strongbox_vault::{CredentialBook, VaultStore};
use tracing::{debug, info};

use crate::manager::BrowserBackupManager;

/// What the startup policy did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupAction {
    /// First run with browser files present: backed up and deleted.
    Protected {
        backup: BatchReport,
        deletion: DeletionReport,
    },
    /// A backup existed and no browser files did: restored.
    Restored(BatchReport),
    /// Nothing to do.
    Skipped,
}

/// What the exit policy did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReport {
    /// `None` when no browser files were present.
    pub backup: Option<BatchReport>,
    pub deletion: DeletionReport,
}

impl ExitReport {
    /// True when every browser file is gone now, so the session can end.
    pub fn is_clean(&self) -> bool {
        self.deletion.success && self.deletion.locked_files.is_empty()
    }
}

/// Session policy over a browser manager and the main credential vault.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    manager: BrowserBackupManager,
    main_vault: VaultStore,
}

impl Lifecycle {
    pub fn new(manager: BrowserBackupManager, main_vault: VaultStore) -> Self {
        Self {
            manager,
            main_vault,
        }
    }

    pub fn manager(&self) -> &BrowserBackupManager {
        &self.manager
    }

    /// No main vault has been written yet.
    pub fn is_first_run(&self) -> bool {
        !self.main_vault.exists()
    }

    /// Check `password` against the main vault.
    ///
    /// Fails with [`StrongboxError::Authentication`] on a mismatch. Succeeds
    /// without checking when no main vault exists yet.
    pub async fn unlock(&self, password: &SecretString) -> Result<(), StrongboxError> {
        if self.main_vault.exists() {
            let _: CredentialBook = self.main_vault.load(password).await?;
            debug!("main vault unlocked");
        }
        Ok(())
    }

    /// Create the empty main vault if needed, then back up and delete present browser files.
    pub async fn first_run(&self, password: &SecretString) -> Result<StartupAction, StrongboxError> {
        if self.main_vault.exists() {
            self.unlock(password).await?;
        } else {
            self.main_vault.save(&CredentialBook::new(), password).await?;
            info!(path = %self.main_vault.path().display(), "main vault created");
        }

        if !self.manager.browser_files_exist() {
            debug!("first run: no browser files to protect");
            return Ok(StartupAction::Skipped);
        }
        let (backup, deletion) = self.manager.backup_then_secure_delete(password).await?;
        info!(files = backup.processed, "first run: browser files protected");
        Ok(StartupAction::Protected { backup, deletion })
    }

    /// Restore browser files when they are all missing and a backup exists.
    pub async fn startup(&self, password: &SecretString) -> Result<StartupAction, StrongboxError> {
        if !self.manager.backup_exists() {
            debug!("startup: no browser backup");
            return Ok(StartupAction::Skipped);
        }
        if self.manager.browser_files_exist() {
            debug!("startup: browser files present, not restoring");
            return Ok(StartupAction::Skipped);
        }
        let report = self.manager.restore(password).await?;
        Ok(StartupAction::Restored(report))
    }

    /// Run [`Lifecycle::first_run`] or [`Lifecycle::startup`] as appropriate.
    pub async fn on_launch(&self, password: &SecretString) -> Result<StartupAction, StrongboxError> {
        if self.is_first_run() {
            self.first_run(password).await
        } else {
            self.startup(password).await
        }
    }

    /// Back up then delete with immediate removal required.
    ///
    /// A password the main vault rejects, or a failed backup, returns its
    /// error and deletes nothing. Locked files
    /// are reported in the deletion report; retry with
    /// [`BrowserBackupManager::secure_delete_all`] once browsers are closed.
    pub async fn exit(&self, password: &SecretString) -> Result<ExitReport, StrongboxError> {
        if !self.manager.browser_files_exist() {
            let deletion = self.manager.secure_delete_all(true).await?;
            return Ok(ExitReport {
                backup: None,
                deletion,
            });
        }

        self.unlock(password).await?;
        let backup = self.manager.backup(password).await?;
        let deletion = self.manager.secure_delete_all(true).await?;
        info!(
            backed_up = backup.processed,
            deleted = deletion.deleted,
            locked = deletion.locked_files.len(),
            "exit protection finished"
        );
        Ok(ExitReport {
            backup: Some(backup),
            deletion,
        })
    }
}
