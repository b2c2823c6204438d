// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser protection subcommands: `find`, `backup`, `restore`, `wipe`,
//! `protect`, `startup` and `exit`.

use secrecy::SecretString;
use strongbox_browser::{BrowserBackupManager, Lifecycle, StartupAction};
use strongbox_config::StrongboxConfig;
use strongbox_core::{BatchReport, DeletionReport, StrongboxError};
use strongbox_vault::VaultStore;

use crate::output::Output;

fn lifecycle(config: &StrongboxConfig) -> Lifecycle {
    Lifecycle::new(
        BrowserBackupManager::from_config(config),
        VaultStore::new(config.storage.vault_path()),
    )
}

fn report_batch(out: Output, verb: &str, report: &BatchReport) {
    out.success(format!("{verb} {} browser file(s)", report.processed));
    out.warnings(&report.warnings);
}

/// Print the deletion report; a report with locked files becomes an error.
fn report_deletion(out: Output, report: DeletionReport) -> Result<(), StrongboxError> {
    if !report.success && report.locked_files.is_empty() {
        return Err(StrongboxError::BatchFailed {
            operation: "secure delete",
            warnings: report.warnings,
        });
    }
    out.warnings(&report.warnings);
    if !report.locked_files.is_empty() {
        return Err(StrongboxError::LockedFile {
            paths: report.locked_files,
        });
    }
    out.success(format!("securely deleted {} browser file(s)", report.deleted));
    Ok(())
}

/// `strongbox find`: list discovered credential files.
pub fn run_find(config: &StrongboxConfig, out: Output) {
    let files = BrowserBackupManager::from_config(config).find_files();
    for path in files.iter() {
        out.line(path.display().to_string());
    }
    out.success(format!("{} browser credential file(s) found", files.len()));
}

/// `strongbox backup`: the password must unlock the main vault first.
pub async fn run_backup(
    config: &StrongboxConfig,
    password: &SecretString,
    out: Output,
) -> Result<(), StrongboxError> {
    let lifecycle = lifecycle(config);
    lifecycle.unlock(password).await?;
    let report = lifecycle.manager().backup(password).await?;
    report_batch(out, "backed up", &report);
    Ok(())
}

/// `strongbox restore`
pub async fn run_restore(
    config: &StrongboxConfig,
    password: &SecretString,
    out: Output,
) -> Result<(), StrongboxError> {
    let report = BrowserBackupManager::from_config(config)
        .restore(password)
        .await?;
    report_batch(out, "restored", &report);
    Ok(())
}

/// `strongbox wipe [--immediate]`: no master password needed.
pub async fn run_wipe(
    config: &StrongboxConfig,
    immediate: bool,
    out: Output,
) -> Result<(), StrongboxError> {
    let report = BrowserBackupManager::from_config(config)
        .secure_delete_all(immediate)
        .await?;
    report_deletion(out, report)
}

/// `strongbox protect`: back up, then delete the originals.
pub async fn run_protect(
    config: &StrongboxConfig,
    password: &SecretString,
    out: Output,
) -> Result<(), StrongboxError> {
    let lifecycle = lifecycle(config);
    lifecycle.unlock(password).await?;
    let (backup, deletion) = lifecycle
        .manager()
        .backup_then_secure_delete(password)
        .await?;
    report_batch(out, "backed up", &backup);
    report_deletion(out, deletion)
}

/// `strongbox startup`: first-run protection or restore, as the session policy decides.
pub async fn run_startup(
    config: &StrongboxConfig,
    password: &SecretString,
    out: Output,
) -> Result<(), StrongboxError> {
    match lifecycle(config).on_launch(password).await? {
        StartupAction::Protected { backup, deletion } => {
            report_batch(out, "backed up", &backup);
            report_deletion(out, deletion)
        }
        StartupAction::Restored(report) => {
            report_batch(out, "restored", &report);
            Ok(())
        }
        StartupAction::Skipped => {
            out.success("nothing to do");
            Ok(())
        }
    }
}

/// `strongbox exit`: back up, then delete requiring immediate removal.
pub async fn run_exit(
    config: &StrongboxConfig,
    password: &SecretString,
    out: Output,
) -> Result<(), StrongboxError> {
    let report = lifecycle(config).exit(password).await?;
    if let Some(backup) = &report.backup {
        report_batch(out, "backed up", backup);
    }
    report_deletion(out, report.deletion)
}

/// Whether `startup` will create the main vault, so the password needs confirming.
pub fn is_first_run(config: &StrongboxConfig) -> bool {
    lifecycle(config).is_first_run()
}
