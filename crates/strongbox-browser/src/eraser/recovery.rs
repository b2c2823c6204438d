// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escalating deletion strategies for files another process holds open.
//!
//! On Windows the chain is delete-on-close, then move-and-delete, then
//! delete-at-reboot. Other platforms have no lock override and supply none.

use std::io;
use std::path::{Path, PathBuf};

use super::ErasureOutcome;

/// Result of one strategy that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryStep {
    /// The file is gone, or its removal is arranged.
    Done(ErasureOutcome),
    /// The file now lives at a new path; later strategies target that path.
    Moved(PathBuf),
}

type StrategyFn = dyn Fn(&Path) -> io::Result<RecoveryStep> + Send + Sync;

/// One named step of the recovery chain.
pub struct RecoveryStrategy {
    name: &'static str,
    run: Box<StrategyFn>,
}

impl std::fmt::Debug for RecoveryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryStrategy").field("name", &self.name).finish()
    }
}

impl RecoveryStrategy {
    pub fn new<F>(name: &'static str, run: F) -> Self
    where
        F: Fn(&Path) -> io::Result<RecoveryStep> + Send + Sync + 'static,
    {
        Self {
            name,
            run: Box::new(run),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, path: &Path) -> io::Result<RecoveryStep> {
        (self.run)(path)
    }
}

/// Recovery chain for the current platform.
pub fn platform_strategies() -> Vec<RecoveryStrategy> {
    #[cfg(windows)]
    {
        vec![
            RecoveryStrategy::new("delete-on-close", windows::delete_on_close),
            RecoveryStrategy::new("move-then-delete", windows::move_then_delete),
            RecoveryStrategy::new("delete-at-reboot", windows::schedule_for_reboot),
        ]
    }
    #[cfg(not(windows))]
    {
        Vec::new()
    }
}

/// Whether `err` is a sharing or lock violation.
pub fn is_lock_violation(err: &io::Error) -> bool {
    #[cfg(windows)]
    {
        use winapi::shared::winerror::{ERROR_LOCK_VIOLATION, ERROR_SHARING_VIOLATION};
        matches!(
            err.raw_os_error().map(|code| code as u32),
            Some(ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION)
        )
    }
    #[cfg(not(windows))]
    {
        let _ = err;
        false
    }
}

/// Sibling path used when moving a locked file aside.
pub fn aside_path(path: &Path) -> PathBuf {
    let name = format!(".strongbox-erase-{}.tmp", uuid::Uuid::new_v4().simple());
    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

#[cfg(windows)]
mod windows {
    use std::fs::OpenOptions;
    use std::io;
    use std::os::windows::ffi::OsStrExt;
    use std::os::windows::fs::OpenOptionsExt;
    use std::path::Path;

    use winapi::um::winbase::{MoveFileExW, FILE_FLAG_DELETE_ON_CLOSE, MOVEFILE_DELAY_UNTIL_REBOOT};
    use winapi::um::winnt::{DELETE, FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE};

    use super::{aside_path, ErasureOutcome, RecoveryStep};

    pub(super) fn delete_on_close(path: &Path) -> io::Result<RecoveryStep> {
        let handle = OpenOptions::new()
            .access_mode(DELETE)
            .share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE)
            .custom_flags(FILE_FLAG_DELETE_ON_CLOSE)
            .open(path)?;
        drop(handle);

        Ok(RecoveryStep::Done(if path.exists() {
            ErasureOutcome::DeletePending
        } else {
            ErasureOutcome::DeletedOnClose
        }))
    }

    pub(super) fn move_then_delete(path: &Path) -> io::Result<RecoveryStep> {
        let aside = aside_path(path);
        std::fs::rename(path, &aside)?;
        match std::fs::remove_file(&aside) {
            Ok(()) => Ok(RecoveryStep::Done(ErasureOutcome::DeletedAfterMove)),
            Err(_) => Ok(RecoveryStep::Moved(aside)),
        }
    }

    pub(super) fn schedule_for_reboot(path: &Path) -> io::Result<RecoveryStep> {
        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        // SAFETY: `wide` is a NUL-terminated UTF-16 path that outlives the
        // call; a null destination with DELAY_UNTIL_REBOOT means "delete".
        let ok = unsafe { MoveFileExW(wide.as_ptr(), std::ptr::null(), MOVEFILE_DELAY_UNTIL_REBOOT) };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(RecoveryStep::Done(ErasureOutcome::ScheduledForReboot {
            path: path.to_path_buf(),
        }))
    }
}
