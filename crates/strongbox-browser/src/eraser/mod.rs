// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-pass overwrite and delete, with lock recovery for files held open
//! by another process.

pub mod recovery;

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use rand::RngCore;
use strongbox_core::StrongboxError;
use tracing::{debug, info, warn};

pub use recovery::{RecoveryStep, RecoveryStrategy};

/// Default size of the reusable overwrite buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Fill pattern of one overwrite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Random,
    Zeros,
    Ones,
}

/// Passes applied in order before a file is deleted.
pub const PASSES: [Pass; 3] = [Pass::Random, Pass::Zeros, Pass::Ones];

impl Pass {
    fn fill(self, buf: &mut [u8]) {
        match self {
            Pass::Random => rand::rngs::OsRng.fill_bytes(buf),
            Pass::Zeros => buf.fill(0x00),
            Pass::Ones => buf.fill(0xFF),
        }
    }
}

/// Write target for the overwrite phase.
pub trait BackingStore {
    /// Current length in bytes.
    fn len(&mut self) -> io::Result<u64>;
    /// Position the next write at offset 0.
    fn rewind(&mut self) -> io::Result<()>;
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()>;
    /// Push written bytes to stable storage.
    fn sync(&mut self) -> io::Result<()>;
}

impl BackingStore for File {
    fn len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.write_all(chunk)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_data()
    }
}

/// Overwrite the full length of `store` once per entry in [`PASSES`],
/// syncing after each pass. Memory use is bounded by `buffer_size`.
pub fn overwrite<S: BackingStore + ?Sized>(store: &mut S, buffer_size: usize) -> io::Result<()> {
    let len = store.len()?;
    let mut buf = vec![0u8; buffer_size.max(1)];

    for pass in PASSES {
        store.rewind()?;
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(buf.len() as u64) as usize;
            let chunk = &mut buf[..n];
            pass.fill(chunk);
            store.write_chunk(chunk)?;
            remaining -= n as u64;
        }
        store.sync()?;
    }
    Ok(())
}

/// How a file stopped existing (or will).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErasureOutcome {
    /// Nothing was at the path.
    Absent,
    /// Overwritten with every pass, then deleted.
    Erased,
    /// Overwrite failed for a reason other than a lock; a plain delete worked.
    DeletedWithoutOverwrite,
    /// Deleted through a delete-on-close handle.
    DeletedOnClose,
    /// Renamed aside, then deleted.
    DeletedAfterMove,
    /// Marked delete-on-close, but another handle keeps it alive for now.
    DeletePending,
    /// Will be deleted when the system restarts.
    ScheduledForReboot { path: PathBuf },
}

impl ErasureOutcome {
    /// Whether the path is gone now, as opposed to at some later point.
    pub fn is_immediate(&self) -> bool {
        !matches!(self, Self::DeletePending | Self::ScheduledForReboot { .. })
    }
}

/// Securely deletes files, falling back to lock recovery strategies.
pub struct SecureEraser {
    buffer_size: usize,
    strategies: Vec<RecoveryStrategy>,
    is_lock_error: fn(&io::Error) -> bool,
}

impl std::fmt::Debug for SecureEraser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(RecoveryStrategy::name).collect();
        f.debug_struct("SecureEraser")
            .field("buffer_size", &self.buffer_size)
            .field("strategies", &names)
            .finish()
    }
}

impl Default for SecureEraser {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl SecureEraser {
    /// Eraser with this platform's recovery strategies and lock detection.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
            strategies: recovery::platform_strategies(),
            is_lock_error: recovery::is_lock_violation,
        }
    }

    /// Replace the recovery chain.
    pub fn with_strategies(mut self, strategies: Vec<RecoveryStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Replace the predicate deciding which I/O errors enter lock recovery.
    pub fn with_lock_predicate(mut self, is_lock_error: fn(&io::Error) -> bool) -> Self {
        self.is_lock_error = is_lock_error;
        self
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Overwrite and delete `path`.
    ///
    /// A lock error during either phase runs the recovery chain. When every
    /// strategy fails the file is reported as [`StrongboxError::LockedFile`].
    pub fn secure_delete(&self, path: &Path) -> Result<ErasureOutcome, StrongboxError> {
        match std::fs::symlink_metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ErasureOutcome::Absent),
            Err(e) => {
                return Err(StrongboxError::io(format!("failed to stat {}", path.display()), e));
            }
        }

        let overwritten = match self.overwrite_file(path) {
            Ok(()) => true,
            Err(e) if (self.is_lock_error)(&e) => return self.recover(path, e),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "overwrite failed, deleting without overwrite");
                false
            }
        };

        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), overwritten, "file deleted");
                Ok(if overwritten {
                    ErasureOutcome::Erased
                } else {
                    ErasureOutcome::DeletedWithoutOverwrite
                })
            }
            Err(e) if (self.is_lock_error)(&e) => self.recover(path, e),
            Err(e) => Err(StrongboxError::io(format!("failed to delete {}", path.display()), e)),
        }
    }

    fn overwrite_file(&self, path: &Path) -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).open(path)?;
        overwrite(&mut file, self.buffer_size)
    }

    fn recover(&self, path: &Path, cause: io::Error) -> Result<ErasureOutcome, StrongboxError> {
        if self.strategies.is_empty() {
            warn!(path = %path.display(), error = %cause, "file locked and no recovery available");
            return Err(StrongboxError::LockedFile {
                paths: vec![path.to_path_buf()],
            });
        }

        info!(path = %path.display(), error = %cause, "file locked, attempting recovery");
        let mut target = path.to_path_buf();
        for strategy in &self.strategies {
            match strategy.apply(&target) {
                Ok(RecoveryStep::Done(outcome)) => {
                    info!(path = %path.display(), strategy = strategy.name(), ?outcome, "lock recovery succeeded");
                    return Ok(outcome);
                }
                Ok(RecoveryStep::Moved(moved)) => {
                    debug!(from = %target.display(), to = %moved.display(), "file moved aside, still present");
                    target = moved;
                }
                Err(e) => {
                    debug!(path = %target.display(), strategy = strategy.name(), error = %e, "recovery strategy failed");
                }
            }
        }

        warn!(path = %path.display(), "all lock recovery strategies failed");
        Err(StrongboxError::LockedFile {
            paths: vec![target],
        })
    }
}
