//! Single-instance guard.
//!
//! The first process takes an exclusive lock on a well-known lock file and
//! holds it until it exits; the OS drops the lock even on a crash. A second
//! process fails to take the lock and must exit before building anything.

use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};

pub const LOCK_NAME: &str = "ScreenshotServiceUniqueKey";

const APP_TITLE: &str = "Screenshot Service";
const ALREADY_RUNNING: &str = "The Screenshot Service is already running.";

/// Held for the life of the process.
#[derive(Debug)]
pub struct InstanceGuard {
    _file: File,
    path: PathBuf,
}

impl InstanceGuard {
    /// Takes the lock at `path`.
    ///
    /// `Ok(None)` means another live process holds it.
    pub fn acquire(path: &Path) -> Result<Option<Self>, InstanceError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| InstanceError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        match file.try_lock() {
            Ok(()) => Ok(Some(Self {
                _file: file,
                path: path.to_path_buf(),
            })),
            Err(TryLockError::WouldBlock) => Ok(None),
            Err(TryLockError::Error(source)) => Err(InstanceError::Lock {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `<temp>/ScreenshotServiceUniqueKey.lock`
pub fn lock_path() -> PathBuf {
    std::env::temp_dir().join(format!("{LOCK_NAME}.lock"))
}

/// Blocking warning shown by a second instance right before it exits.
pub fn warn_already_running() {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(APP_TITLE)
        .set_description(ALREADY_RUNNING)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("Failed to open lock file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
