//! Exclusive lock on a root store for the duration of one placement.
//!
//! The lock is an OS advisory lock on `<root>/.repohub.lock`, so hubs in
//! different processes serving the same root also exclude each other. It is
//! released on drop.

use crate::config::PlacementConfig;
use crate::error::{HubError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Held while a placement creates or renames directories in the root.
#[derive(Debug)]
pub struct PlacementLock {
    path: PathBuf,
    file: Option<File>,
}

impl PlacementLock {
    /// Block until the lock for `root` is acquired.
    ///
    /// A missing root is a lookup failure, not a lock failure.
    pub fn acquire(root: &Path) -> Result<Self> {
        let path = root.join(PlacementConfig::LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => HubError::lookup(e, root),
                _ => HubError::Lock {
                    path: path.clone(),
                    message: e.to_string(),
                },
            })?;

        file.lock_exclusive().map_err(|e| HubError::Lock {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    /// Try once without blocking; `Ok(None)` when someone else holds it.
    #[cfg(test)]
    fn try_acquire(root: &Path) -> Result<Option<Self>> {
        let path = root.join(PlacementConfig::LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| HubError::lookup(e, root))?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self {
                path,
                file: Some(file),
            })),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(HubError::Lock {
                path,
                message: e.to_string(),
            }),
        }
    }
}

impl Drop for PlacementLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = FileExt::unlock(&file) {
                tracing::warn!("Failed to release {}: {}", self.path.display(), e);
            }
        }
    }
}
