//! Advisory lock that keeps two runs from mutating the same working copy

use crate::error::{Error, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Lock file name inside the `.git` directory.
const LOCK_FILE: &str = "pr-chain.lock";

/// Exclusive lock on a working copy, held while branches are being mutated.
/// Released when dropped.
#[derive(Debug)]
pub struct RepoLock {
    _file: File,
    path: PathBuf,
}

impl RepoLock {
    /// Try to acquire the lock (non-blocking).
    pub fn acquire(git_dir: &Path) -> Result<Self> {
        let path = git_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| Error::Locked(path.display().to_string()))?;

        Ok(Self { _file: file, path })
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
