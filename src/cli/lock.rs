//! Single-instance guard.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result, bail};
use fs2::FileExt;

use crate::debug;

const LOCK_NAME: &str = "assetmin.lock";

/// Exclusive advisory lock, released when dropped.
#[derive(Debug)]
pub struct InstanceLock {
    _file: File,
}

impl InstanceLock {
    /// Lock `assetmin.lock` in the system temp directory.
    pub fn acquire() -> Result<Self> {
        Self::acquire_at(&std::env::temp_dir().join(LOCK_NAME))
    }

    /// Lock the given file, failing fast if another holder exists.
    pub fn acquire_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("cannot create lock file `{}`", path.display()))?;

        if FileExt::try_lock_exclusive(&file).is_err() {
            bail!(
                "another assetmin instance is running (lock `{}`), pass --multiple to allow it",
                path.display()
            );
        }
        debug!("lock"; "acquired {}", path.display());
        Ok(Self { _file: file })
    }
}
