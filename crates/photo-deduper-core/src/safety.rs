//! Checks run immediately before a duplicate is removed.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::FileEntry;

/// Guards the only destructive step of a run.
///
/// The plan is computed from a snapshot of the directory; these checks make
/// sure the snapshot still holds for the files about to be touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyManager;

impl SafetyManager {
    pub fn new() -> Self {
        Self
    }

    /// The keeper must still be on disk as a regular file before any of
    /// its duplicates is removed.
    pub fn verify_keeper(&self, keeper: &FileEntry) -> Result<()> {
        match fs::symlink_metadata(&keeper.path) {
            Ok(metadata) if metadata.is_file() => Ok(()),
            Ok(_) => Err(Error::SafetyCheck(format!(
                "kept copy {} is no longer a regular file",
                keeper.path.display()
            ))),
            Err(e) => Err(Error::SafetyCheck(format!(
                "kept copy {} is no longer accessible: {}",
                keeper.path.display(),
                e
            ))),
        }
    }

    /// A candidate must not be the keeper itself and must still have the
    /// size it had when it was hashed.
    pub fn verify_candidate(&self, keeper: &FileEntry, candidate: &FileEntry) -> Result<()> {
        if same_file(&keeper.path, &candidate.path) {
            return Err(Error::SafetyCheck(format!(
                "{} is the kept copy",
                candidate.path.display()
            )));
        }

        if candidate.digest != keeper.digest {
            return Err(Error::SafetyCheck(format!(
                "{} does not share the kept copy's digest",
                candidate.path.display()
            )));
        }

        let metadata = fs::symlink_metadata(&candidate.path).map_err(|source| Error::Delete {
            path: candidate.path.clone(),
            source,
        })?;

        if !metadata.is_file() {
            return Err(Error::SafetyCheck(format!(
                "{} is no longer a regular file",
                candidate.path.display()
            )));
        }

        if metadata.len() != candidate.size {
            return Err(Error::SafetyCheck(format!(
                "{} changed size since it was scanned ({} -> {} bytes)",
                candidate.path.display(),
                candidate.size,
                metadata.len()
            )));
        }

        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
