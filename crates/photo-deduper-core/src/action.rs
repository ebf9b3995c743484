//! Executing a deletion plan.
//!
//! This is the only place in the crate that removes files.

use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::deduplication::{DedupPlan, GroupPlan};
use crate::error::Error;
use crate::logging::{log_file_error, log_fs_modification};
use crate::safety::SafetyManager;
use crate::types::{Digest, Disposition, FileEntry, ReadFailure, RunSummary};

/// Outcome for a single deletion candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub entry: FileEntry,
    pub disposition: Disposition,
}

/// Outcome for one duplicate group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupOutcome {
    pub digest: Digest,
    pub keeper: FileEntry,
    pub removals: Vec<Removal>,
}

impl GroupOutcome {
    /// Every member of the group in scan order, keeper included
    pub fn members(&self) -> Vec<&FileEntry> {
        let mut members: Vec<&FileEntry> = std::iter::once(&self.keeper)
            .chain(self.removals.iter().map(|removal| &removal.entry))
            .collect();
        members.sort_by_key(|entry| entry.index);
        members
    }
}

/// Full record of one pass over a directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub directory: PathBuf,
    pub groups: Vec<GroupOutcome>,
    pub read_failures: Vec<ReadFailure>,
    pub summary: RunSummary,
}

impl RunReport {
    /// Nothing eligible was found in the directory
    pub fn no_photos_found(&self) -> bool {
        self.summary.files_scanned == 0
    }

    /// Photos were scanned but none share content
    pub fn no_duplicates_found(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Carry out `plan`, or only record what would happen when `dry_run` is set.
///
/// A failed removal is recorded and the run moves on; it never affects the
/// keeper or the rest of the group.
pub fn execute_plan(
    directory: PathBuf,
    plan: DedupPlan,
    safety: &SafetyManager,
    dry_run: bool,
) -> RunReport {
    let candidate_count = plan.candidate_count();
    let mut summary = RunSummary {
        files_scanned: plan.files_scanned,
        read_failures: plan.read_failures.len(),
        duplicate_groups: plan.groups.len(),
        reclaimable_bytes: plan.reclaimable_bytes(),
        dry_run,
        ..Default::default()
    };

    let groups: Vec<GroupOutcome> = plan
        .groups
        .into_iter()
        .map(|group| execute_group(group, safety, dry_run, &mut summary))
        .collect();

    if dry_run {
        info!(
            "Dry run: {} duplicate(s) would be removed, freeing {} bytes",
            candidate_count, summary.reclaimable_bytes
        );
    } else {
        info!(
            "Removed {} duplicate(s), freed {} bytes, {} failure(s)",
            summary.files_deleted, summary.bytes_freed, summary.deletion_failures
        );
    }

    RunReport {
        directory,
        groups,
        read_failures: plan.read_failures,
        summary,
    }
}

fn execute_group(
    group: GroupPlan,
    safety: &SafetyManager,
    dry_run: bool,
    summary: &mut RunSummary,
) -> GroupOutcome {
    let GroupPlan {
        digest,
        keeper,
        candidates,
    } = group;

    let keeper_check = if dry_run {
        Ok(())
    } else {
        safety.verify_keeper(&keeper)
    };

    let removals = candidates
        .into_iter()
        .map(|entry| {
            let disposition = if dry_run {
                Disposition::WouldDelete
            } else {
                match keeper_check.as_ref() {
                    Ok(_) => remove_candidate(&keeper, &entry, safety),
                    Err(e) => Disposition::Failed {
                        reason: e.to_string(),
                    },
                }
            };

            match &disposition {
                Disposition::Deleted => {
                    summary.files_deleted += 1;
                    summary.bytes_freed += entry.size;
                }
                Disposition::Failed { reason } => {
                    warn!("Kept duplicate {}: {}", entry.path.display(), reason);
                    summary.deletion_failures += 1;
                }
                Disposition::WouldDelete => {}
            }

            Removal { entry, disposition }
        })
        .collect();

    GroupOutcome {
        digest,
        keeper,
        removals,
    }
}

fn remove_candidate(keeper: &FileEntry, entry: &FileEntry, safety: &SafetyManager) -> Disposition {
    if let Err(e) = safety.verify_candidate(keeper, entry) {
        return Disposition::Failed {
            reason: e.to_string(),
        };
    }

    match fs::remove_file(&entry.path) {
        Ok(()) => {
            let details = format!("duplicate of {}", keeper.path.display());
            log_fs_modification("delete", &entry.path, Some(&details));
            Disposition::Deleted
        }
        Err(source) => {
            let error = Error::Delete {
                path: entry.path.clone(),
                source,
            };
            log_file_error(&entry.path, "delete", &error);
            Disposition::Failed {
                reason: error.to_string(),
            }
        }
    }
}
