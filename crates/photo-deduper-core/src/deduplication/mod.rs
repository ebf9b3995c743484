//! Grouping by digest and the deletion plan.
//!
//! Nothing in this module touches the filesystem: the plan is fully built and
//! inspectable before [`crate::action::execute_plan`] removes anything.

use log::debug;
use serde::Serialize;
use std::collections::HashMap;

use crate::types::{Digest, DigestGroup, FileEntry, KeeperRule, ReadFailure};

/// One duplicate group resolved into a keeper and its deletion candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupPlan {
    pub digest: Digest,
    pub keeper: FileEntry,
    /// Remaining members, in scan order
    pub candidates: Vec<FileEntry>,
}

impl GroupPlan {
    /// Every member of the group in scan order, keeper included
    pub fn members(&self) -> Vec<&FileEntry> {
        let mut members: Vec<&FileEntry> = std::iter::once(&self.keeper)
            .chain(self.candidates.iter())
            .collect();
        members.sort_by_key(|entry| entry.index);
        members
    }

    pub fn reclaimable_bytes(&self) -> u64 {
        self.candidates.iter().map(|entry| entry.size).sum()
    }
}

/// Everything a run intends to do, computed before any deletion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupPlan {
    /// Eligible images found by the scanner
    pub files_scanned: usize,

    /// Images left out because they could not be hashed
    pub read_failures: Vec<ReadFailure>,

    /// Groups with more than one member, ordered by their first member
    pub groups: Vec<GroupPlan>,
}

impl DedupPlan {
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    pub fn candidate_count(&self) -> usize {
        self.groups.iter().map(|group| group.candidates.len()).sum()
    }

    pub fn reclaimable_bytes(&self) -> u64 {
        self.groups.iter().map(GroupPlan::reclaimable_bytes).sum()
    }
}

/// Group entries sharing a digest.
///
/// Groups come out ordered by the scan position of their first member and
/// members keep scan order, so the result is deterministic for a given
/// listing.
pub fn group_by_digest(entries: Vec<FileEntry>) -> Vec<DigestGroup> {
    let mut positions: HashMap<Digest, usize> = HashMap::new();
    let mut groups: Vec<DigestGroup> = Vec::new();

    let mut entries = entries;
    entries.sort_by_key(|entry| entry.index);

    for entry in entries {
        match positions.get(&entry.digest) {
            Some(&position) => groups[position].members.push(entry),
            None => {
                positions.insert(entry.digest, groups.len());
                groups.push(DigestGroup {
                    digest: entry.digest,
                    members: vec![entry],
                });
            }
        }
    }

    groups
}

/// Position within `members` of the entry that survives
pub fn select_keeper(members: &[FileEntry], rule: KeeperRule) -> usize {
    let best = match rule {
        KeeperRule::ScanOrder => members.iter().enumerate().min_by_key(|(_, e)| e.index),
        KeeperRule::OldestModified => members.iter().enumerate().min_by(|(_, a), (_, b)| {
            // Unknown times sort after known ones
            let a_time = (a.last_modified.is_none(), a.last_modified);
            let b_time = (b.last_modified.is_none(), b.last_modified);
            a_time.cmp(&b_time).then(a.index.cmp(&b.index))
        }),
        KeeperRule::NameOrder => members.iter().enumerate().min_by(|(_, a), (_, b)| {
            a.path
                .file_name()
                .cmp(&b.path.file_name())
                .then(a.index.cmp(&b.index))
        }),
    };

    best.map(|(position, _)| position).unwrap_or(0)
}

/// Build the deletion plan for a fingerprinted scan
pub fn build_plan(
    files_scanned: usize,
    entries: Vec<FileEntry>,
    read_failures: Vec<ReadFailure>,
    rule: KeeperRule,
) -> DedupPlan {
    let groups = group_by_digest(entries)
        .into_iter()
        .filter(DigestGroup::has_duplicates)
        .map(|group| {
            let mut members = group.members;
            let keeper = members.remove(select_keeper(&members, rule));
            debug!(
                "Group {}: keeping {}, {} duplicate(s)",
                group.digest,
                keeper.path.display(),
                members.len()
            );
            GroupPlan {
                digest: group.digest,
                keeper,
                candidates: members,
            }
        })
        .collect();

    DedupPlan {
        files_scanned,
        read_failures,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn entry(index: usize, name: &str, content: &[u8]) -> FileEntry {
        FileEntry {
            index,
            path: PathBuf::from("/photos").join(name),
            size: content.len() as u64,
            last_modified: None,
            digest: Digest::from(blake3::hash(content)),
        }
    }

    fn names(entries: &[FileEntry]) -> Vec<String> {
        entries.iter().map(FileEntry::file_name).collect()
    }

    #[test]
    fn test_group_by_digest_keeps_discovery_order() {
        let groups = group_by_digest(vec![
            entry(0, "d.jpg", b"Y"),
            entry(1, "a.jpg", b"X"),
            entry(2, "b.jpg", b"X"),
            entry(3, "e.jpg", b"Y"),
            entry(4, "c.png", b"X"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(names(&groups[0].members), vec!["d.jpg", "e.jpg"]);
        assert_eq!(names(&groups[1].members), vec!["a.jpg", "b.jpg", "c.png"]);
        for group in &groups {
            assert!(group.members.iter().all(|m| m.digest == group.digest));
        }
        assert_ne!(groups[0].digest, groups[1].digest);
    }

    #[test]
    fn test_group_by_digest_sorts_by_scan_index() {
        let groups = group_by_digest(vec![
            entry(2, "b.jpg", b"X"),
            entry(0, "a.jpg", b"X"),
        ]);

        assert_eq!(names(&groups[0].members), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_plan_scenario() {
        let plan = build_plan(
            4,
            vec![
                entry(0, "a.jpg", b"X"),
                entry(1, "b.jpg", b"X"),
                entry(2, "c.png", b"X"),
                entry(3, "d.jpg", b"Y"),
            ],
            Vec::new(),
            KeeperRule::ScanOrder,
        );

        assert_eq!(plan.groups.len(), 1);
        let group = &plan.groups[0];
        assert_eq!(group.keeper.file_name(), "a.jpg");
        assert_eq!(names(&group.candidates), vec!["b.jpg", "c.png"]);
        assert_eq!(plan.candidate_count(), 2);
        assert_eq!(plan.reclaimable_bytes(), 2);
        assert_eq!(plan.files_scanned, 4);
    }

    #[test]
    fn test_plan_without_duplicates() {
        let plan = build_plan(
            2,
            vec![entry(0, "a.jpg", b"X"), entry(1, "b.jpg", b"Y")],
            Vec::new(),
            KeeperRule::ScanOrder,
        );

        assert!(!plan.has_duplicates());
        assert_eq!(plan.reclaimable_bytes(), 0);
    }

    #[test]
    fn test_keeper_by_name_order() {
        let members = vec![
            entry(0, "zebra.jpg", b"X"),
            entry(1, "apple.jpg", b"X"),
            entry(2, "mango.jpg", b"X"),
        ];

        assert_eq!(select_keeper(&members, KeeperRule::NameOrder), 1);
        assert_eq!(select_keeper(&members, KeeperRule::ScanOrder), 0);
    }

    #[test]
    fn test_keeper_by_oldest_modified() {
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let mut members = vec![
            entry(0, "a.jpg", b"X"),
            entry(1, "b.jpg", b"X"),
            entry(2, "c.jpg", b"X"),
        ];
        members[0].last_modified = None;
        members[1].last_modified = Some(base + Duration::from_secs(60));
        members[2].last_modified = Some(base);

        assert_eq!(select_keeper(&members, KeeperRule::OldestModified), 2);

        // Equal times fall back to scan order
        members[1].last_modified = Some(base);
        assert_eq!(select_keeper(&members, KeeperRule::OldestModified), 1);
    }

    #[test]
    fn test_members_lists_keeper_in_scan_position() {
        let plan = build_plan(
            3,
            vec![
                entry(0, "c.jpg", b"X"),
                entry(1, "a.jpg", b"X"),
                entry(2, "b.jpg", b"X"),
            ],
            Vec::new(),
            KeeperRule::NameOrder,
        );

        let group = &plan.groups[0];
        assert_eq!(group.keeper.file_name(), "a.jpg");
        let members: Vec<String> = group.members().iter().map(|e| e.file_name()).collect();
        assert_eq!(members, vec!["c.jpg", "a.jpg", "b.jpg"]);
    }
}
