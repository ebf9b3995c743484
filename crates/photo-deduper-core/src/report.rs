//! Human-readable rendering of a run.

use std::io::{self, Write};

use crate::action::{GroupOutcome, RunReport};
use crate::types::Disposition;

const SIZE_UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Format a byte count with 1024-based units and two decimals
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// Write the per-group decisions and the final summary of a run
pub fn write_report<W: Write>(report: &RunReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "=== Duplicate photo scan ===")?;
    writeln!(out, "Directory: {}", report.directory.display())?;
    if report.summary.dry_run {
        writeln!(out, "Dry run: no files will be deleted")?;
    }
    writeln!(out)?;

    if report.no_photos_found() {
        writeln!(out, "No photos found in directory")?;
        return Ok(());
    }

    let analysed = report
        .summary
        .files_scanned
        .saturating_sub(report.summary.read_failures);
    writeln!(out, "Photos analysed: {}", analysed)?;
    for failure in &report.read_failures {
        writeln!(
            out,
            "  ! Could not read {}: {}",
            failure.path.display(),
            failure.reason
        )?;
    }
    writeln!(out)?;

    for group in &report.groups {
        write_group(group, out)?;
    }

    let summary = &report.summary;
    writeln!(out, "=== Summary ===")?;
    if report.no_duplicates_found() {
        writeln!(out, "No duplicates found!")?;
    } else if summary.dry_run {
        let pending: usize = report.groups.iter().map(|g| g.removals.len()).sum();
        writeln!(out, "Duplicates that would be removed: {}", pending)?;
        writeln!(
            out,
            "Space that would be freed: {}",
            format_size(summary.reclaimable_bytes)
        )?;
    } else {
        writeln!(out, "Total duplicates removed: {}", summary.files_deleted)?;
        writeln!(out, "Space freed: {}", format_size(summary.bytes_freed))?;
        if summary.deletion_failures > 0 {
            writeln!(out, "Failed deletions: {}", summary.deletion_failures)?;
        }
    }
    if summary.read_failures > 0 {
        writeln!(out, "Unreadable photos skipped: {}", summary.read_failures)?;
    }

    Ok(())
}

fn write_group<W: Write>(group: &GroupOutcome, out: &mut W) -> io::Result<()> {
    writeln!(out, "Duplicates found (digest: {}):", group.digest)?;
    for member in group.members() {
        writeln!(
            out,
            "  - {} ({})",
            member.file_name(),
            format_size(member.size)
        )?;
    }

    writeln!(out, "  kept: {}", group.keeper.file_name())?;
    for removal in &group.removals {
        let name = removal.entry.file_name();
        match &removal.disposition {
            Disposition::Deleted => writeln!(out, "  deleted: {}", name)?,
            Disposition::WouldDelete => writeln!(out, "  would delete: {}", name)?,
            Disposition::Failed { reason } => {
                writeln!(out, "  failed to delete {}: {}", name, reason)?
            }
        }
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Removal;
    use crate::types::{Digest, FileEntry, ReadFailure, RunSummary};
    use std::path::PathBuf;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1), "1.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
        assert_eq!(format_size(1024), "1.00 KiB");
        assert_eq!(format_size(1536), "1.50 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MiB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024 / 2), "1.50 GiB");
        assert_eq!(format_size(1024u64.pow(4)), "1.00 TiB");
        assert_eq!(format_size(2048 * 1024u64.pow(4)), "2048.00 TiB");
    }

    fn entry(index: usize, name: &str, size: u64) -> FileEntry {
        FileEntry {
            index,
            path: PathBuf::from("/photos").join(name),
            size,
            last_modified: None,
            digest: Digest::from([7u8; 32]),
        }
    }

    fn render(report: &RunReport) -> String {
        let mut out = Vec::new();
        write_report(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_directory_report() {
        let report = RunReport {
            directory: PathBuf::from("/photos"),
            ..Default::default()
        };

        let text = render(&report);
        assert!(text.contains("No photos found in directory"));
        assert!(!text.contains("No duplicates found"));
    }

    #[test]
    fn test_no_duplicates_report() {
        let report = RunReport {
            directory: PathBuf::from("/photos"),
            summary: RunSummary {
                files_scanned: 3,
                ..Default::default()
            },
            ..Default::default()
        };

        let text = render(&report);
        assert!(text.contains("Photos analysed: 3"));
        assert!(text.contains("No duplicates found!"));
    }

    #[test]
    fn test_group_report_lists_every_decision() {
        let report = RunReport {
            directory: PathBuf::from("/photos"),
            groups: vec![GroupOutcome {
                digest: Digest::from([7u8; 32]),
                keeper: entry(0, "a.jpg", 2048),
                removals: vec![
                    Removal {
                        entry: entry(1, "b.jpg", 2048),
                        disposition: Disposition::Deleted,
                    },
                    Removal {
                        entry: entry(2, "c.png", 2048),
                        disposition: Disposition::Failed {
                            reason: "permission denied".to_string(),
                        },
                    },
                ],
            }],
            read_failures: vec![ReadFailure {
                path: PathBuf::from("/photos/broken.jpg"),
                reason: "unexpected end of file".to_string(),
            }],
            summary: RunSummary {
                files_scanned: 4,
                read_failures: 1,
                duplicate_groups: 1,
                files_deleted: 1,
                bytes_freed: 2048,
                deletion_failures: 1,
                reclaimable_bytes: 4096,
                dry_run: false,
            },
        };

        let text = render(&report);
        assert!(text.contains(&format!("digest: {}", "07".repeat(32))));
        assert!(text.contains("  - a.jpg (2.00 KiB)"));
        assert!(text.contains("  - b.jpg (2.00 KiB)"));
        assert!(text.contains("  - c.png (2.00 KiB)"));
        assert!(text.contains("  kept: a.jpg"));
        assert!(text.contains("  deleted: b.jpg"));
        assert!(text.contains("  failed to delete c.png: permission denied"));
        assert!(text.contains("Could not read /photos/broken.jpg"));
        assert!(text.contains("Photos analysed: 3"));
        assert!(text.contains("Total duplicates removed: 1"));
        assert!(text.contains("Space freed: 2.00 KiB"));
        assert!(text.contains("Failed deletions: 1"));
        assert!(text.contains("Unreadable photos skipped: 1"));
    }

    #[test]
    fn test_dry_run_report() {
        let report = RunReport {
            directory: PathBuf::from("/photos"),
            groups: vec![GroupOutcome {
                digest: Digest::from([7u8; 32]),
                keeper: entry(0, "a.jpg", 10),
                removals: vec![Removal {
                    entry: entry(1, "b.jpg", 10),
                    disposition: Disposition::WouldDelete,
                }],
            }],
            read_failures: Vec::new(),
            summary: RunSummary {
                files_scanned: 2,
                duplicate_groups: 1,
                reclaimable_bytes: 10,
                dry_run: true,
                ..Default::default()
            },
        };

        let text = render(&report);
        assert!(text.contains("Dry run: no files will be deleted"));
        assert!(text.contains("  would delete: b.jpg"));
        assert!(text.contains("Duplicates that would be removed: 1"));
        assert!(text.contains("Space that would be freed: 10.00 B"));
        assert!(!text.contains("Total duplicates removed"));
    }
}
