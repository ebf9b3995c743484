use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Supported image formats
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    Heic,
    Other(String),
}

impl ImageFormat {
    /// Determine format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            "heic" => Self::Heic,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if format is supported
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// A regular file found by the scanner, before its content is hashed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    /// Position in directory listing order
    pub index: usize,

    /// Full path to the image file
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// Last modified timestamp, when the platform reports one
    pub last_modified: Option<SystemTime>,

    /// Image format
    pub format: ImageFormat,
}

impl ImageFile {
    /// File name for display, falling back to the full path
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// 256-bit BLAKE3 digest of a file's full content
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lower-case hex representation
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl From<blake3::Hash> for Digest {
    fn from(hash: blake3::Hash) -> Self {
        Self(*hash.as_bytes())
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A scanned image together with its verified content digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Position in directory listing order
    pub index: usize,
    pub path: PathBuf,
    pub size: u64,
    #[serde(skip)]
    pub last_modified: Option<SystemTime>,
    pub digest: Digest,
}

impl FileEntry {
    pub fn new(file: ImageFile, digest: Digest) -> Self {
        Self {
            index: file.index,
            path: file.path,
            size: file.size,
            last_modified: file.last_modified,
            digest,
        }
    }

    /// File name for display, falling back to the full path
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// A file that could not be fingerprinted and was left out of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Entries sharing one digest, in scan discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestGroup {
    pub digest: Digest,
    pub members: Vec<FileEntry>,
}

impl DigestGroup {
    pub fn has_duplicates(&self) -> bool {
        self.members.len() > 1
    }
}

/// Rule for choosing which member of a duplicate group survives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeeperRule {
    /// Keep the file listed first in the directory
    #[default]
    ScanOrder,

    /// Keep the file with the earliest modification time
    OldestModified,

    /// Keep the file with the lexicographically smallest name
    NameOrder,
}

/// What happened, or would happen, to one deletion candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Disposition {
    Deleted,
    WouldDelete,
    Failed { reason: String },
}

/// Aggregate counters for one deduplication pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Eligible images found by the scanner
    pub files_scanned: usize,

    /// Images that could not be fingerprinted
    pub read_failures: usize,

    /// Digest groups with more than one member
    pub duplicate_groups: usize,

    /// Duplicates actually removed from disk
    pub files_deleted: usize,

    /// Sum of the sizes of removed files
    pub bytes_freed: u64,

    /// Deletion candidates that could not be removed
    pub deletion_failures: usize,

    /// Bytes that would be freed if every candidate were removed
    pub reclaimable_bytes: u64,

    pub dry_run: bool,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
