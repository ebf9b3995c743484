use log::{debug, warn};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{ImageFile, ImageFormat};

/// Discover the images directly inside `directory`, in directory listing order.
///
/// Subdirectories are not entered and symbolic links are not followed. A
/// missing directory is fatal; entries whose metadata cannot be read are
/// skipped with a warning.
pub fn discover_images(directory: &Path) -> Result<Vec<ImageFile>> {
    // Check if directory exists
    if !directory.is_dir() {
        return Err(Error::DirectoryNotFound(directory.to_path_buf()));
    }

    // Probe the listing up front so an unreadable directory aborts the run
    fs::read_dir(directory).map_err(|source| Error::DirectoryUnreadable {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut image_files = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        // Symlinks report their own type here, so only real files pass
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let format = match get_image_format(path) {
            Some(format) if format.is_supported() => format,
            _ => {
                debug!("Ignoring non-image file: {}", path.display());
                continue;
            }
        };

        match entry.metadata() {
            Ok(metadata) => image_files.push(ImageFile {
                index: image_files.len(),
                path: path.to_path_buf(),
                size: metadata.len(),
                last_modified: metadata.modified().ok(),
                format,
            }),
            Err(e) => {
                warn!("Error reading metadata for {}: {}", path.display(), e);
            }
        }
    }

    Ok(image_files)
}

/// Get image format from file extension
fn get_image_format(path: &Path) -> Option<ImageFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(ImageFormat::from_extension)
}

/// Returns if the given path has a supported image extension
pub fn has_image_extension(path: &Path) -> bool {
    get_image_format(path).is_some_and(|format| format.is_supported())
}

// -- Tests --
