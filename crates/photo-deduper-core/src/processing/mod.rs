//! Fingerprinting: content digests for every scanned image.

mod crypto_hash;

pub use crypto_hash::{compute_digest, CHUNK_SIZE};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::logging::log_hash_error;
use crate::types::{Digest, FileEntry, ImageFile, ReadFailure};

/// Outcome of fingerprinting a whole scan
#[derive(Debug, Default)]
pub struct Fingerprints {
    /// Hashed files, in scan order
    pub entries: Vec<FileEntry>,

    /// Files excluded from the run because they could not be read
    pub failures: Vec<ReadFailure>,
}

/// Hash every file on a dedicated pool of `threads` workers.
///
/// The output keeps the input order whatever order the workers finish in.
pub fn fingerprint_images(
    images: Vec<ImageFile>,
    threads: usize,
    show_progress: bool,
) -> Result<Fingerprints> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("fingerprint-{}", i))
        .build()
        .map_err(|e| Error::Configuration(format!("Failed to build thread pool: {}", e)))?;

    let progress_bar = if show_progress {
        let bar = ProgressBar::new(images.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{eta}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        bar.set_message("Computing photo digests...");
        bar
    } else {
        ProgressBar::hidden()
    };

    // Indexed collect writes each result at its input position
    let results: Vec<(ImageFile, Result<Digest>)> = pool.install(|| {
        images
            .into_par_iter()
            .map(|image| {
                let digest = compute_digest(&image.path);
                progress_bar.inc(1);
                (image, digest)
            })
            .collect()
    });

    progress_bar.finish_and_clear();

    let mut fingerprints = Fingerprints::default();
    for (image, digest) in results {
        match digest {
            Ok(digest) => fingerprints.entries.push(FileEntry::new(image, digest)),
            Err(e) => {
                log_hash_error(&image.path, &e);
                fingerprints.failures.push(ReadFailure {
                    path: image.path,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        "Fingerprinted {} photos ({} unreadable)",
        fingerprints.entries.len(),
        fingerprints.failures.len()
    );

    Ok(fingerprints)
}
