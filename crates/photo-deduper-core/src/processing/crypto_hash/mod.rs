//! Computes the content digest of a file using the Blake3 algorithm.
//!
//! The file is streamed through the hasher in fixed 4 KiB chunks, so peak
//! memory does not depend on the file size.
//!
//! # Errors
//!
//! Returns [`Error::Read`] if the file cannot be opened or a read fails
//! part-way through.
use crate::error::{Error, Result};
use crate::types::Digest;

use std::{fs::File, io::Read, path::Path};

/// Size of each read from the file
pub const CHUNK_SIZE: usize = 4096;

/// Compute the Blake3 digest of the whole content of a file
pub fn compute_digest<P: AsRef<Path>>(path: P) -> Result<Digest> {
    let path = path.as_ref();
    let read_error = |source| Error::Read {
        path: path.to_path_buf(),
        source,
    };

    // Open the file with explicit scope to ensure it's closed promptly
    let hash = {
        let mut file = File::open(path).map_err(read_error)?;

        let mut hasher = blake3::Hasher::new();

        let mut buffer = [0; CHUNK_SIZE];
        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_error(e)),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        hasher.finalize()
    };

    Ok(Digest::from(hash))
}
