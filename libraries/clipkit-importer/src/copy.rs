//! File copying into the project's `imports/` tree

use crate::{ImportError, Result};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Default buffer size for file operations (64KB)
const BUFFER_SIZE: usize = 64 * 1024;

/// What `copy_if_absent` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The file was copied to the destination
    Copied,
    /// A file with the destination name already existed; nothing was written
    AlreadyPresent,
}

/// Copy `source` to `dest` unless `dest` already exists
///
/// Parent directories are created as needed. An existing destination is left
/// untouched and reported as [`CopyOutcome::AlreadyPresent`], not as an error.
pub fn copy_if_absent(source: &Path, dest: &Path, verify: bool) -> Result<CopyOutcome> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    if dest.exists() {
        // Files from an earlier run with the same scene/label keep their content
        warn!(
            "Destination already exists, skipping copy: {}",
            dest.display()
        );
        return Ok(CopyOutcome::AlreadyPresent);
    }

    copy_file_verified(source, dest, verify)?;
    Ok(CopyOutcome::Copied)
}

/// Compute SHA256 hash of a file
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Copy a file with optional verification
///
/// The content is written to a temp file next to `dest` and renamed into place,
/// so a failed or mismatched copy never leaves a partial file at `dest`.
pub fn copy_file_verified(source: &Path, dest: &Path, verify: bool) -> Result<()> {
    let source_hash = if verify {
        Some(compute_file_hash(source)?)
    } else {
        None
    };

    let metadata = fs::metadata(source)?;
    if !metadata.is_file() {
        return Err(ImportError::NotAFile(source.display().to_string()));
    }

    let mut reader = BufReader::with_capacity(BUFFER_SIZE, File::open(source)?);
    let temp = write_temp_beside(&mut reader, dest)?;
    temp.as_file().set_permissions(metadata.permissions())?;

    if let Some(expected_hash) = source_hash {
        let actual_hash = compute_file_hash(temp.path())?;
        if expected_hash != actual_hash {
            // Dropping the temp file deletes the corrupted copy
            return Err(ImportError::Verification(format!(
                "hash mismatch for {}",
                dest.display()
            )));
        }
        debug!("File verification passed: {}", dest.display());
    }

    temp.persist(dest)?;
    Ok(())
}

/// Drain `reader` into a fresh temp file in `dest`'s directory
///
/// The temp file is removed when it is dropped, including on the error path.
fn write_temp_beside<R: Read>(reader: &mut R, dest: &Path) -> Result<NamedTempFile> {
    let dir = dest
        .parent()
        .ok_or_else(|| ImportError::InvalidPath(dest.display().to_string()))?;

    let mut temp = NamedTempFile::new_in(dir)?;
    io::copy(reader, temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    Ok(temp)
}
