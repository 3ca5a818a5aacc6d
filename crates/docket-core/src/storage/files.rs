//! Small filesystem helpers shared by the storage components

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use super::error::{StorageError, StorageResult};

/// Create `dir` and its parents if needed
pub fn ensure_dir(dir: &Path) -> StorageResult<()> {
    fs::create_dir_all(dir).map_err(|source| StorageError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Remove a file, treating absence as success
///
/// Returns whether a file was actually removed.
pub fn remove_if_exists(path: &Path) -> StorageResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(StorageError::from_io(e, path.to_path_buf()))
        }
        Err(source) => Err(StorageError::RemoveError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })
}
