//! Artifact storage
//!
//! Copies uploaded files into the storage folder. The copy keeps the
//! source's file name, so uploading two files with the same name replaces
//! the earlier one.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::{StorageError, StorageResult};
use super::files::{ensure_dir, remove_if_exists};

/// Folder holding copies of uploaded files
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the storage folder and return the stored path
    pub fn import(&self, source: &Path) -> StorageResult<PathBuf> {
        let name = source
            .file_name()
            .ok_or_else(|| StorageError::NotFound {
                path: source.to_path_buf(),
            })?;
        if !source.is_file() {
            return Err(StorageError::NotFound {
                path: source.to_path_buf(),
            });
        }

        ensure_dir(&self.dir)?;
        let destination = self.dir.join(name);
        if same_file(source, &destination) {
            debug!("{:?} is already stored, not copying", destination);
            return Ok(destination);
        }

        let bytes =
            fs::copy(source, &destination).map_err(|e| StorageError::from_io(e, destination.clone()))?;

        info!("Stored {:?} as {:?} ({} bytes)", source, destination, bytes);
        Ok(destination)
    }

    /// Delete a stored file; absence is not an error
    pub fn remove(&self, path: &Path) -> StorageResult<bool> {
        let removed = remove_if_exists(path)?;
        if removed {
            debug!("Removed artifact {:?}", path);
        }
        Ok(removed)
    }
}

/// Whether both paths resolve to the same existing file
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_import_copies_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("scan.pdf");
        fs::write(&source, b"%PDF-1.4 binary\x00\xff").unwrap();

        let store = ArtifactStore::new(temp_dir.path().join("uploads"));
        let stored = store.import(&source).unwrap();

        assert_eq!(stored, temp_dir.path().join("uploads").join("scan.pdf"));
        assert_eq!(fs::read(&stored).unwrap(), fs::read(&source).unwrap());
        // Source is left in place
        assert!(source.exists());
    }

    #[test]
    fn test_import_stored_file_keeps_contents() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("scan.pdf");
        fs::write(&source, b"%PDF-1.7 data").unwrap();

        let store = ArtifactStore::new(temp_dir.path().join("uploads"));
        let stored = store.import(&source).unwrap();

        // Importing the stored copy again must not truncate it
        let again = store.import(&stored).unwrap();
        assert_eq!(again, stored);
        assert_eq!(fs::read(&stored).unwrap(), b"%PDF-1.7 data");

        // Same file reached through a relative segment
        let indirect = temp_dir
            .path()
            .join("uploads")
            .join("..")
            .join("uploads")
            .join("scan.pdf");
        store.import(&indirect).unwrap();
        assert_eq!(fs::read(&stored).unwrap(), b"%PDF-1.7 data");
    }

    #[test]
    fn test_import_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path().join("uploads"));

        let err = store
            .import(&temp_dir.path().join("missing.pdf"))
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_import_directory_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path().join("uploads"));

        assert!(store.import(temp_dir.path()).is_err());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());
        let path = temp_dir.path().join("old.pdf");
        fs::write(&path, b"x").unwrap();

        assert!(store.remove(&path).unwrap());
        assert!(!store.remove(&path).unwrap());
    }
}
