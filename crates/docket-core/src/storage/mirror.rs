//! Human-readable mirror files
//!
//! Every document has a plain-text companion at `<mirror_dir>/<slug>.txt`
//! listing one `Field: value` line per field. The file name follows the
//! current title, so a rename has to drop the old file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::{slug, Document};

use super::error::{StorageError, StorageResult};
use super::files::{ensure_dir, remove_if_exists};

/// Writes and removes mirror files in a fixed directory
#[derive(Debug, Clone)]
pub struct MirrorWriter {
    dir: PathBuf,
}

impl MirrorWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Mirror path for a title
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", slug(title)))
    }

    /// Write the mirror file for `doc`, replacing any existing one
    pub fn write(&self, doc: &Document) -> StorageResult<PathBuf> {
        ensure_dir(&self.dir)?;

        let path = self.path_for(&doc.title);
        fs::write(&path, render(doc)).map_err(|e| StorageError::from_io(e, path.clone()))?;

        debug!("Wrote mirror file {:?}", path);
        Ok(path)
    }

    /// Drop the mirror file of `old_title` if `new_title` maps elsewhere
    ///
    /// The caller writes the new mirror file afterwards. Returns whether a
    /// file was removed.
    pub fn rename(&self, old_title: &str, new_title: &str) -> StorageResult<bool> {
        let old_path = self.path_for(old_title);
        if old_path == self.path_for(new_title) {
            return Ok(false);
        }

        let removed = remove_if_exists(&old_path)?;
        if removed {
            debug!("Removed stale mirror file {:?}", old_path);
        }
        Ok(removed)
    }

    /// Remove the mirror file for `doc`, if present
    pub fn delete(&self, doc: &Document) -> StorageResult<bool> {
        let path = self.path_for(&doc.title);
        let removed = remove_if_exists(&path)?;
        if removed {
            debug!("Removed mirror file {:?}", path);
        }
        Ok(removed)
    }
}

/// Render the mirror file contents
pub fn render(doc: &Document) -> String {
    doc.to_pairs()
        .into_iter()
        .map(|(name, value)| format!("{}: {}\n", capitalize(name), value))
        .collect()
}

/// Upper-case the first character and lower-case the rest (`file_path` -> `File_path`)
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doc(title: &str) -> Document {
        Document {
            id: "1".to_string(),
            title: title.to_string(),
            description: "Detailed project plan".to_string(),
            classification: "Confidential".to_string(),
            file_path: "/docs/project_plan.pdf".to_string(),
            upload_date: "2024-10-05 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("id"), "Id");
        assert_eq!(capitalize("file_path"), "File_path");
        assert_eq!(capitalize("upload_date"), "Upload_date");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_render() {
        let expected = "Id: 1\n\
                        Title: Project Plan\n\
                        Description: Detailed project plan\n\
                        Classification: Confidential\n\
                        File_path: /docs/project_plan.pdf\n\
                        Upload_date: 2024-10-05 00:00:00\n";
        assert_eq!(render(&doc("Project Plan")), expected);
    }

    #[test]
    fn test_path_for() {
        let mirror = MirrorWriter::new("/data/files");
        assert_eq!(
            mirror.path_for("Project Plan"),
            PathBuf::from("/data/files/project_plan.txt")
        );
    }

    #[test]
    fn test_write_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = MirrorWriter::new(temp_dir.path().join("files"));

        let path = mirror.write(&doc("Project Plan")).unwrap();

        assert_eq!(path, temp_dir.path().join("files").join("project_plan.txt"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.lines().any(|l| l == "Title: Project Plan"));
    }

    #[test]
    fn test_write_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = MirrorWriter::new(temp_dir.path());

        let mut d = doc("Project Plan");
        mirror.write(&d).unwrap();
        d.description = "Revised".to_string();
        let path = mirror.write(&d).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("Description: Revised\n"));
        assert!(!content.contains("Detailed project plan"));
    }

    #[test]
    fn test_rename_removes_old_file() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = MirrorWriter::new(temp_dir.path());

        let old = mirror.write(&doc("Project Plan")).unwrap();
        assert!(mirror.rename("Project Plan", "New Name").unwrap());
        assert!(!old.exists());
    }

    #[test]
    fn test_rename_same_slug_keeps_file() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = MirrorWriter::new(temp_dir.path());

        let path = mirror.write(&doc("Project Plan")).unwrap();
        // Only case differs, so the derived name is identical
        assert!(!mirror.rename("Project Plan", "project plan").unwrap());
        assert!(path.exists());
    }

    #[test]
    fn test_rename_and_delete_tolerate_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = MirrorWriter::new(temp_dir.path());

        assert!(!mirror.rename("Never Written", "Other").unwrap());
        assert!(!mirror.delete(&doc("Never Written")).unwrap());
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = MirrorWriter::new(temp_dir.path());

        let d = doc("Project Plan");
        let path = mirror.write(&d).unwrap();
        assert!(mirror.delete(&d).unwrap());
        assert!(!path.exists());
    }
}
