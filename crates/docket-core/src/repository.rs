//! Document repository
//!
//! The `Repository` owns the live document list and keeps it in step with
//! the store file, the per-document mirror files and stored artifacts.
//!
//! ## Failure handling
//!
//! Mutations run as a short sequence of steps. When a later step fails, the
//! in-memory list and any mirror files already touched are put back the way
//! they were and `RepositoryError::RolledBack` is returned. File deletions
//! that cannot be undone (mirror and artifact on remove) only happen after
//! the store has been saved.
//!
//! ## Usage
//!
//! ```ignore
//! let mut repo = Repository::open(&Config::load()?)?;
//!
//! let doc = repo.add(NewDocument::new("Project Plan").classification("Work"))?;
//! let hits = repo.search("plan");
//! repo.remove(&doc.id)?;
//! ```

use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{fields, slug, Document, NewDocument};
use crate::storage::{ArtifactStore, CsvStore, MirrorWriter, SkippedRow, StorageError};

/// Format of `upload_date`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors returned by repository operations
///
/// Unknown ids are not errors; lookups return `Option`.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Invalid input: {field} must not be blank")]
    InvalidInput { field: &'static str },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{step} failed, change rolled back: {source}")]
    RolledBack {
        step: &'static str,
        #[source]
        source: StorageError,
    },
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Source of `upload_date` timestamps
pub trait Clock {
    fn now(&self) -> String;
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// In-memory document list backed by the store file
pub struct Repository {
    documents: Vec<Document>,
    store: CsvStore,
    mirror: MirrorWriter,
    artifacts: ArtifactStore,
    clock: Box<dyn Clock>,
    skipped: Vec<SkippedRow>,
}

impl Repository {
    /// Open the repository at the locations named by `config`
    pub fn open(config: &Config) -> RepositoryResult<Self> {
        Self::initialize(
            config.store_path(),
            config.mirror_dir(),
            config.storage_dir(),
        )
    }

    /// Load documents from `store_path`
    ///
    /// A missing store file starts an empty repository. Malformed rows are
    /// skipped and available from `skipped_rows`.
    pub fn initialize(
        store_path: impl Into<PathBuf>,
        mirror_dir: impl Into<PathBuf>,
        storage_dir: impl Into<PathBuf>,
    ) -> RepositoryResult<Self> {
        let store = CsvStore::new(store_path);
        let report = store.load()?;

        info!(
            "Opened repository at {:?} with {} document(s)",
            store.path(),
            report.documents.len()
        );

        Ok(Self {
            documents: report.documents,
            store,
            mirror: MirrorWriter::new(mirror_dir),
            artifacts: ArtifactStore::new(storage_dir),
            clock: Box::new(SystemClock),
            skipped: report.skipped,
        })
    }

    /// Replace the timestamp source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Path of the store file
    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// Mirror file writer in use
    pub fn mirror(&self) -> &MirrorWriter {
        &self.mirror
    }

    /// Rows skipped when the store was loaded
    pub fn skipped_rows(&self) -> &[SkippedRow] {
        &self.skipped
    }

    // ==================== Queries ====================

    /// All documents, in insertion order
    pub fn list(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by exact id
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Documents with `keyword` in any field, ignoring case
    ///
    /// An empty keyword matches everything.
    pub fn search(&self, keyword: &str) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|doc| doc.matches(keyword))
            .collect()
    }

    /// Id the next `add` will assign: one past the largest numeric id
    ///
    /// Ids that are not numbers are ignored.
    pub fn next_id(&self) -> String {
        self.documents
            .iter()
            .filter_map(Document::numeric_id)
            .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .map(increment_decimal)
            .unwrap_or_else(|| "1".to_string())
    }

    /// Default artifact path for a title: `<mirror_dir>/<slug>.pdf`
    pub fn default_file_path(&self, title: &str) -> PathBuf {
        self.mirror.dir().join(format!("{}.pdf", slug(title)))
    }

    // ==================== Mutations ====================

    /// Create a document with a generated id
    ///
    /// Saves the store, then writes the mirror file.
    pub fn add(&mut self, new: NewDocument) -> RepositoryResult<Document> {
        validate_title(&new.title)?;

        let doc = Document {
            id: self.next_id(),
            file_path: self
                .default_file_path(&new.title)
                .to_string_lossy()
                .into_owned(),
            title: new.title,
            description: new.description,
            classification: new.classification,
            upload_date: self.clock.now(),
        };

        self.documents.push(doc.clone());

        if let Err(source) = self.store.save(&self.documents) {
            self.documents.pop();
            return Err(RepositoryError::RolledBack {
                step: "save",
                source,
            });
        }

        if let Err(source) = self.mirror.write(&doc) {
            self.documents.pop();
            compensate("re-save store", self.store.save(&self.documents));
            return Err(RepositoryError::RolledBack {
                step: "mirror write",
                source,
            });
        }

        info!("Added document {} ({})", doc.id, doc.title);
        Ok(doc)
    }

    /// Create a document and store a copy of `source` as its file
    ///
    /// Nothing is kept when the copy fails: the new record is removed again.
    pub fn add_with_file(
        &mut self,
        new: NewDocument,
        source: &Path,
    ) -> RepositoryResult<Document> {
        if !source.is_file() {
            return Err(StorageError::NotFound {
                path: source.to_path_buf(),
            }
            .into());
        }

        let doc = self.add(new)?;
        match self.attach(&doc.id, source) {
            Ok(Some(attached)) => Ok(attached),
            Ok(None) => Ok(doc),
            Err(e) => {
                if let Err(undo) = self.remove(&doc.id) {
                    warn!(
                        "Could not remove document {} after failed attach: {}",
                        doc.id, undo
                    );
                }
                Err(e)
            }
        }
    }

    /// Replace a document's title, description and classification
    ///
    /// Refreshes `upload_date`. Returns `None` when `id` is unknown.
    pub fn update(
        &mut self,
        id: &str,
        title: &str,
        description: &str,
        classification: &str,
    ) -> RepositoryResult<Option<Document>> {
        validate_title(title)?;

        let Some(index) = self.position(id) else {
            debug!("Update skipped, no document with id {}", id);
            return Ok(None);
        };

        let previous = self.documents[index].clone();
        if previous.title != title {
            self.mirror.rename(&previous.title, title)?;
        }

        let now = self.clock.now();
        let doc = &mut self.documents[index];
        doc.title = title.to_string();
        doc.description = description.to_string();
        doc.classification = classification.to_string();
        doc.upload_date = now;

        self.commit_change(index, previous)?;

        let updated = self.documents[index].clone();
        info!("Updated document {} ({})", updated.id, updated.title);
        Ok(Some(updated))
    }

    /// Copy `source` into the storage folder and point the document at it
    ///
    /// Returns `None` when `id` is unknown; nothing is copied in that case.
    pub fn attach(&mut self, id: &str, source: &Path) -> RepositoryResult<Option<Document>> {
        let Some(index) = self.position(id) else {
            debug!("Attach skipped, no document with id {}", id);
            return Ok(None);
        };

        let stored = self.artifacts.import(source)?;
        let stored = stored.to_string_lossy().into_owned();

        let previous = self.documents[index].clone();
        let now = self.clock.now();
        let doc = &mut self.documents[index];
        doc.file_path = stored.clone();
        doc.upload_date = now;

        if let Err(e) = self.commit_change(index, previous.clone()) {
            if stored != previous.file_path {
                compensate(
                    "remove imported artifact",
                    self.artifacts.remove(Path::new(&stored)),
                );
            }
            return Err(e);
        }

        let updated = self.documents[index].clone();
        info!("Attached {:?} to document {}", source, updated.id);
        Ok(Some(updated))
    }

    /// Delete a document with its mirror file and artifact
    ///
    /// Returns the removed document, or `None` when `id` is unknown. Once
    /// the store is saved the removal stands; failing to delete the mirror
    /// file or artifact afterwards is logged, not returned.
    pub fn remove(&mut self, id: &str) -> RepositoryResult<Option<Document>> {
        let Some(index) = self.position(id) else {
            debug!("Remove skipped, no document with id {}", id);
            return Ok(None);
        };

        let doc = self.documents.remove(index);
        if let Err(source) = self.store.save(&self.documents) {
            self.documents.insert(index, doc);
            return Err(RepositoryError::RolledBack {
                step: "save",
                source,
            });
        }

        compensate("delete mirror file", self.mirror.delete(&doc));
        if !doc.file_path.is_empty() {
            compensate(
                "delete artifact",
                self.artifacts.remove(Path::new(&doc.file_path)),
            );
        }

        info!("Removed document {} ({})", doc.id, doc.title);
        Ok(Some(doc))
    }

    // ==================== Internals ====================

    fn position(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|doc| doc.id == id)
    }

    /// Write the mirror file and save the store after an in-place edit
    ///
    /// On failure, restores `previous` in memory and on the mirror side.
    fn commit_change(&mut self, index: usize, previous: Document) -> RepositoryResult<()> {
        let current = self.documents[index].clone();

        let result = match self.mirror.write(&current) {
            Ok(_) => self.store.save(&self.documents).map_err(|e| ("save", e)),
            Err(e) => Err(("mirror write", e)),
        };

        let Err((step, source)) = result else {
            return Ok(());
        };

        if self.mirror.path_for(&current.title) != self.mirror.path_for(&previous.title) {
            compensate("remove new mirror file", self.mirror.delete(&current));
        }
        compensate("restore mirror file", self.mirror.write(&previous));
        self.documents[index] = previous;

        Err(RepositoryError::RolledBack { step, source })
    }
}

fn validate_title(title: &str) -> RepositoryResult<()> {
    if title.trim().is_empty() {
        return Err(RepositoryError::InvalidInput {
            field: fields::TITLE,
        });
    }
    Ok(())
}

/// Add one to a string of decimal digits, growing it on carry
fn increment_decimal(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for byte in bytes.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}

/// Run a best-effort cleanup step, logging instead of failing
fn compensate<T>(step: &str, result: Result<T, StorageError>) {
    if let Err(e) = result {
        warn!("Cleanup step '{}' failed: {}", step, e);
    }
}
