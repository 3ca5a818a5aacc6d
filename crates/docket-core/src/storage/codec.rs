//! Flat-file persistence
//!
//! Documents are stored as comma-separated text: a header row naming the
//! fields, then one row per document. Saves rewrite the whole file
//! atomically (temp file, then rename).
//!
//! Loading is lenient. Blank cells and the `None` sentinel are dropped, and
//! a row that cannot become a `Document` is skipped and reported in the
//! `LoadReport` rather than failing the load.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::models::Document;

use super::error::{StorageError, StorageResult};
use super::files::atomic_write;

/// Cell value treated as absent
const NONE_SENTINEL: &str = "None";

/// A store row that was skipped during load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the store file
    pub line: u64,
    pub reason: String,
}

/// Result of loading the store file
#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<Document>,
    pub skipped: Vec<SkippedRow>,
}

/// Reads and writes the document store file
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the store file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load all documents
    ///
    /// A missing store file yields an empty report. Rows missing `id` or
    /// `title`, rows that fail to decode, and rows repeating an earlier id
    /// are skipped.
    pub fn load(&self) -> StorageResult<LoadReport> {
        if !self.exists() {
            debug!("No store at {:?}, starting empty", self.path);
            return Ok(LoadReport::default());
        }

        let file =
            File::open(&self.path).map_err(|e| StorageError::from_read(e, self.path.clone()))?;
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| StorageError::from_csv(e, self.path.clone()))?
            .clone();

        let known = Document::field_names();
        for column in headers.iter().filter(|c| !known.contains(c)) {
            warn!("Ignoring unknown column '{}' in {:?}", column, self.path);
        }

        let mut report = LoadReport::default();
        let mut seen = HashSet::new();

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => {
                    return Err(StorageError::from_csv(e, self.path.clone()));
                }
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    report.skip(line, e.to_string());
                    continue;
                }
            };
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let values: HashMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .filter(|(column, value)| {
                    known.contains(column) && !value.trim().is_empty() && *value != NONE_SENTINEL
                })
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect();

            match Document::from_fields(&values) {
                Ok(doc) if !seen.insert(doc.id.clone()) => {
                    report.skip(line, format!("duplicate id '{}'", doc.id));
                }
                Ok(doc) => report.documents.push(doc),
                Err(e) => report.skip(line, e.to_string()),
            }
        }

        for skipped in &report.skipped {
            warn!(
                "Skipped row at line {} of {:?}: {}",
                skipped.line, self.path, skipped.reason
            );
        }
        info!(
            "Loaded {} document(s) from {:?}",
            report.documents.len(),
            self.path
        );

        Ok(report)
    }

    /// Overwrite the store file with `documents`, in order
    pub fn save(&self, documents: &[Document]) -> StorageResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer
            .write_record(Document::field_names())
            .map_err(|e| StorageError::from_csv(e, self.path.clone()))?;
        for doc in documents {
            writer
                .write_record(doc.to_pairs().iter().map(|(_, value)| value))
                .map_err(|e| StorageError::from_csv(e, self.path.clone()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| StorageError::from_io(e.into_error(), self.path.clone()))?;
        atomic_write(&self.path, &bytes)?;

        debug!("Saved {} document(s) to {:?}", documents.len(), self.path);
        Ok(())
    }
}

impl LoadReport {
    fn skip(&mut self, line: u64, reason: impl Into<String>) {
        self.skipped.push(SkippedRow {
            line,
            reason: reason.into(),
        });
    }
}
