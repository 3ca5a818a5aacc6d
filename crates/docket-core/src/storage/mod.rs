//! Storage layer
//!
//! Three on-disk representations back the document list:
//!
//! - **Store file**: comma-separated metadata, the persisted record set
//! - **Mirror files**: one readable text file per document, named by title
//! - **Artifacts**: the files documents point at, copied into a folder

pub mod artifact;
pub mod codec;
pub mod error;
mod files;
pub mod mirror;

pub use artifact::ArtifactStore;
pub use codec::{CsvStore, LoadReport, SkippedRow};
pub use error::{StorageError, StorageResult};
pub use mirror::MirrorWriter;
