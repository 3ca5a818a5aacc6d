//! docket core library
//!
//! Tracks metadata about personal documents (title, description,
//! classification, stored file, upload time) in a flat comma-separated
//! store, with a readable text mirror per document.
//!
//! # Architecture
//!
//! - **Store file**: the persisted record set, rewritten on every change
//! - **Mirror files**: `<slug>.txt` per document, kept in step with titles
//! - **Artifacts**: files the documents describe, optionally copied in
//!
//! The `Repository` holds the live list and coordinates all three.
//!
//! # Quick Start
//!
//! ```text
//! let mut repo = Repository::open(&Config::load()?)?;
//!
//! let doc = repo.add(NewDocument::new("Project Plan"))?;
//! repo.update(&doc.id, "Project Plan v2", "Second draft", "Work")?;
//!
//! for doc in repo.search("plan") {
//!     println!("{} {}", doc.id, doc.title);
//! }
//! ```
//!
//! # Modules
//!
//! - `repository`: document list and its on-disk side effects (main entry point)
//! - `models`: the `Document` record and slug rule
//! - `storage`: store file codec, mirror files, artifact folder
//! - `config`: application configuration

pub mod config;
pub mod models;
pub mod repository;
pub mod storage;

pub use config::Config;
pub use models::{Document, NewDocument};
pub use repository::{Clock, Repository, RepositoryError, RepositoryResult, SystemClock};
pub use storage::{StorageError, StorageResult};
