//! Document command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use docket_core::{NewDocument, Repository};

use crate::output::Output;
use crate::prompt::confirm;

/// Create a new document, optionally storing a copy of `file`
pub fn add(
    repo: &mut Repository,
    title: String,
    description: String,
    classification: String,
    file: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let new = NewDocument::new(title)
        .description(description)
        .classification(classification);
    let doc = match file {
        Some(source) => repo
            .add_with_file(new, &source)
            .with_context(|| format!("Failed to create document with {:?}", source))?,
        None => repo.add(new).context("Failed to create document")?,
    };

    output.success(&format!("Created document: {}", doc.id));
    output.print_document(&doc);

    Ok(())
}

/// List all documents
pub fn list(repo: &Repository, output: &Output) -> Result<()> {
    let docs: Vec<_> = repo.list().iter().collect();
    output.print_documents(&docs);
    Ok(())
}

/// Show a single document
pub fn show(repo: &Repository, id: String, output: &Output) -> Result<()> {
    let doc = repo
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))?;

    output.print_document(doc);
    Ok(())
}

/// Update a document's metadata; omitted values keep their current value
pub fn update(
    repo: &mut Repository,
    id: String,
    title: Option<String>,
    description: Option<String>,
    classification: Option<String>,
    output: &Output,
) -> Result<()> {
    let current = repo
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))?
        .clone();

    if title.is_none() && description.is_none() && classification.is_none() {
        bail!("Nothing to update. Pass --title, --description or --classification.");
    }

    let title = title.unwrap_or(current.title);
    let description = description.unwrap_or(current.description);
    let classification = classification.unwrap_or(current.classification);

    let doc = repo
        .update(&id, &title, &description, &classification)
        .context("Failed to update document")?
        .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))?;

    output.success("Document updated");
    output.print_document(&doc);

    Ok(())
}

/// Delete a document along with its mirror file and stored file
pub fn delete(repo: &mut Repository, id: String, yes: bool, output: &Output) -> Result<()> {
    let doc = repo
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))?;

    if output.should_prompt() && !yes {
        println!("Delete document: {} - {}", doc.id, doc.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    repo.remove(&id)
        .context("Failed to delete document")?
        .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))?;

    output.success(&format!("Deleted document: {}", id));

    Ok(())
}

/// Search documents by keyword across all fields
pub fn search(repo: &Repository, keyword: String, output: &Output) -> Result<()> {
    let docs = repo.search(&keyword);
    output.print_documents(&docs);
    Ok(())
}

/// Copy a file into storage and link it to a document
pub fn attach(repo: &mut Repository, id: String, file: PathBuf, output: &Output) -> Result<()> {
    let doc = repo
        .attach(&id, &file)
        .with_context(|| format!("Failed to store {:?}", file))?
        .ok_or_else(|| anyhow::anyhow!("Document not found: {}", id))?;

    output.success(&format!("Stored file for document {}", doc.id));
    output.print_document(&doc);

    Ok(())
}
