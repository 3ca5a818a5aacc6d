//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use docket_core::storage::SkippedRow;
use docket_core::Document;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single document
    pub fn print_document(&self, doc: &Document) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:             {}", doc.id);
                println!("Title:          {}", doc.title);
                if !doc.description.is_empty() {
                    println!("Description:    {}", doc.description);
                }
                if !doc.classification.is_empty() {
                    println!("Classification: {}", doc.classification);
                }
                println!("File:           {}", doc.file_path);
                println!("Uploaded:       {}", doc.upload_date);
            }
            OutputFormat::Json => print_json(doc),
            OutputFormat::Quiet => {
                println!("{}", doc.id);
            }
        }
    }

    /// Print a list of documents
    pub fn print_documents(&self, docs: &[&Document]) {
        match self.format {
            OutputFormat::Human => {
                if docs.is_empty() {
                    println!("No documents found.");
                    return;
                }
                for doc in docs {
                    println!("{}", summary_line(doc));
                }
                println!("\n{} document(s)", docs.len());
            }
            OutputFormat::Json => print_json(&docs),
            OutputFormat::Quiet => {
                for doc in docs {
                    println!("{}", doc.id);
                }
            }
        }
    }

    /// Warn about store rows that were skipped on load
    pub fn print_skipped(&self, skipped: &[SkippedRow]) {
        if self.is_quiet() {
            return;
        }
        for row in skipped {
            eprintln!("⚠ Skipped store line {}: {}", row.line, row.reason);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// One-line listing entry: id, title, classification, upload date
fn summary_line(doc: &Document) -> String {
    format!(
        "{:>4} | {:<32} | {:<16} | {}",
        doc.id,
        truncate(&doc.title, 32),
        truncate(&doc.classification, 16),
        doc.upload_date
    )
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("übersicht der verträge", 8), "übers...");
    }

    #[test]
    fn test_summary_line() {
        let doc = Document {
            id: "12".to_string(),
            title: "Project Plan".to_string(),
            description: String::new(),
            classification: "Confidential".to_string(),
            file_path: String::new(),
            upload_date: "2024-10-05 00:00:00".to_string(),
        };

        let line = summary_line(&doc);
        assert!(line.starts_with("  12 | Project Plan"));
        assert!(line.contains("| Confidential"));
        assert!(line.ends_with("2024-10-05 00:00:00"));
    }
}
