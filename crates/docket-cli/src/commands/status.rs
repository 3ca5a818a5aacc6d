//! Status command handler

use anyhow::Result;

use docket_core::{Config, Repository};

use crate::output::{Output, OutputFormat};

/// Show where data lives and how much of it there is
pub fn show(repo: &Repository, config: &Config, output: &Output) -> Result<()> {
    let skipped = repo.skipped_rows().len();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "store_path": repo.store_path(),
                    "mirror_dir": repo.mirror().dir(),
                    "storage_dir": config.storage_dir(),
                    "documents": repo.len(),
                    "next_id": repo.next_id(),
                    "skipped_rows": skipped
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", repo.len());
        }
        OutputFormat::Human => {
            println!("docket Status");
            println!("=============");
            println!();
            println!("Storage:");
            println!("  Store:   {}", repo.store_path().display());
            println!("  Mirrors: {}", repo.mirror().dir().display());
            println!("  Uploads: {}", config.storage_dir().display());
            println!();
            println!("Contents:");
            println!("  Documents: {}", repo.len());
            println!("  Next ID:   {}", repo.next_id());
            if skipped > 0 {
                println!("  Skipped:   {} malformed row(s)", skipped);
            }
        }
    }

    Ok(())
}
