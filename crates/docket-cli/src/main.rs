//! docket CLI
//!
//! Command-line interface for docket - personal document metadata tracking.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use docket_core::{Config, Repository};

mod commands;
mod logging;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "docket")]
#[command(about = "docket - Track metadata for your personal documents")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Store file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new document
    Add {
        /// Document title
        title: String,
        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Category label
        #[arg(short, long, default_value = "")]
        classification: String,
        /// File to copy into the upload folder
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// List all documents
    #[command(alias = "ls")]
    List,
    /// Show document details
    Show {
        /// Document ID
        id: String,
    },
    /// Update a document's metadata
    Update {
        /// Document ID
        id: String,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New classification
        #[arg(short, long)]
        classification: Option<String>,
    },
    /// Delete a document, its mirror file and its stored file
    #[command(alias = "rm")]
    Delete {
        /// Document ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Search all fields for a keyword (case-insensitive)
    Search {
        /// Keyword; empty matches everything
        keyword: String,
    },
    /// Copy a file into the upload folder and link it to a document
    Attach {
        /// Document ID
        id: String,
        /// File to copy
        file: PathBuf,
    },
    /// Show store locations and counts
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, store_file, mirror_dir, storage_dir, log_file)
        key: String,
        /// Configuration value ("none" clears optional paths)
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the repository
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let mut config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    if let Some(store) = cli.store {
        config.store_file = Some(store);
    }

    logging::init(&config, cli.verbose);

    let mut repo = Repository::open(&config).context("Failed to open document store")?;
    output.print_skipped(repo.skipped_rows());

    match cli.command {
        Commands::Add {
            title,
            description,
            classification,
            file,
        } => commands::document::add(
            &mut repo,
            title,
            description,
            classification,
            file,
            &output,
        ),
        Commands::List => commands::document::list(&repo, &output),
        Commands::Show { id } => commands::document::show(&repo, id, &output),
        Commands::Update {
            id,
            title,
            description,
            classification,
        } => commands::document::update(
            &mut repo,
            id,
            title,
            description,
            classification,
            &output,
        ),
        Commands::Delete { id, yes } => commands::document::delete(&mut repo, id, yes, &output),
        Commands::Search { keyword } => commands::document::search(&repo, keyword, &output),
        Commands::Attach { id, file } => commands::document::attach(&mut repo, id, file, &output),
        Commands::Status => commands::status::show(&repo, &config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
