//! `snipbar init` command - Create an empty snippet store

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::load_config;
use crate::cli::GlobalOpts;
use crate::core::store::{SnippetStore, SCHEMA_VERSION};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Store file to create (default: --db or the configured database)
    pub path: Option<PathBuf>,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let path = args.path.unwrap_or_else(|| config.database_path());
    let existed = path.exists();

    // Opening creates the schema if it is missing
    let store = SnippetStore::open(&path)?;
    let categories = store.count_categories()?;

    if global.quiet {
        return Ok(());
    }

    if existed {
        println!(
            "{} Snippet store already present at {} ({} categories)",
            style("•").dim(),
            style(path.display()).cyan(),
            categories
        );
    } else {
        println!(
            "{} Initialized snippet store at {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
        println!("  schema version {}", SCHEMA_VERSION);
    }

    Ok(())
}
