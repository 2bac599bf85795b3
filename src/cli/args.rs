//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    categories::CategoriesArgs, completions::CompletionsArgs, config::ConfigCommands,
    facets::FacetsArgs, init::InitArgs, items::ItemsArgs,
};

#[derive(Parser)]
#[command(name = "snipbar")]
#[command(author, version, about = "Snippet sidebar filter engine")]
#[command(long_about = "Filter and cache categories and items of a clipboard snippet store.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Snippet store file (default: from config, SNIPBAR_DB, or the user data dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Disable the category result cache
    #[arg(long = "no-cache", global = true)]
    pub no_cache: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty snippet store
    Init(InitArgs),

    /// Filter categories through the cached query engine
    Categories(CategoriesArgs),

    /// Filter the items of one category in memory
    Items(ItemsArgs),

    /// Show values available to filter controls (colors, date and popularity ranges)
    Facets(FacetsArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (tsv for lists)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// Parse a configured default format name
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}
