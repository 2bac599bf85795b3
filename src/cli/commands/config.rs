//! `snipbar config` command - Configuration inspection
//!
//! Shows the effective layered configuration and where it is read from.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::helpers::load_config;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show the path to the global configuration file
    Path,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("database", "Path of the snippet store (SNIPBAR_DB)"),
    ("cache_enabled", "Cache category filter results (SNIPBAR_CACHE)"),
    ("cache_capacity", "Cached result sets kept (SNIPBAR_CACHE_CAPACITY)"),
    ("default_format", "Default output format (yaml, json, tsv, etc.)"),
];

/// Fully resolved values, defaults filled in
#[derive(Serialize)]
struct Effective {
    database: PathBuf,
    cache_enabled: bool,
    cache_capacity: usize,
    default_format: Option<String>,
}

impl From<&Config> for Effective {
    fn from(config: &Config) -> Self {
        Self {
            database: config.database_path(),
            cache_enabled: config.cache_enabled(),
            cache_capacity: config.cache_capacity(),
            default_format: config.default_format.clone(),
        }
    }
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let effective = Effective::from(&config);

    // If a specific key is requested, show just that value
    if let Some(key) = &args.key {
        let value = get_config_value(&effective, key).ok_or_else(|| {
            let keys: Vec<_> = VALID_KEYS.iter().map(|(k, _)| *k).collect();
            miette::miette!("Unknown key '{}' (valid: {})", key, keys.join(", "))
        })?;
        println!("{}", value);
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&effective).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&effective).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            for (key, description) in VALID_KEYS {
                let value = get_config_value(&effective, key).unwrap_or_default();
                let shown = if value.is_empty() {
                    style("(not set)".to_string()).dim()
                } else {
                    style(value).yellow()
                };
                println!("  {:<16} {}", style(key).cyan(), shown);
                println!("  {:<16} {}", "", style(description).dim());
            }

            // Show source info
            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Command-line flags (--db, --no-cache)");
            println!("  2. Environment variables (SNIPBAR_DB, SNIPBAR_CACHE, SNIPBAR_CACHE_CAPACITY)");
            match Config::global_config_path() {
                Some(path) => println!("  3. Global config ({})", path.display()),
                None => println!("  3. Global config (unavailable)"),
            }
            println!("  4. Built-in defaults");
        }
    }

    Ok(())
}

fn run_path() -> Result<()> {
    let path = Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine the user config directory"))?;
    println!("{}", path.display());
    Ok(())
}

fn get_config_value(effective: &Effective, key: &str) -> Option<String> {
    match key {
        "database" => Some(effective.database.display().to_string()),
        "cache_enabled" => Some(effective.cache_enabled.to_string()),
        "cache_capacity" => Some(effective.cache_capacity.to_string()),
        "default_format" => Some(effective.default_format.clone().unwrap_or_default()),
        _ => None,
    }
}
