//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use chrono::{DateTime, Utc};
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, FilterSpec, SnippetStore};

/// Load the layered config and apply the global command-line overrides
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    let config = Config::load()?;
    Ok(config.with_overrides(global.db.clone(), global.no_cache))
}

/// Open the configured snippet store
pub fn open_store(config: &Config) -> Result<SnippetStore> {
    let store = SnippetStore::open(&config.database_path())?;
    Ok(store)
}

/// Resolve `auto` against the configured default, then fall back to `fallback`
pub fn resolve_format(global: &GlobalOpts, config: &Config, fallback: OutputFormat) -> OutputFormat {
    let configured = config
        .default_format
        .as_deref()
        .and_then(OutputFormat::from_name)
        .unwrap_or(OutputFormat::Auto);

    match (global.format, configured) {
        (OutputFormat::Auto, OutputFormat::Auto) => fallback,
        (OutputFormat::Auto, f) => f,
        (f, _) => f,
    }
}

/// Parse a `--spec` JSON document, empty when absent
pub fn parse_spec(raw: Option<&str>) -> Result<FilterSpec> {
    match raw {
        Some(json) => FilterSpec::parse_json(json)
            .into_diagnostic()
            .map_err(|e| e.wrap_err("Invalid --spec JSON")),
        None => Ok(FilterSpec::new()),
    }
}

/// Split a comparison such as `>5`, `<=10` or `3` into operator and value
///
/// A bare number compares for equality.
pub fn parse_comparison(s: &str) -> Option<(String, i64)> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_digit() || c == '-')
        .unwrap_or(s.len());
    let (op, num) = s.split_at(split);
    let value = num.trim().parse().ok()?;
    let op = match op.trim() {
        "" => "=",
        other => other,
    };
    Some((op.to_string(), value))
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Date column display, `-` when unset
pub fn format_date(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
