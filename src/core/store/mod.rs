//! SQLite-backed snippet store
//!
//! This module owns the connection to the category/item database:
//! - Opens (and bootstraps) a store file or an in-memory store
//! - Hydrates category and item rows into domain records
//! - Answers the read queries issued by the filter engines
//!
//! The filter engines only ever read through this module. The insert helpers
//! exist for bootstrapping fixtures and the `init` command.

mod queries;
mod schema;
mod types;

pub use types::*;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use miette::Diagnostic;
use rusqlite::Connection;
use thiserror::Error;

/// Current schema version recorded in fresh stores
pub const SCHEMA_VERSION: i32 = 1;

/// Column list shared by every category selection, in hydration order
pub const CATEGORY_COLUMNS: &str = "id, name, icon, order_index, is_active, is_predefined, \
     color, badge, item_count, total_uses, access_count, is_pinned, pinned_order, \
     created_at, updated_at, last_accessed";

/// Column list shared by every item selection, in hydration order
pub const ITEM_COLUMNS: &str = "id, category_id, label, content, item_type, is_favorite, \
     is_sensitive, tags, use_count, last_used, created_at";

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("Failed to open snippet store at {path}")]
    #[diagnostic(
        code(snipbar::store::open),
        help("check the --db path or the SNIPBAR_DB environment variable")
    )]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Snippet store query failed: {0}")]
    #[diagnostic(code(snipbar::store::query))]
    Query(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    #[diagnostic(code(snipbar::store::io))]
    Io(#[from] std::io::Error),
}

/// The snippet database
pub struct SnippetStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SnippetStore {
    /// Open or create a store file
    ///
    /// Missing tables are created; existing data is left untouched.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a throwaway store in memory
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let store = Self { conn, path: None };
        store.init_schema()?;
        Ok(store)
    }

    /// Location of the store file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Format a timestamp the way the store writes it
///
/// Fixed-width UTC keeps lexical and chronological order identical, so date
/// bounds can be compared as text in SQL.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a stored timestamp, falling back to the Unix epoch
fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn parse_optional_datetime(s: Option<String>) -> Option<DateTime<Utc>> {
    s.filter(|s| !s.is_empty()).map(parse_datetime)
}
