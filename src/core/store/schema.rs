//! Database schema bootstrap
//!
//! Creates the tables a fresh store needs. There are no migrations: an
//! existing store is used as is.

use rusqlite::params;

use super::{SnippetStore, StoreError, SCHEMA_VERSION};

impl SnippetStore {
    /// Create any missing tables and indexes
    pub(super) fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Snippet categories with popularity and pin attributes
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                icon TEXT,
                order_index INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                is_predefined INTEGER NOT NULL DEFAULT 0,
                color TEXT,
                badge TEXT,
                item_count INTEGER NOT NULL DEFAULT 0,
                total_uses INTEGER NOT NULL DEFAULT 0,
                access_count INTEGER NOT NULL DEFAULT 0,
                is_pinned INTEGER NOT NULL DEFAULT 0,
                pinned_order INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                last_accessed TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_categories_active ON categories(is_active);
            CREATE INDEX IF NOT EXISTS idx_categories_pinned ON categories(is_pinned, pinned_order);
            CREATE INDEX IF NOT EXISTS idx_categories_order ON categories(order_index);

            -- Snippets; sensitive content is stored encrypted by the writer
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category_id INTEGER NOT NULL,
                label TEXT NOT NULL,
                content TEXT NOT NULL,
                item_type TEXT NOT NULL DEFAULT 'text',
                is_favorite INTEGER NOT NULL DEFAULT 0,
                is_sensitive INTEGER NOT NULL DEFAULT 0,
                tags TEXT,
                use_count INTEGER NOT NULL DEFAULT 0,
                last_used TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_items_category ON items(category_id);
            "#,
        )?;

        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }

    /// Schema version recorded in the store, 0 if none
    pub fn schema_version(&self) -> i32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get::<_, Option<i32>>(0)
            })
            .ok()
            .flatten()
            .unwrap_or(0)
    }
}
