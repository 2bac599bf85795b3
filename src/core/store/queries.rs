//! Read queries and row hydration
//!
//! Filtered selections come in as compiled statements with bound parameters;
//! everything else here is an unconditional aggregate or a plain listing.

use rusqlite::{params, Row};

use super::{
    format_timestamp, parse_datetime, parse_optional_datetime, DateBounds, DateRanges,
    NumericBounds, PopularityRanges, SnippetStore, StoreError, CATEGORY_COLUMNS, ITEM_COLUMNS,
};
use crate::core::filter::CompiledQuery;
use crate::core::model::{Category, Item, ItemType};

impl SnippetStore {
    /// Run a compiled category selection and hydrate every row
    pub fn query_categories(&self, query: &CompiledQuery) -> Result<Vec<Category>, StoreError> {
        let mut stmt = self.conn.prepare(&query.sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(query.params.iter()),
            category_from_row,
        )?;

        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    /// Total number of categories, regardless of any filter
    pub fn count_categories(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    /// Get a single category by id
    pub fn get_category(&self, id: i64) -> Option<Category> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM categories WHERE id = ?1", CATEGORY_COLUMNS),
                params![id],
                category_from_row,
            )
            .ok()
    }

    /// Load items, optionally restricted to one category, in stored order
    pub fn list_items(&self, category_id: Option<i64>) -> Result<Vec<Item>, StoreError> {
        let mut sql = format!("SELECT {} FROM items", ITEM_COLUMNS);
        let mut params_vec: Vec<i64> = vec![];

        if let Some(category_id) = category_id {
            sql.push_str(" WHERE category_id = ?");
            params_vec.push(category_id);
        }
        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params_vec), item_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    // =========================================================================
    // Aggregates for filter controls
    // =========================================================================

    /// Distinct non-empty colors in use, sorted
    pub fn available_colors(&self) -> Vec<String> {
        let mut stmt = match self.conn.prepare(
            "SELECT DISTINCT color FROM categories WHERE color IS NOT NULL AND color != '' ORDER BY color",
        ) {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        let rows = match stmt.query_map([], |row| row.get::<_, String>(0)) {
            Ok(r) => r,
            Err(_) => return vec![],
        };

        rows.filter_map(|r| r.ok()).collect()
    }

    /// Earliest/latest creation, update and access timestamps
    pub fn date_ranges(&self) -> DateRanges {
        self.conn
            .query_row(
                r#"SELECT MIN(created_at), MAX(created_at),
                          MIN(updated_at), MAX(updated_at),
                          MIN(last_accessed), MAX(last_accessed)
                   FROM categories"#,
                [],
                |row| {
                    let bounds = |lo: usize, hi: usize| -> rusqlite::Result<DateBounds> {
                        Ok(DateBounds {
                            earliest: parse_optional_datetime(row.get(lo)?),
                            latest: parse_optional_datetime(row.get(hi)?),
                        })
                    };
                    Ok(DateRanges {
                        created: bounds(0, 1)?,
                        updated: bounds(2, 3)?,
                        last_accessed: bounds(4, 5)?,
                    })
                },
            )
            .unwrap_or_default()
    }

    /// Min/max/avg of the popularity counters
    pub fn popularity_ranges(&self) -> PopularityRanges {
        self.conn
            .query_row(
                r#"SELECT MIN(item_count), MAX(item_count), AVG(item_count),
                          MIN(total_uses), MAX(total_uses), AVG(total_uses),
                          MIN(access_count), MAX(access_count), AVG(access_count)
                   FROM categories"#,
                [],
                |row| {
                    let bounds = |at: usize| -> rusqlite::Result<NumericBounds> {
                        Ok(NumericBounds {
                            min: row.get::<_, Option<i64>>(at)?.unwrap_or(0),
                            max: row.get::<_, Option<i64>>(at + 1)?.unwrap_or(0),
                            avg: row.get::<_, Option<f64>>(at + 2)?.unwrap_or(0.0),
                        })
                    };
                    Ok(PopularityRanges {
                        item_count: bounds(0)?,
                        total_uses: bounds(3)?,
                        access_count: bounds(6)?,
                    })
                },
            )
            .unwrap_or_default()
    }

    // =========================================================================
    // Writers (bootstrap and fixtures)
    // =========================================================================

    /// Insert a category, ignoring its `id`; returns the new row id
    pub fn insert_category(&self, category: &Category) -> Result<i64, StoreError> {
        self.conn.execute(
            r#"INSERT INTO categories (
                   name, icon, order_index, is_active, is_predefined, color, badge,
                   item_count, total_uses, access_count, is_pinned, pinned_order,
                   created_at, updated_at, last_accessed)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"#,
            params![
                category.name,
                category.icon,
                category.order_index,
                category.is_active,
                category.is_predefined,
                category.color,
                category.badge,
                category.item_count,
                category.total_uses,
                category.access_count,
                category.is_pinned,
                category.pinned_order,
                format_timestamp(&category.created_at),
                format_timestamp(&category.updated_at),
                category.last_accessed.as_ref().map(format_timestamp),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert an item, ignoring its `id`; returns the new row id
    pub fn insert_item(&self, item: &Item) -> Result<i64, StoreError> {
        self.conn.execute(
            r#"INSERT INTO items (
                   category_id, label, content, item_type, is_favorite, is_sensitive,
                   tags, use_count, last_used, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
            params![
                item.category_id,
                item.label,
                item.content,
                item.item_type.as_str(),
                item.is_favorite,
                item.is_sensitive,
                item.tags.join(","),
                item.use_count,
                item.last_used.as_ref().map(format_timestamp),
                format_timestamp(&item.created_at),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

/// Hydrate a row selected with `CATEGORY_COLUMNS`
fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        order_index: row.get(3)?,
        is_active: row.get(4)?,
        is_predefined: row.get(5)?,
        color: row.get(6)?,
        badge: row.get(7)?,
        item_count: row.get(8)?,
        total_uses: row.get(9)?,
        access_count: row.get(10)?,
        is_pinned: row.get(11)?,
        pinned_order: row.get(12)?,
        created_at: parse_datetime(row.get::<_, String>(13)?),
        updated_at: parse_datetime(row.get::<_, String>(14)?),
        last_accessed: parse_optional_datetime(row.get(15)?),
    })
}

/// Hydrate a row selected with `ITEM_COLUMNS`
fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    let tags_str: Option<String> = row.get(7)?;
    let tags = tags_str
        .map(|s| {
            s.split(',')
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    Ok(Item {
        id: row.get(0)?,
        category_id: row.get(1)?,
        label: row.get(2)?,
        content: row.get(3)?,
        item_type: ItemType::parse(&row.get::<_, String>(4)?),
        is_favorite: row.get(5)?,
        is_sensitive: row.get(6)?,
        tags,
        use_count: row.get(8)?,
        last_used: parse_optional_datetime(row.get(9)?),
        created_at: parse_datetime(row.get::<_, String>(10)?),
    })
}
