//! Snippet domain records
//!
//! Plain data hydrated from the snippet store. Sensitive item content is
//! expected to be decrypted upstream before an `Item` is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A snippet category as stored, including its popularity, pin and badge attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub order_index: i64,
    pub is_active: bool,
    pub is_predefined: bool,
    pub color: Option<String>,
    pub badge: Option<String>,
    // Popularity
    pub item_count: i64,
    pub total_uses: i64,
    pub access_count: i64,
    // Pinning
    pub is_pinned: bool,
    pub pinned_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
}

/// Kind of snippet content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Text,
    Url,
    Code,
    Path,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Text => "text",
            ItemType::Url => "url",
            ItemType::Code => "code",
            ItemType::Path => "path",
        }
    }

    /// Parse a stored type name; unknown names read as plain text
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "url" => ItemType::Url,
            "code" => ItemType::Code,
            "path" => ItemType::Path,
            _ => ItemType::Text,
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single clipboard snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub category_id: i64,
    pub label: String,
    pub content: String,
    pub item_type: ItemType,
    pub is_favorite: bool,
    pub is_sensitive: bool,
    pub tags: Vec<String>,
    pub use_count: i64,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
