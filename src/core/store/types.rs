//! Aggregate query result types
//!
//! Read-only summaries used to populate filter controls.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Earliest and latest value of a timestamp column
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateBounds {
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

/// Date bounds across all categories
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateRanges {
    pub created: DateBounds,
    pub updated: DateBounds,
    pub last_accessed: DateBounds,
}

/// Min/max/avg of a counter column
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumericBounds {
    pub min: i64,
    pub max: i64,
    pub avg: f64,
}

/// Popularity counters across all categories
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PopularityRanges {
    pub item_count: NumericBounds,
    pub total_uses: NumericBounds,
    pub access_count: NumericBounds,
}
