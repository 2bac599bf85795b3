//! Category filter compiler
//!
//! Turns a `FilterSpec` into a parameterized SELECT over the `categories`
//! table. Every caller-supplied value is bound as a parameter; the only
//! dynamic identifiers (ordering column and direction) come from whitelists.
//! Malformed criteria degrade to defaults, the compiler never fails.

use chrono::{DateTime, Local, Utc};
use rusqlite::types::Value;

use super::criterion::{Criterion, DatePreset, FilterKey};
use super::spec::FilterSpec;
use crate::core::store::{format_timestamp, CATEGORY_COLUMNS};

/// Default (natural) ordering column
pub const DEFAULT_ORDER_COLUMN: &str = "order_index";

/// Columns a caller may order by
pub const ORDER_COLUMNS: &[&str] = &[
    "id",
    "name",
    "order_index",
    "item_count",
    "total_uses",
    "access_count",
    "created_at",
    "updated_at",
    "last_accessed",
    "pinned_order",
];

/// A compiled statement and its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// How one criterion becomes a WHERE condition
#[derive(Debug, Clone, Copy)]
enum Clause {
    /// `column = ?` with a 0/1 parameter
    Flag(&'static str),
    /// `column >= ?` / `column <= ?`
    Range(&'static str),
    /// Date range or preset on a timestamp column
    Date(&'static str),
    /// `last_accessed IS NULL` / `IS NOT NULL`
    NeverAccessed,
    /// Non-empty text column present or absent
    Present(&'static str),
    /// `column = ?`
    Equals(&'static str),
    /// `column LIKE '%?%'` with the needle's wildcards escaped
    Contains(&'static str),
}

/// Condition table, applied in this order
const CATEGORY_CLAUSES: &[(FilterKey, Clause)] = &[
    (FilterKey::IsActive, Clause::Flag("is_active")),
    (FilterKey::IsPredefined, Clause::Flag("is_predefined")),
    (FilterKey::IsPinned, Clause::Flag("is_pinned")),
    (FilterKey::ItemCount, Clause::Range("item_count")),
    (FilterKey::TotalUses, Clause::Range("total_uses")),
    (FilterKey::AccessCount, Clause::Range("access_count")),
    (FilterKey::CreatedDate, Clause::Date("created_at")),
    (FilterKey::UpdatedDate, Clause::Date("updated_at")),
    (FilterKey::LastAccessed, Clause::Date("last_accessed")),
    (FilterKey::NeverAccessed, Clause::NeverAccessed),
    (FilterKey::HasColor, Clause::Present("color")),
    (FilterKey::HasBadge, Clause::Present("badge")),
    (FilterKey::Color, Clause::Equals("color")),
    (FilterKey::SearchText, Clause::Contains("name")),
];

/// Compile against the local clock
pub fn compile(spec: &FilterSpec) -> CompiledQuery {
    compile_at(spec, Local::now())
}

/// Compile with date presets resolved against `now`
///
/// Equal specs and equal clocks always produce identical text and parameters.
pub fn compile_at(spec: &FilterSpec, now: DateTime<Local>) -> CompiledQuery {
    let mut sql = format!("SELECT {} FROM categories WHERE 1=1", CATEGORY_COLUMNS);
    let mut params: Vec<Value> = vec![];

    // Without an explicit activity filter only active categories are listed
    if !spec.contains(FilterKey::IsActive) {
        sql.push_str(" AND is_active = 1");
    }

    for (key, clause) in CATEGORY_CLAUSES {
        if let Some(criterion) = spec.get(*key) {
            push_condition(&mut sql, &mut params, *clause, criterion, now);
        }
    }

    sql.push_str(" ORDER BY ");
    if spec.get(FilterKey::PinnedFirst).and_then(Criterion::as_bool) == Some(true) {
        sql.push_str("is_pinned DESC, pinned_order ASC, ");
    }
    let (column, direction) = ordering(spec);
    sql.push_str(column);
    sql.push(' ');
    sql.push_str(direction);

    if let Some(limit) = spec.get(FilterKey::Limit).and_then(Criterion::as_limit) {
        sql.push_str(" LIMIT ?");
        params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
    }

    CompiledQuery { sql, params }
}

fn push_condition(
    sql: &mut String,
    params: &mut Vec<Value>,
    clause: Clause,
    criterion: &Criterion,
    now: DateTime<Local>,
) {
    match (clause, criterion) {
        (Clause::Flag(column), Criterion::Boolean(b)) => {
            sql.push_str(&format!(" AND {} = ?", column));
            params.push(Value::Integer(i64::from(*b)));
        }
        (Clause::Range(column), Criterion::Range { min, max }) => {
            if let Some(min) = min {
                sql.push_str(&format!(" AND {} >= ?", column));
                params.push(Value::Integer(*min));
            }
            if let Some(max) = max {
                sql.push_str(&format!(" AND {} <= ?", column));
                params.push(Value::Integer(*max));
            }
        }
        (Clause::Date(column), Criterion::DateRange { from, to }) => {
            push_date_bound(sql, params, column, ">=", from.as_ref());
            push_date_bound(sql, params, column, "<=", to.as_ref());
        }
        (Clause::Date(column), Criterion::DatePreset(raw)) => match DatePreset::parse(raw) {
            Some(DatePreset::Never) if column == "last_accessed" => {
                sql.push_str(" AND last_accessed IS NULL");
            }
            Some(preset) => {
                let bound = preset.lower_bound(now);
                push_date_bound(sql, params, column, ">=", bound.as_ref());
            }
            None => {}
        },
        (Clause::NeverAccessed, Criterion::Boolean(never)) => {
            if *never {
                sql.push_str(" AND last_accessed IS NULL");
            } else {
                sql.push_str(" AND last_accessed IS NOT NULL");
            }
        }
        (Clause::Present(column), Criterion::Boolean(present)) => {
            if *present {
                sql.push_str(&format!(" AND ({0} IS NOT NULL AND {0} != '')", column));
            } else {
                sql.push_str(&format!(" AND ({0} IS NULL OR {0} = '')", column));
            }
        }
        (Clause::Equals(column), Criterion::Text(value)) => {
            sql.push_str(&format!(" AND {} = ?", column));
            params.push(Value::Text(value.clone()));
        }
        (Clause::Contains(column), Criterion::Text(needle)) if !needle.is_empty() => {
            sql.push_str(&format!(" AND {} LIKE ? ESCAPE '\\'", column));
            params.push(Value::Text(format!("%{}%", escape_like(needle))));
        }
        _ => {}
    }
}

/// Make `%`, `_` and `\` match literally under `ESCAPE '\'`
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_date_bound(
    sql: &mut String,
    params: &mut Vec<Value>,
    column: &str,
    op: &str,
    bound: Option<&DateTime<Utc>>,
) {
    if let Some(bound) = bound {
        sql.push_str(&format!(" AND {} {} ?", column, op));
        params.push(Value::Text(format_timestamp(bound)));
    }
}

/// Resolve the whitelisted ordering column and direction
///
/// `order_by` may be a bare column name or a `{field, direction}` object; an
/// explicit `order_direction` wins over the object's direction.
fn ordering(spec: &FilterSpec) -> (&'static str, &'static str) {
    let (field, object_direction) = match spec.get(FilterKey::OrderBy) {
        Some(Criterion::Text(field)) => (Some(field.as_str()), None),
        Some(Criterion::Ordering { field, direction }) => {
            (Some(field.as_str()), Some(direction.as_str()))
        }
        _ => (None, None),
    };

    let column = field
        .and_then(|f| ORDER_COLUMNS.iter().copied().find(|c| *c == f))
        .unwrap_or(DEFAULT_ORDER_COLUMN);

    let direction = spec
        .get(FilterKey::OrderDirection)
        .and_then(Criterion::as_text)
        .or(object_direction)
        .map(|d| d.trim())
        .filter(|d| d.eq_ignore_ascii_case("DESC"))
        .map(|_| "DESC")
        .unwrap_or("ASC");

    (column, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, 15, 30, 0).unwrap()
    }

    fn compile_json(value: serde_json::Value) -> CompiledQuery {
        compile_at(&FilterSpec::from_json(&value), fixed_now())
    }

    /// Statement text after the column list
    fn tail(query: &CompiledQuery) -> &str {
        query.sql.split(" FROM categories").nth(1).unwrap().trim()
    }

    #[test]
    fn test_empty_spec_lists_active_in_natural_order() {
        let query = compile_json(json!({}));
        insta::assert_snapshot!(tail(&query), @"WHERE 1=1 AND is_active = 1 ORDER BY order_index ASC");
        assert!(query.params.is_empty());
        assert!(query.sql.starts_with(&format!("SELECT {}", CATEGORY_COLUMNS)));
    }

    #[test]
    fn test_boolean_range_and_text_criteria_are_bound() {
        let query = compile_json(json!({
            "is_pinned": true,
            "item_count": {"min": 2, "max": 10},
            "color": "#ff0000",
            "search_text": "git",
            "limit": 5
        }));
        insta::assert_snapshot!(tail(&query), @"WHERE 1=1 AND is_active = 1 AND is_pinned = ? AND item_count >= ? AND item_count <= ? AND color = ? AND name LIKE ? ESCAPE '\\' ORDER BY order_index ASC LIMIT ?");
        assert_eq!(
            query.params,
            vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Integer(10),
                Value::Text("#ff0000".into()),
                Value::Text("%git%".into()),
                Value::Integer(5),
            ]
        );
        assert!(!query.sql.contains("git"));

        let query = compile_json(json!({"search_text": "50%_off\\"}));
        assert_eq!(query.params, vec![Value::Text("%50\\%\\_off\\\\%".into())]);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("my_s"), "my\\_s");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_huge_day_presets_do_not_overflow() {
        for preset in ["last_999999999_days", "last_100000000_days", "last_4294967295_days"] {
            let query = compile_json(json!({"created_date": {"preset": preset}}));
            assert!(query.sql.contains(" AND created_at >= ?"));
            assert_eq!(query.params.len(), 1);
        }
    }

    #[test]
    fn test_limit_beyond_i64_is_clamped() {
        let query = compile_json(json!({"limit": u64::MAX}));
        assert!(query.sql.ends_with(" LIMIT ?"));
        assert_eq!(query.params, vec![Value::Integer(i64::MAX)]);
    }

    #[test]
    fn test_explicit_activity_replaces_default() {
        let query = compile_json(json!({"is_active": false}));
        assert!(!query.sql.contains("is_active = 1"));
        assert!(query.sql.contains(" AND is_active = ?"));
        assert_eq!(query.params, vec![Value::Integer(0)]);
    }

    #[test]
    fn test_unknown_order_by_falls_back() {
        let query = compile_json(json!({
            "order_by": "name; DROP TABLE categories",
            "order_direction": "sideways"
        }));
        assert!(query.sql.ends_with("ORDER BY order_index ASC"));
        assert!(!query.sql.contains("DROP"));
        assert!(!query.sql.contains("sideways"));
    }

    #[test]
    fn test_whitelisted_order_and_direction() {
        let query = compile_json(json!({"order_by": "total_uses", "order_direction": "desc"}));
        assert!(query.sql.ends_with("ORDER BY total_uses DESC"));

        let query = compile_json(json!({"order_by": {"field": "name", "direction": "DESC"}}));
        assert!(query.sql.ends_with("ORDER BY name DESC"));

        // Explicit direction wins over the ordering object
        let query = compile_json(json!({
            "order_by": {"field": "name", "direction": "DESC"},
            "order_direction": "ASC"
        }));
        assert!(query.sql.ends_with("ORDER BY name ASC"));
    }

    #[test]
    fn test_pinned_first_prepends_tie_break() {
        let query = compile_json(json!({"pinned_first": true, "order_by": "name"}));
        assert!(query
            .sql
            .ends_with("ORDER BY is_pinned DESC, pinned_order ASC, name ASC"));

        let query = compile_json(json!({"pinned_first": false}));
        assert!(!query.sql.contains("is_pinned DESC"));
    }

    #[test]
    fn test_zero_limit_is_ignored() {
        let query = compile_json(json!({"limit": 0}));
        assert!(!query.sql.contains("LIMIT"));
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_date_criteria() {
        let query = compile_json(json!({
            "created_date": {"from": "2026-01-01", "to": "2026-01-31"},
            "last_accessed": {"preset": "never"}
        }));
        assert!(query
            .sql
            .contains(" AND created_at >= ? AND created_at <= ? AND last_accessed IS NULL"));
        assert_eq!(
            query.params,
            vec![
                Value::Text("2026-01-01T00:00:00Z".into()),
                Value::Text("2026-01-31T23:59:59Z".into()),
            ]
        );

        let query = compile_json(json!({"updated_date": {"preset": "last_7_days"}}));
        let expected = format_timestamp(&(fixed_now() - chrono::Duration::days(7)).with_timezone(&Utc));
        assert!(query.sql.contains(" AND updated_at >= ?"));
        assert_eq!(query.params, vec![Value::Text(expected)]);

        // Unknown presets and "never" on non-access columns add nothing
        let query = compile_json(json!({
            "created_date": {"preset": "someday"},
            "updated_date": {"preset": "never"}
        }));
        assert_eq!(tail(&query), "WHERE 1=1 AND is_active = 1 ORDER BY order_index ASC");
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_presence_and_never_accessed() {
        let query = compile_json(json!({"has_color": true, "has_badge": false, "never_accessed": false}));
        assert!(query.sql.contains(" AND last_accessed IS NOT NULL"));
        assert!(query.sql.contains(" AND (color IS NOT NULL AND color != '')"));
        assert!(query.sql.contains(" AND (badge IS NULL OR badge = '')"));
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_compile_is_pure() {
        let spec = FilterSpec::from_json(&json!({
            "total_uses": {"min": 1},
            "search_text": "ssh",
            "pinned_first": true,
            "order_by": "name",
            "limit": 3
        }));
        let a = compile_at(&spec, fixed_now());
        let b = compile_at(&spec.clone(), fixed_now());
        assert_eq!(a.sql, b.sql);
        assert_eq!(a.params, b.params);
        assert_eq!(compile(&spec), compile(&spec));
    }

    #[test]
    fn test_item_scope_keys_are_ignored() {
        let query = compile_json(json!({"is_favorite": true, "tags": ["x"], "top_n": 3}));
        assert_eq!(query, compile_json(json!({})));
    }
}
