//! Filter vocabulary shared by the category and item engines
//!
//! A `Criterion` is the raw, shape-checked value of one named filter. Each
//! engine interprets the same union differently: the category engine turns it
//! into SQL fragments, the item engine into predicates and comparators.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

/// Which engine a criterion name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Category,
    Item,
}

/// The closed set of criterion names
///
/// Declaration order is the canonical key order used for iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    // Category scope
    IsActive,
    IsPredefined,
    IsPinned,
    ItemCount,
    TotalUses,
    AccessCount,
    UpdatedDate,
    LastAccessed,
    NeverAccessed,
    HasColor,
    HasBadge,
    Color,
    SearchText,
    OrderBy,
    OrderDirection,
    PinnedFirst,
    Limit,
    // Shared
    CreatedDate,
    // Item scope
    Types,
    IsFavorite,
    IsSensitive,
    HasTags,
    Tags,
    UseCount,
    LastUsed,
    SortBy,
    TopN,
}

impl FilterKey {
    pub const ALL: [FilterKey; 27] = [
        FilterKey::IsActive,
        FilterKey::IsPredefined,
        FilterKey::IsPinned,
        FilterKey::ItemCount,
        FilterKey::TotalUses,
        FilterKey::AccessCount,
        FilterKey::UpdatedDate,
        FilterKey::LastAccessed,
        FilterKey::NeverAccessed,
        FilterKey::HasColor,
        FilterKey::HasBadge,
        FilterKey::Color,
        FilterKey::SearchText,
        FilterKey::OrderBy,
        FilterKey::OrderDirection,
        FilterKey::PinnedFirst,
        FilterKey::Limit,
        FilterKey::CreatedDate,
        FilterKey::Types,
        FilterKey::IsFavorite,
        FilterKey::IsSensitive,
        FilterKey::HasTags,
        FilterKey::Tags,
        FilterKey::UseCount,
        FilterKey::LastUsed,
        FilterKey::SortBy,
        FilterKey::TopN,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::IsActive => "is_active",
            FilterKey::IsPredefined => "is_predefined",
            FilterKey::IsPinned => "is_pinned",
            FilterKey::ItemCount => "item_count",
            FilterKey::TotalUses => "total_uses",
            FilterKey::AccessCount => "access_count",
            FilterKey::UpdatedDate => "updated_date",
            FilterKey::LastAccessed => "last_accessed",
            FilterKey::NeverAccessed => "never_accessed",
            FilterKey::HasColor => "has_color",
            FilterKey::HasBadge => "has_badge",
            FilterKey::Color => "color",
            FilterKey::SearchText => "search_text",
            FilterKey::OrderBy => "order_by",
            FilterKey::OrderDirection => "order_direction",
            FilterKey::PinnedFirst => "pinned_first",
            FilterKey::Limit => "limit",
            FilterKey::CreatedDate => "created_date",
            FilterKey::Types => "types",
            FilterKey::IsFavorite => "is_favorite",
            FilterKey::IsSensitive => "is_sensitive",
            FilterKey::HasTags => "has_tags",
            FilterKey::Tags => "tags",
            FilterKey::UseCount => "use_count",
            FilterKey::LastUsed => "last_used",
            FilterKey::SortBy => "sort_by",
            FilterKey::TopN => "top_n",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    pub fn applies_to(&self, scope: Scope) -> bool {
        match self {
            FilterKey::CreatedDate => true,
            FilterKey::Types
            | FilterKey::IsFavorite
            | FilterKey::IsSensitive
            | FilterKey::HasTags
            | FilterKey::Tags
            | FilterKey::UseCount
            | FilterKey::LastUsed
            | FilterKey::SortBy
            | FilterKey::TopN => scope == Scope::Item,
            _ => scope == Scope::Category,
        }
    }

    /// Whether a criterion has the shape this key expects
    pub fn accepts(&self, criterion: &Criterion) -> bool {
        use Criterion as C;
        match self {
            FilterKey::IsActive
            | FilterKey::IsPredefined
            | FilterKey::IsPinned
            | FilterKey::NeverAccessed
            | FilterKey::HasColor
            | FilterKey::HasBadge
            | FilterKey::PinnedFirst
            | FilterKey::IsFavorite
            | FilterKey::IsSensitive
            | FilterKey::HasTags => matches!(criterion, C::Boolean(_)),
            FilterKey::ItemCount | FilterKey::TotalUses | FilterKey::AccessCount => {
                matches!(criterion, C::Range { .. })
            }
            FilterKey::CreatedDate
            | FilterKey::UpdatedDate
            | FilterKey::LastAccessed
            | FilterKey::LastUsed => matches!(criterion, C::DatePreset(_) | C::DateRange { .. }),
            FilterKey::Color | FilterKey::SearchText | FilterKey::OrderDirection => {
                matches!(criterion, C::Text(_))
            }
            FilterKey::OrderBy | FilterKey::SortBy => {
                matches!(criterion, C::Text(_) | C::Ordering { .. })
            }
            FilterKey::Limit | FilterKey::TopN => matches!(criterion, C::Limit(_)),
            FilterKey::Types | FilterKey::Tags => matches!(criterion, C::SetMembership { .. }),
            FilterKey::UseCount => matches!(criterion, C::Comparison { .. }),
        }
    }
}

impl std::fmt::Display for FilterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AND/OR mode of a set-membership test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchMode {
    And,
    #[default]
    Or,
}

impl MatchMode {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("and") {
            MatchMode::And
        } else {
            MatchMode::Or
        }
    }
}

/// One filter value
///
/// Operators, presets, ordering fields and directions are kept as the caller
/// wrote them; engines validate them when they interpret the criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Boolean(bool),
    Range {
        min: Option<i64>,
        max: Option<i64>,
    },
    SetMembership {
        values: Vec<String>,
        mode: MatchMode,
    },
    Comparison {
        operator: String,
        value: i64,
    },
    DatePreset(String),
    DateRange {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
    Ordering {
        field: String,
        direction: String,
    },
    Limit(u64),
    Text(String),
}

impl Criterion {
    /// Recognize a criterion from its JSON shape
    ///
    /// Returns `None` for `null` and for shapes that match no variant.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Criterion::Boolean(*b)),
            Value::Number(n) => n.as_u64().map(Criterion::Limit),
            Value::String(s) => Some(Criterion::Text(s.clone())),
            Value::Array(values) => Some(Criterion::SetMembership {
                values: string_list(values),
                mode: MatchMode::Or,
            }),
            Value::Object(map) => {
                if let Some(preset) = map.get("preset") {
                    return preset.as_str().map(|p| Criterion::DatePreset(p.to_string()));
                }
                if map.contains_key("values") {
                    let values = map
                        .get("values")
                        .and_then(Value::as_array)
                        .map(|v| string_list(v))
                        .unwrap_or_default();
                    let mode = map
                        .get("mode")
                        .and_then(Value::as_str)
                        .map(MatchMode::parse)
                        .unwrap_or_default();
                    return Some(Criterion::SetMembership { values, mode });
                }
                if let Some(operator) = map.get("operator") {
                    let value = map.get("value").and_then(json_int)?;
                    return Some(Criterion::Comparison {
                        operator: operator.as_str().unwrap_or_default().to_string(),
                        value,
                    });
                }
                if let Some(field) = map.get("field") {
                    return Some(Criterion::Ordering {
                        field: field.as_str().unwrap_or_default().to_string(),
                        direction: map
                            .get("direction")
                            .and_then(Value::as_str)
                            .unwrap_or("ASC")
                            .to_string(),
                    });
                }
                if map.contains_key("from") || map.contains_key("to") {
                    let from = map.get("from").and_then(|v| parse_bound(v, false));
                    let to = map.get("to").and_then(|v| parse_bound(v, true));
                    if from.is_none() && to.is_none() {
                        return None;
                    }
                    return Some(Criterion::DateRange { from, to });
                }
                if map.contains_key("min") || map.contains_key("max") {
                    let min = map.get("min").and_then(json_int);
                    let max = map.get("max").and_then(json_int);
                    if min.is_none() && max.is_none() {
                        return None;
                    }
                    return Some(Criterion::Range { min, max });
                }
                None
            }
            Value::Null => None,
        }
    }

    /// Whether this criterion actually constrains anything
    pub fn is_active(&self) -> bool {
        match self {
            Criterion::Boolean(_) | Criterion::Comparison { .. } | Criterion::Ordering { .. } => {
                true
            }
            Criterion::Range { min, max } => min.is_some() || max.is_some(),
            Criterion::SetMembership { values, .. } => !values.is_empty(),
            Criterion::DatePreset(p) => !p.is_empty(),
            Criterion::DateRange { from, to } => from.is_some() || to.is_some(),
            Criterion::Limit(n) => *n > 0,
            Criterion::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Criterion::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Criterion::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Row cap, treating zero as "no limit"
    pub fn as_limit(&self) -> Option<usize> {
        match self {
            Criterion::Limit(n) if *n > 0 => Some(*n as usize),
            _ => None,
        }
    }
}

fn string_list(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

fn json_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}

/// Parse a range bound: RFC3339 timestamp or a bare `YYYY-MM-DD` date.
/// A bare date as upper bound covers the whole day.
fn parse_bound(value: &Value, upper: bool) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let time = if upper {
        NaiveTime::from_hms_opt(23, 59, 59)?
    } else {
        NaiveTime::MIN
    };
    Some(Utc.from_utc_datetime(&date.and_time(time)))
}

/// Comparison operators understood by numeric criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
}

impl CompareOp {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            "=" | "==" => Some(CompareOp::Eq),
            _ => None,
        }
    }

    pub fn matches(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Eq => lhs == rhs,
        }
    }
}

/// Resolved date preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    /// From local midnight
    Today,
    /// From now minus N days
    LastDays(u32),
    /// Never used / never accessed
    Never,
}

impl DatePreset {
    /// Parse `today`, `never`, `yesterday` or `last_N_days`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "today" => Some(DatePreset::Today),
            "never" => Some(DatePreset::Never),
            "yesterday" => Some(DatePreset::LastDays(1)),
            _ => s
                .strip_prefix("last_")
                .and_then(|rest| rest.strip_suffix("_days"))
                .and_then(|n| n.parse().ok())
                .map(DatePreset::LastDays),
        }
    }

    /// Inclusive lower bound for this preset, `None` for `Never`
    ///
    /// Spans reaching past the calendar range clamp to the earliest instant.
    pub fn lower_bound(&self, now: DateTime<Local>) -> Option<DateTime<Utc>> {
        match self {
            DatePreset::Today => {
                let midnight = now.date_naive().and_time(NaiveTime::MIN);
                Local
                    .from_local_datetime(&midnight)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
            }
            DatePreset::LastDays(days) => Some(
                Duration::try_days(i64::from(*days))
                    .and_then(|span| now.checked_sub_signed(span))
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC),
            ),
            DatePreset::Never => None,
        }
    }
}
