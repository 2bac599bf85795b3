//! In-memory item filtering
//!
//! Items for one category are already loaded (and decrypted) by the time they
//! reach this engine, so filtering is a chain of predicates over borrowed
//! items followed by an optional stable sort and a top-N cut. Nothing is
//! cached and the input is never modified.

use std::cmp::Ordering;
use std::time::Instant;

use chrono::{DateTime, Local, Utc};

use super::criterion::{CompareOp, Criterion, DatePreset, FilterKey, MatchMode, Scope};
use super::spec::FilterSpec;
use super::stats::FilterStats;
use crate::core::model::Item;

/// How one criterion narrows or reorders the surviving items
#[derive(Clone, Copy)]
enum Step {
    Types,
    Flag(fn(&Item) -> bool),
    HasTags,
    Tags,
    UseCount,
    Date {
        field: fn(&Item) -> Option<DateTime<Utc>>,
        never_means_unused: bool,
    },
    Sort,
    Top,
}

/// Application order. Each step sees only the survivors of the previous ones.
const ITEM_STEPS: &[(FilterKey, Step)] = &[
    (FilterKey::Types, Step::Types),
    (FilterKey::IsFavorite, Step::Flag(is_favorite)),
    (FilterKey::IsSensitive, Step::Flag(is_sensitive)),
    (FilterKey::HasTags, Step::HasTags),
    (FilterKey::Tags, Step::Tags),
    (FilterKey::UseCount, Step::UseCount),
    (
        FilterKey::LastUsed,
        Step::Date {
            field: last_used,
            never_means_unused: true,
        },
    ),
    (
        FilterKey::CreatedDate,
        Step::Date {
            field: created_at,
            never_means_unused: false,
        },
    ),
    (FilterKey::SortBy, Step::Sort),
    (FilterKey::TopN, Step::Top),
];

fn is_favorite(item: &Item) -> bool {
    item.is_favorite
}

fn is_sensitive(item: &Item) -> bool {
    item.is_sensitive
}

fn last_used(item: &Item) -> Option<DateTime<Utc>> {
    item.last_used
}

fn created_at(item: &Item) -> Option<DateTime<Utc>> {
    Some(item.created_at)
}

/// Filters, sorts and truncates already-loaded items
pub struct ItemPredicateEngine;

impl ItemPredicateEngine {
    /// Filter against the local clock
    pub fn apply(items: &[Item], spec: &FilterSpec) -> Vec<Item> {
        Self::apply_at(items, spec, Local::now())
    }

    /// Filter with date presets resolved against `now`
    pub fn apply_at(items: &[Item], spec: &FilterSpec, now: DateTime<Local>) -> Vec<Item> {
        let mut survivors: Vec<&Item> = items.iter().collect();

        for (key, step) in ITEM_STEPS {
            if let Some(criterion) = spec.get(*key) {
                run_step(&mut survivors, *step, criterion, now);
            }
        }

        survivors.into_iter().cloned().collect()
    }

    /// Filter and report stats
    pub fn apply_with_stats(items: &[Item], spec: &FilterSpec) -> (Vec<Item>, FilterStats) {
        let started = Instant::now();
        let filtered = Self::apply(items, spec);
        let stats = FilterStats {
            total_count: items.len(),
            filtered_count: filtered.len(),
            active_filter_count: spec.active_count(Scope::Item),
            execution_time: started.elapsed(),
        };
        (filtered, stats)
    }
}

fn run_step(items: &mut Vec<&Item>, step: Step, criterion: &Criterion, now: DateTime<Local>) {
    match (step, criterion) {
        (Step::Types, Criterion::SetMembership { values, .. }) if !values.is_empty() => {
            items.retain(|i| {
                values
                    .iter()
                    .any(|v| v.eq_ignore_ascii_case(i.item_type.as_str()))
            });
        }
        (Step::Flag(field), Criterion::Boolean(wanted)) => {
            items.retain(|i| field(i) == *wanted);
        }
        (Step::HasTags, Criterion::Boolean(wanted)) => {
            items.retain(|i| !i.tags.is_empty() == *wanted);
        }
        (Step::Tags, Criterion::SetMembership { values, mode }) if !values.is_empty() => {
            // Exact string match, no case or whitespace folding
            let has = |item: &Item, tag: &String| item.tags.contains(tag);
            match mode {
                MatchMode::And => items.retain(|i| values.iter().all(|t| has(i, t))),
                MatchMode::Or => items.retain(|i| values.iter().any(|t| has(i, t))),
            }
        }
        (Step::UseCount, Criterion::Comparison { operator, value }) => {
            match CompareOp::parse(operator) {
                Some(op) => items.retain(|i| op.matches(i.use_count, *value)),
                None => items.clear(),
            }
        }
        (
            Step::Date {
                field,
                never_means_unused,
            },
            Criterion::DatePreset(raw),
        ) => match DatePreset::parse(raw) {
            Some(DatePreset::Never) if never_means_unused => {
                items.retain(|i| i.use_count == 0);
            }
            Some(preset) => {
                if let Some(start) = preset.lower_bound(now) {
                    items.retain(|i| field(i).is_some_and(|at| at >= start));
                }
            }
            None => {}
        },
        (Step::Date { field, .. }, Criterion::DateRange { from, to }) => {
            items.retain(|i| match field(i) {
                Some(at) => {
                    from.map_or(true, |from| at >= from) && to.map_or(true, |to| at <= to)
                }
                None => false,
            });
        }
        (Step::Sort, criterion) => {
            if let Some(compare) = sort_order(criterion) {
                // sort_by is stable, ties keep their input order
                items.sort_by(|a, b| compare(*a, *b));
            }
        }
        (Step::Top, Criterion::Limit(n)) if *n > 0 => {
            items.truncate(*n as usize);
        }
        _ => {}
    }
}

type Comparator = Box<dyn Fn(&Item, &Item) -> Ordering>;

/// Comparator for a sort key or `{field, direction}` object; `None` keeps input order
fn sort_order(criterion: &Criterion) -> Option<Comparator> {
    let (field, descending) = match criterion {
        Criterion::Text(key) => match key.as_str() {
            "use_count_desc" | "most_used" => ("use_count", true),
            "use_count_asc" | "least_used" => ("use_count", false),
            "recent" => ("last_used", true),
            "oldest" => ("created_at", false),
            "newest" => ("created_at", true),
            "label_asc" => ("label", false),
            "label_desc" => ("label", true),
            _ => return None,
        },
        Criterion::Ordering { field, direction } => {
            let field = match field.as_str() {
                "use_count" => "use_count",
                "last_used" => "last_used",
                "created_at" | "created" => "created_at",
                "label" => "label",
                _ => return None,
            };
            (field, direction.trim().eq_ignore_ascii_case("desc"))
        }
        _ => return None,
    };

    let base: Comparator = match field {
        "use_count" => Box::new(|a: &Item, b: &Item| a.use_count.cmp(&b.use_count)),
        "created_at" => Box::new(|a: &Item, b: &Item| a.created_at.cmp(&b.created_at)),
        "label" => Box::new(|a: &Item, b: &Item| {
            a.label.to_lowercase().cmp(&b.label.to_lowercase())
        }),
        // Never-used items sort after used ones in either direction
        _ => {
            return Some(Box::new(move |a: &Item, b: &Item| {
                match (a.last_used, b.last_used) {
                    (Some(x), Some(y)) if descending => y.cmp(&x),
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }))
        }
    };

    if descending {
        Some(Box::new(move |a: &Item, b: &Item| base(b, a)))
    } else {
        Some(base)
    }
}
