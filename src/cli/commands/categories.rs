//! `snipbar categories` command - Filter categories through the cached engine

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{
    escape_csv, format_date, load_config, open_store, parse_spec, resolve_format, truncate_str,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::filter::{CacheStats, Criterion, FilterKey, FilterSpec, FilterStats};
use crate::core::model::Category;
use crate::core::CategoryFilterEngine;

#[derive(clap::Args, Debug)]
pub struct CategoriesArgs {
    /// Filter spec as a JSON object; flags below are layered on top
    #[arg(long)]
    pub spec: Option<String>,

    /// Active state (default: only active categories)
    #[arg(long)]
    pub active: Option<bool>,

    /// Predefined (built-in) categories
    #[arg(long)]
    pub predefined: Option<bool>,

    /// Pinned state
    #[arg(long)]
    pub pinned: Option<bool>,

    /// Minimum item count
    #[arg(long)]
    pub min_items: Option<i64>,

    /// Maximum item count
    #[arg(long)]
    pub max_items: Option<i64>,

    /// Minimum total uses
    #[arg(long)]
    pub min_uses: Option<i64>,

    /// Maximum total uses
    #[arg(long)]
    pub max_uses: Option<i64>,

    /// Minimum access count
    #[arg(long)]
    pub min_access: Option<i64>,

    /// Maximum access count
    #[arg(long)]
    pub max_access: Option<i64>,

    /// Created within a preset (today, yesterday, last_N_days)
    #[arg(long)]
    pub created: Option<String>,

    /// Updated within a preset (today, yesterday, last_N_days)
    #[arg(long)]
    pub updated: Option<String>,

    /// Last accessed within a preset (today, yesterday, last_N_days)
    #[arg(long)]
    pub accessed: Option<String>,

    /// Never accessed (true) or accessed at least once (false)
    #[arg(long)]
    pub never_accessed: Option<bool>,

    /// Has a color set
    #[arg(long)]
    pub has_color: Option<bool>,

    /// Has a badge set
    #[arg(long)]
    pub has_badge: Option<bool>,

    /// Exact color value
    #[arg(long)]
    pub color: Option<String>,

    /// Case-insensitive substring of the category name
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Sort column (unknown columns fall back to order_index)
    #[arg(long)]
    pub order_by: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Pinned categories first, in pin order
    #[arg(long)]
    pub pinned_first: bool,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<u64>,

    /// Run the same filter N times (repeats are served from the cache)
    #[arg(long, default_value = "1")]
    pub repeat: u32,

    /// Show filter and cache statistics
    #[arg(long)]
    pub stats: bool,

    /// Show the compiled SQL and parameters
    #[arg(long)]
    pub show_sql: bool,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

impl CategoriesArgs {
    /// Merge the flag criteria onto the `--spec` document
    pub fn to_spec(&self) -> Result<FilterSpec> {
        let mut spec = parse_spec(self.spec.as_deref())?;

        let flags = [
            (FilterKey::IsActive, self.active),
            (FilterKey::IsPredefined, self.predefined),
            (FilterKey::IsPinned, self.pinned),
            (FilterKey::NeverAccessed, self.never_accessed),
            (FilterKey::HasColor, self.has_color),
            (FilterKey::HasBadge, self.has_badge),
        ];
        for (key, value) in flags {
            if let Some(b) = value {
                spec = spec.with(key, Criterion::Boolean(b));
            }
        }

        let ranges = [
            (FilterKey::ItemCount, self.min_items, self.max_items),
            (FilterKey::TotalUses, self.min_uses, self.max_uses),
            (FilterKey::AccessCount, self.min_access, self.max_access),
        ];
        for (key, min, max) in ranges {
            if min.is_some() || max.is_some() {
                spec = spec.with(key, Criterion::Range { min, max });
            }
        }

        let presets = [
            (FilterKey::CreatedDate, &self.created),
            (FilterKey::UpdatedDate, &self.updated),
            (FilterKey::LastAccessed, &self.accessed),
        ];
        for (key, preset) in presets {
            if let Some(p) = preset {
                spec = spec.with(key, Criterion::DatePreset(p.clone()));
            }
        }

        let texts = [
            (FilterKey::Color, &self.color),
            (FilterKey::SearchText, &self.search),
            (FilterKey::OrderBy, &self.order_by),
        ];
        for (key, text) in texts {
            if let Some(t) = text {
                spec = spec.with(key, Criterion::Text(t.clone()));
            }
        }

        if self.desc {
            spec = spec.with(FilterKey::OrderDirection, Criterion::Text("DESC".to_string()));
        }
        if self.pinned_first {
            spec = spec.with(FilterKey::PinnedFirst, Criterion::Boolean(true));
        }
        if let Some(n) = self.limit {
            spec = spec.with(FilterKey::Limit, Criterion::Limit(n));
        }

        Ok(spec)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    categories: &'a [Category],
    stats: &'a FilterStats,
    cache: CacheStats,
}

pub fn run(args: CategoriesArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(&config)?;
    let spec = args.to_spec()?;

    let mut engine = CategoryFilterEngine::from_config(&store, &config);
    let mut result = engine.apply(&spec);
    for _ in 1..args.repeat.max(1) {
        result = engine.apply(&spec);
    }
    let (categories, stats) = result;

    if args.show_sql {
        if let Some(query) = engine.last_query() {
            eprintln!("{} {}", style("SQL:").dim(), query.sql);
            eprintln!("{} {:?}", style("params:").dim(), query.params);
        }
    }

    // Count only
    if args.count {
        println!("{}", categories.len());
        return Ok(());
    }

    let format = resolve_format(global, &config, OutputFormat::Tsv);
    let cache = engine.cache_stats();

    match format {
        OutputFormat::Json => {
            let json = if args.stats {
                serde_json::to_string_pretty(&Report {
                    categories: &categories,
                    stats: &stats,
                    cache,
                })
            } else {
                serde_json::to_string_pretty(&categories)
            }
            .into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = if args.stats {
                serde_yml::to_string(&Report {
                    categories: &categories,
                    stats: &stats,
                    cache,
                })
            } else {
                serde_yml::to_string(&categories)
            }
            .into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("id,name,order_index,active,pinned,item_count,total_uses,access_count,color,badge,last_accessed");
            for cat in &categories {
                println!(
                    "{},{},{},{},{},{},{},{},{},{},{}",
                    cat.id,
                    escape_csv(&cat.name),
                    cat.order_index,
                    cat.is_active,
                    cat.is_pinned,
                    cat.item_count,
                    cat.total_uses,
                    cat.access_count,
                    escape_csv(cat.color.as_deref().unwrap_or("")),
                    escape_csv(cat.badge.as_deref().unwrap_or("")),
                    format_date(cat.last_accessed.as_ref()),
                );
            }
        }
        OutputFormat::Id => {
            for cat in &categories {
                println!("{}", cat.id);
            }
        }
        OutputFormat::Md => {
            println!("| ID | Name | Pinned | Items | Uses | Color | Badge |");
            println!("|---|---|---|---|---|---|---|");
            for cat in &categories {
                println!(
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    cat.id,
                    cat.name,
                    if cat.is_pinned { "yes" } else { "" },
                    cat.item_count,
                    cat.total_uses,
                    cat.color.as_deref().unwrap_or("-"),
                    cat.badge.as_deref().unwrap_or("-"),
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            if categories.is_empty() {
                println!("No categories found.");
            } else {
                print_table(&categories);
            }
            if !global.quiet {
                println!();
                println!(
                    "{} of {} category(s) shown.",
                    style(stats.filtered_count).cyan(),
                    style(stats.total_count).cyan()
                );
            }
            if args.stats {
                print_stats(&stats, &cache);
            }
        }
    }

    Ok(())
}

fn print_table(categories: &[Category]) {
    println!(
        "{:<6} {:<24} {:<4} {:<7} {:<7} {:<9} {:<12}",
        style("ID").bold(),
        style("NAME").bold(),
        style("PIN").bold(),
        style("ITEMS").bold(),
        style("USES").bold(),
        style("COLOR").bold(),
        style("ACCESSED").bold(),
    );
    println!("{}", "-".repeat(75));

    for cat in categories {
        let name = match cat.badge.as_deref() {
            Some(badge) => format!("{} [{}]", cat.name, badge),
            None => cat.name.clone(),
        };
        println!(
            "{:<6} {:<24} {:<4} {:<7} {:<7} {:<9} {:<12}",
            style(cat.id).cyan(),
            truncate_str(&name, 22),
            if cat.is_pinned { "*" } else { "" },
            cat.item_count,
            cat.total_uses,
            cat.color.as_deref().unwrap_or("-"),
            format_date(cat.last_accessed.as_ref()),
        );
    }
}

fn print_stats(stats: &FilterStats, cache: &CacheStats) {
    println!(
        "{} {} active filter(s), {:.3} ms",
        style("Filter:").dim(),
        stats.active_filter_count,
        stats.execution_ms()
    );
    if cache.enabled {
        println!(
            "{} {}/{} entries, {} hit(s), {} miss(es), hit rate {:.1}%",
            style("Cache:").dim(),
            cache.size,
            cache.capacity,
            cache.hits,
            cache.misses,
            cache.hit_rate * 100.0
        );
    } else {
        println!("{} disabled", style("Cache:").dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(argv: &[&str]) -> CategoriesArgs {
        let mut full = vec!["snipbar", "categories"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Categories(args) => args,
            _ => panic!("expected categories command"),
        }
    }

    #[test]
    fn test_flags_layer_onto_spec_json() {
        let args = parse(&[
            "--spec",
            r#"{"is_pinned": false, "search_text": "doc"}"#,
            "--pinned",
            "true",
            "--min-items",
            "3",
            "--desc",
            "-n",
            "5",
        ]);
        let spec = args.to_spec().unwrap();

        assert_eq!(spec.get(FilterKey::IsPinned), Some(&Criterion::Boolean(true)));
        assert_eq!(spec.get(FilterKey::SearchText), Some(&Criterion::Text("doc".into())));
        assert_eq!(
            spec.get(FilterKey::ItemCount),
            Some(&Criterion::Range { min: Some(3), max: None })
        );
        assert_eq!(
            spec.get(FilterKey::OrderDirection),
            Some(&Criterion::Text("DESC".into()))
        );
        assert_eq!(spec.get(FilterKey::Limit), Some(&Criterion::Limit(5)));
    }

    #[test]
    fn test_no_flags_is_empty_spec() {
        let spec = parse(&[]).to_spec().unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_invalid_spec_json_is_an_error() {
        assert!(parse(&["--spec", "{not json"]).to_spec().is_err());
    }
}
