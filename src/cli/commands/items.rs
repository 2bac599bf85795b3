//! `snipbar items` command - Filter the items of one category in memory

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{
    escape_csv, format_date, load_config, open_store, parse_comparison, parse_spec,
    resolve_format, truncate_str,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::filter::{Criterion, FilterKey, FilterSpec, FilterStats, MatchMode};
use crate::core::model::Item;
use crate::core::ItemPredicateEngine;

/// Placeholder shown instead of sensitive content
const MASK: &str = "********";

#[derive(clap::Args, Debug)]
pub struct ItemsArgs {
    /// Category whose items are filtered
    #[arg(long, short = 'c')]
    pub category: i64,

    /// Filter spec as a JSON object; flags below are layered on top
    #[arg(long)]
    pub spec: Option<String>,

    /// Item types to keep (text, url, code, path)
    #[arg(long = "type", short = 't')]
    pub types: Vec<String>,

    /// Favorite state
    #[arg(long)]
    pub favorite: Option<bool>,

    /// Sensitive state
    #[arg(long)]
    pub sensitive: Option<bool>,

    /// Has at least one tag
    #[arg(long)]
    pub has_tags: Option<bool>,

    /// Tags to match (exact)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Require all tags instead of any
    #[arg(long)]
    pub all_tags: bool,

    /// Use count comparison, e.g. ">5", "<=2", "0"
    #[arg(long)]
    pub uses: Option<String>,

    /// Last used within a preset (today, last_N_days, never)
    #[arg(long)]
    pub last_used: Option<String>,

    /// Created within a preset (today, yesterday, last_N_days)
    #[arg(long)]
    pub created: Option<String>,

    /// Sort key (use_count_desc, use_count_asc, recent, oldest, newest, label_asc, label_desc)
    #[arg(long)]
    pub sort: Option<String>,

    /// Keep only the first N results
    #[arg(long)]
    pub top: Option<u64>,

    /// Show sensitive content instead of masking it
    #[arg(long)]
    pub reveal: bool,

    /// Show filter statistics
    #[arg(long)]
    pub stats: bool,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

impl ItemsArgs {
    /// Merge the flag criteria onto the `--spec` document
    pub fn to_spec(&self) -> Result<FilterSpec> {
        let mut spec = parse_spec(self.spec.as_deref())?;

        if !self.types.is_empty() {
            spec = spec.with(
                FilterKey::Types,
                Criterion::SetMembership {
                    values: self.types.clone(),
                    mode: MatchMode::Or,
                },
            );
        }

        let flags = [
            (FilterKey::IsFavorite, self.favorite),
            (FilterKey::IsSensitive, self.sensitive),
            (FilterKey::HasTags, self.has_tags),
        ];
        for (key, value) in flags {
            if let Some(b) = value {
                spec = spec.with(key, Criterion::Boolean(b));
            }
        }

        if !self.tags.is_empty() {
            let mode = if self.all_tags { MatchMode::And } else { MatchMode::Or };
            spec = spec.with(
                FilterKey::Tags,
                Criterion::SetMembership {
                    values: self.tags.clone(),
                    mode,
                },
            );
        }

        if let Some(raw) = &self.uses {
            let (operator, value) = parse_comparison(raw)
                .ok_or_else(|| miette::miette!("Invalid --uses comparison '{}'", raw))?;
            spec = spec.with(FilterKey::UseCount, Criterion::Comparison { operator, value });
        }

        if let Some(p) = &self.last_used {
            spec = spec.with(FilterKey::LastUsed, Criterion::DatePreset(p.clone()));
        }
        if let Some(p) = &self.created {
            spec = spec.with(FilterKey::CreatedDate, Criterion::DatePreset(p.clone()));
        }
        if let Some(key) = &self.sort {
            spec = spec.with(FilterKey::SortBy, Criterion::Text(key.clone()));
        }
        if let Some(n) = self.top {
            spec = spec.with(FilterKey::TopN, Criterion::Limit(n));
        }

        Ok(spec)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    items: &'a [Item],
    stats: &'a FilterStats,
}

pub fn run(args: ItemsArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(&config)?;
    let spec = args.to_spec()?;

    let category = store
        .get_category(args.category)
        .ok_or_else(|| miette::miette!("Category {} not found", args.category))?;
    let loaded = store.list_items(Some(category.id))?;

    let (mut items, stats) = ItemPredicateEngine::apply_with_stats(&loaded, &spec);
    if !args.reveal {
        mask_sensitive(&mut items);
    }

    // Count only
    if args.count {
        println!("{}", items.len());
        return Ok(());
    }

    let format = resolve_format(global, &config, OutputFormat::Tsv);

    match format {
        OutputFormat::Json => {
            let json = if args.stats {
                serde_json::to_string_pretty(&Report {
                    items: &items,
                    stats: &stats,
                })
            } else {
                serde_json::to_string_pretty(&items)
            }
            .into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = if args.stats {
                serde_yml::to_string(&Report {
                    items: &items,
                    stats: &stats,
                })
            } else {
                serde_yml::to_string(&items)
            }
            .into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("id,label,type,favorite,sensitive,use_count,last_used,tags");
            for item in &items {
                println!(
                    "{},{},{},{},{},{},{},{}",
                    item.id,
                    escape_csv(&item.label),
                    item.item_type,
                    item.is_favorite,
                    item.is_sensitive,
                    item.use_count,
                    format_date(item.last_used.as_ref()),
                    escape_csv(&item.tags.join(";")),
                );
            }
        }
        OutputFormat::Id => {
            for item in &items {
                println!("{}", item.id);
            }
        }
        OutputFormat::Md => {
            println!("| ID | Label | Type | Fav | Uses | Tags |");
            println!("|---|---|---|---|---|---|");
            for item in &items {
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    item.id,
                    item.label,
                    item.item_type,
                    if item.is_favorite { "yes" } else { "" },
                    item.use_count,
                    item.tags.join(", "),
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            if items.is_empty() {
                println!("No items found.");
            } else {
                print_table(&items);
            }
            if !global.quiet {
                println!();
                println!(
                    "{} of {} item(s) in {} shown.",
                    style(stats.filtered_count).cyan(),
                    style(stats.total_count).cyan(),
                    style(&category.name).yellow()
                );
            }
            if args.stats {
                println!(
                    "{} {} active filter(s), {:.3} ms",
                    style("Filter:").dim(),
                    stats.active_filter_count,
                    stats.execution_ms()
                );
            }
        }
    }

    Ok(())
}

/// Replace sensitive content before any output format sees it
fn mask_sensitive(items: &mut [Item]) {
    for item in items.iter_mut().filter(|i| i.is_sensitive) {
        item.content = MASK.to_string();
    }
}

fn print_table(items: &[Item]) {
    println!(
        "{:<6} {:<20} {:<5} {:<4} {:<5} {:<11} {:<30}",
        style("ID").bold(),
        style("LABEL").bold(),
        style("TYPE").bold(),
        style("FAV").bold(),
        style("USES").bold(),
        style("LAST USED").bold(),
        style("CONTENT").bold(),
    );
    println!("{}", "-".repeat(90));

    for item in items {
        let content = truncate_str(&item.content.replace('\n', " "), 30);
        println!(
            "{:<6} {:<20} {:<5} {:<4} {:<5} {:<11} {:<30}",
            style(item.id).cyan(),
            truncate_str(&item.label, 18),
            item.item_type.as_str(),
            if item.is_favorite { "*" } else { "" },
            item.use_count,
            format_date(item.last_used.as_ref()),
            content,
        );
    }
}
