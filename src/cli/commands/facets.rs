//! `snipbar facets` command - Values available to the category filter controls

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::{format_date, load_config, open_store, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::{DateBounds, DateRanges, NumericBounds, PopularityRanges};
use crate::core::CategoryFilterEngine;

#[derive(clap::Args, Debug)]
pub struct FacetsArgs {
    /// Only list the distinct colors, one per line
    #[arg(long)]
    pub colors: bool,
}

#[derive(Serialize)]
struct Facets {
    colors: Vec<String>,
    dates: DateRanges,
    popularity: PopularityRanges,
}

pub fn run(args: FacetsArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(&config)?;
    let engine = CategoryFilterEngine::from_config(&store, &config);

    if args.colors {
        for color in engine.available_colors() {
            println!("{}", color);
        }
        return Ok(());
    }

    let facets = Facets {
        colors: engine.available_colors(),
        dates: engine.date_ranges(),
        popularity: engine.popularity_ranges(),
    };

    match resolve_format(global, &config, OutputFormat::Tsv) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&facets).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&facets).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => print_human(&facets),
    }

    Ok(())
}

fn print_human(facets: &Facets) {
    println!("{}", style("Colors").bold().underlined());
    if facets.colors.is_empty() {
        println!("  (none)");
    }
    for color in &facets.colors {
        println!("  {}", color);
    }

    println!();
    println!("{}", style("Date ranges").bold().underlined());
    print_dates("created", &facets.dates.created);
    print_dates("updated", &facets.dates.updated);
    print_dates("last_accessed", &facets.dates.last_accessed);

    println!();
    println!("{}", style("Popularity").bold().underlined());
    print_numbers("item_count", &facets.popularity.item_count);
    print_numbers("total_uses", &facets.popularity.total_uses);
    print_numbers("access_count", &facets.popularity.access_count);
}

fn print_dates(name: &str, bounds: &DateBounds) {
    println!(
        "  {:<14} {} .. {}",
        style(name).cyan(),
        format_date(bounds.earliest.as_ref()),
        format_date(bounds.latest.as_ref())
    );
}

fn print_numbers(name: &str, bounds: &NumericBounds) {
    println!(
        "  {:<14} min {:<6} max {:<6} avg {:.1}",
        style(name).cyan(),
        bounds.min,
        bounds.max,
        bounds.avg
    );
}
