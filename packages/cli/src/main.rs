#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for generating collision reports.
//!
//! Loads the collision CSV once, applies the requested facet filters and
//! free-text query, and prints the computed report as JSON. Stands in for
//! the dashboard presentation layer: it consumes exactly the interfaces a
//! web frontend would.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use collision_insights_dataset::Dataset;
use collision_insights_report_models::FilterCriteria;

#[derive(Parser)]
#[command(name = "collision-insights", about = "NYC collision report generator")]
struct Cli {
    /// Path to the collision CSV export.
    #[arg(long, default_value = "cleaned_collisions_persons.csv")]
    data: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a filtered report (the default)
    Report {
        /// Borough to include (repeatable), e.g. "brooklyn" or "STATEN ISLAND"
        #[arg(long = "borough")]
        boroughs: Vec<String>,
        /// Crash year to include (repeatable)
        #[arg(long = "year")]
        years: Vec<i32>,
        /// Vehicle category to include (repeatable), e.g. "taxi" or "TRUCK/VAN"
        #[arg(long = "vehicle")]
        vehicles: Vec<String>,
        /// Contributing factor to include (repeatable), matched case-insensitively
        #[arg(long = "factor")]
        factors: Vec<String>,
        /// Injury type to include (repeatable): pedestrian, cyclist, motorist
        #[arg(long = "injury")]
        injuries: Vec<String>,
        /// Free-text query, e.g. "Queens 2022 pedestrian crashes"
        #[arg(long)]
        search: Option<String>,
        /// Maximum number of sampled map points
        #[arg(long, default_value_t = collision_insights_report::sample::DEFAULT_SAMPLE_CAP)]
        sample_size: usize,
        /// Seed for the deterministic location sample
        #[arg(long, default_value_t = collision_insights_report::sample::DEFAULT_SAMPLE_SEED)]
        seed: u64,
    },
    /// Print the distinct values available for each filter facet
    Facets,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    // Load once; a missing or unreadable file degrades to an empty
    // dataset (logged) rather than aborting.
    let dataset = Dataset::load_or_empty(&cli.data);

    match cli.command {
        None => run_report(
            &dataset,
            &FilterCriteria::default(),
            None,
            collision_insights_report::sample::DEFAULT_SAMPLE_CAP,
            collision_insights_report::sample::DEFAULT_SAMPLE_SEED,
        ),
        Some(Commands::Facets) => {
            let options = dataset.facet_options();
            println!("{}", serde_json::to_string_pretty(&options)?);
            Ok(())
        }
        Some(Commands::Report {
            boroughs,
            years,
            vehicles,
            factors,
            injuries,
            search,
            sample_size,
            seed,
        }) => {
            let criteria = FilterCriteria {
                boroughs: parse_all(&boroughs, "borough")?,
                years,
                vehicle_categories: parse_all(&vehicles, "vehicle category")?,
                contributing_factors: factors,
                injury_types: parse_all(&injuries, "injury type")?,
            };
            run_report(&dataset, &criteria, search.as_deref(), sample_size, seed)
        }
    }
}

fn run_report(
    dataset: &Dataset,
    criteria: &FilterCriteria,
    search: Option<&str>,
    sample_size: usize,
    seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut criteria = criteria.clone();

    if let Some(text) = search {
        let interpreted = collision_insights_query::interpret(text);
        if interpreted.is_empty() {
            log::warn!("Search text {text:?} produced no filter values");
        } else {
            log::info!(
                "Interpreted query: borough={:?} year={:?} injury={:?}",
                interpreted.borough,
                interpreted.year,
                interpreted.injury_type
            );
        }
        criteria.merge_query(&interpreted);
    }

    let report =
        collision_insights_report::build_report_with(dataset, &criteria, sample_size, seed);

    if report.no_matches {
        // Explicit no-results outcome, distinct from a failed computation.
        eprintln!("No collisions match the requested filters.");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Parses every value of a repeatable facet flag, failing with a usable
/// message naming the offending value.
fn parse_all<T>(values: &[String], what: &str) -> Result<Vec<T>, String>
where
    T: std::str::FromStr,
{
    values
        .iter()
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| format!("unrecognized {what}: {v:?}"))
        })
        .collect()
}
