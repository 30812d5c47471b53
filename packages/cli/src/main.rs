#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for browsing ACS Data Profile statistics.

use std::collections::BTreeSet;

use censusly_census::{CensusClient, CensusConfig, GeographyCatalog};
use censusly_cli::render;
use censusly_fetch::{FetchError, FetchOrchestrator, Role};
use censusly_geography_models::{Location, fips};
use censusly_profile_models::Category;
use clap::{Parser, Subcommand};
use futures::future::join_all;

#[derive(Parser)]
#[command(name = "censusly", about = "American Community Survey statistics by location")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every state with its FIPS code
    States,
    /// List the counties of a state
    Counties {
        /// State abbreviation or FIPS code (e.g., "CA" or "06")
        #[arg(long)]
        state: String,
    },
    /// List or search the places (cities, towns, CDPs) of a state
    Places {
        /// State abbreviation or FIPS code (e.g., "IL" or "17")
        #[arg(long)]
        state: String,
        /// Case-insensitive name filter. Without it, the first 20 places
        /// are shown.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one category of statistics for a location
    Profile {
        /// `us`, `state:CA`, `county:CA:037`, `city:IL:14000`, or `zip:94103`
        location: Location,
        /// Category to show
        #[arg(long, default_value = "overview", value_parser = parse_category)]
        category: Category,
        /// Comma-separated historical years to add (e.g., "2021,2020")
        #[arg(long, value_delimiter = ',')]
        years: Vec<u16>,
        /// Second location to compare against, in the same form
        #[arg(long)]
        compare: Option<Location>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = CensusConfig::load()?;
    let client = CensusClient::new(config.clone())?;

    match cli.command {
        Commands::States => {
            let mut catalog = GeographyCatalog::new(client);
            let states = catalog.states_if_needed().await?;
            let rows: Vec<Vec<String>> = states
                .iter()
                .map(|s| vec![s.name.clone(), s.fips.clone()])
                .collect();
            print!("{}", render::table(&header(&["State", "FIPS"]), &rows));
        }
        Commands::Counties { state } => {
            let state_fips = resolve_state(&state)?;
            let mut catalog = GeographyCatalog::new(client);
            catalog.select_state(state_fips).await?;
            let rows: Vec<Vec<String>> = catalog
                .counties()
                .iter()
                .map(|c| vec![c.name.clone(), c.fips.clone()])
                .collect();
            print!("{}", render::table(&header(&["County", "FIPS"]), &rows));
        }
        Commands::Places { state, search } => {
            let state_fips = resolve_state(&state)?;
            let mut catalog = GeographyCatalog::new(client);
            catalog.select_state(state_fips).await?;
            let rows: Vec<Vec<String>> = catalog
                .search_places(search.as_deref().unwrap_or_default())
                .into_iter()
                .map(|p| vec![p.name.clone(), p.fips.clone()])
                .collect();
            print!("{}", render::table(&header(&["Place", "FIPS"]), &rows));
            log::info!(
                "{} of {} places in state {state_fips}",
                rows.len(),
                catalog.places().len()
            );
        }
        Commands::Profile {
            location,
            category,
            years,
            compare,
        } => {
            let years: BTreeSet<u16> = years.into_iter().collect();
            if let Some(year) = years.iter().find(|y| !config.historical_years.contains(*y)) {
                return Err(format!(
                    "Year {year} is not available (choose from {:?})",
                    config.historical_years_desc()
                )
                .into());
            }

            let orchestrator = FetchOrchestrator::new(client, location, config.latest_year);

            report(orchestrator.open_category(category).await);
            for result in join_all(years.iter().map(|year| orchestrator.toggle_year(category, *year))).await {
                report(result.map(|_| ()));
            }
            if let Some(compare) = compare {
                report(orchestrator.enter_comparison(compare, category).await);
            }

            let views: Vec<_> = [Role::Primary, Role::Comparison]
                .into_iter()
                .filter_map(|role| orchestrator.snapshot(role, category))
                .collect();
            let refs: Vec<_> = views.iter().collect();
            print!("{}", render::profile(orchestrator.latest_year(), &refs));

            if views.first().is_none_or(|primary| primary.latest.is_none()) {
                return Err(format!("No {category} data for {}", orchestrator.primary_location()).into());
            }
        }
    }

    Ok(())
}

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn parse_category(input: &str) -> Result<Category, String> {
    input.parse().map_err(|_| {
        let names: Vec<&str> = Category::ALL.iter().map(AsRef::as_ref).collect();
        format!("unknown category '{input}' (expected one of: {})", names.join(", "))
    })
}

fn resolve_state(input: &str) -> Result<&'static str, String> {
    fips::resolve_state_fips(input).ok_or_else(|| format!("Unknown state: {input}"))
}

/// Fetch failures are already recorded in state and rendered with the
/// table, so they are only traced here.
fn report(result: Result<(), FetchError>) {
    if let Err(e) = result {
        log::debug!("Fetch finished with error: {e}");
    }
}
