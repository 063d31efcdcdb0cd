//! citygeo — batch geocoder for the city dataset
//!
//! Reads a JSON array of `{ "city": ..., "country": ... }` records, asks
//! Nominatim for the coordinates of every record that has no `lat`/`lon`
//! yet, and writes the file back. Records that already have coordinates are
//! left alone, so re-running the command only retries the failures.
//!
//! Usage examples
//! --------------
//!
//! - Enrich the default dataset (public/obscure_cities.json)
//!   $ citygeo
//!
//! - Enrich another file
//!   $ citygeo --input data/cities.json
//!
//! - Count enriched and pending records
//!   $ citygeo stats
//!
//! Set `RUST_LOG=debug` to see each request.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use citygeo_core::{
    enrich_file, load_records, CityRecord, DatasetStats, EnrichEvent, EnrichOptions, EnrichReport,
    NominatimClient, NominatimConfig,
};
use clap::Parser;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = CliArgs::parse();

    match args.command.unwrap_or(Commands::Enrich) {
        Commands::Enrich => {
            let client = NominatimClient::new(NominatimConfig {
                endpoint: args.endpoint.clone(),
                user_agent: args.user_agent.clone(),
                ..NominatimConfig::default()
            })?;
            let options = EnrichOptions {
                delay: Duration::from_millis(args.delay_ms),
            };

            let report = enrich_file(&args.input, &client, &options, print_event)
                .with_context(|| format!("failed to enrich {}", args.input))?;

            println!("{}", summary(&report));
        }

        Commands::Stats => {
            let records = load_records(&args.input)
                .with_context(|| format!("failed to load {}", args.input))?;
            let stats = DatasetStats::from_records(&records);
            println!("Dataset statistics for {}:", args.input);
            println!("  Records: {}", stats.total);
            println!("  With coordinates: {}", stats.enriched);
            println!("  Pending: {}", stats.pending);
        }
    }

    Ok(())
}

fn print_event(event: EnrichEvent<'_>) {
    match event_line(&event) {
        Some(line) => println!("{line}"),
        None => log::debug!("skipping {}: already has coordinates", event_record(&event).query()),
    }
}

fn event_record<'a>(event: &EnrichEvent<'a>) -> &'a CityRecord {
    match *event {
        EnrichEvent::Skipped { record, .. }
        | EnrichEvent::Geocoded { record, .. }
        | EnrichEvent::Failed { record, .. } => record,
    }
}

/// Stdout line for a progress event; skipped records print nothing.
fn event_line(event: &EnrichEvent<'_>) -> Option<String> {
    match event {
        EnrichEvent::Skipped { .. } => None,
        EnrichEvent::Geocoded { record, coords, .. } => {
            Some(format!("Geocoded {}: {}", record.query(), coords))
        }
        EnrichEvent::Failed {
            record,
            error: None,
            ..
        } => Some(format!("Failed to geocode {}: no results", record.query())),
        EnrichEvent::Failed {
            record,
            error: Some(e),
            ..
        } => Some(format!("Failed to geocode {}: {}", record.query(), e)),
    }
}

fn summary(report: &EnrichReport) -> String {
    format!(
        "\nGeocoding complete!\nProcessed {} out of {} cities",
        report.processed, report.total
    )
}
