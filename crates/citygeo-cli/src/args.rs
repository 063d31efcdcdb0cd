use citygeo_core::enrich::DEFAULT_DELAY;
use citygeo_core::geocoder::nominatim::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use citygeo_core::DEFAULT_DATASET_PATH;
use clap::{Parser, Subcommand};

/// CLI arguments for citygeo
#[derive(Debug, Parser)]
#[command(
    name = "citygeo",
    version,
    about = "Fill in missing city coordinates in a JSON dataset using Nominatim"
)]
pub struct CliArgs {
    /// Path to the JSON dataset; it is read and then overwritten in place
    #[arg(short = 'i', long = "input", global = true, default_value = DEFAULT_DATASET_PATH)]
    pub input: String,

    /// Geocoding search endpoint
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// User-Agent sent with every request (required by the Nominatim usage policy)
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Pause after each request, in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_DELAY.as_millis() as u64)]
    pub delay_ms: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Commands {
    /// Geocode every record that lacks coordinates and save the file (default)
    Enrich,

    /// Show how many records are already enriched, without any network access
    Stats,
}
