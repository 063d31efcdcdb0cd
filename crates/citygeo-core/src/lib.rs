// crates/citygeo-core/src/lib.rs

//! # citygeo-core
//!
//! Fills in missing `lat`/`lon` on a JSON array of city records by asking a
//! geocoding service (Nominatim by default), one record at a time.
//!
//! ```no_run
//! use citygeo_core::{enrich_file, EnrichOptions, NominatimClient, NominatimConfig};
//!
//! let client = NominatimClient::new(NominatimConfig::default())?;
//! let report = enrich_file("public/obscure_cities.json", &client, &EnrichOptions::default(), |_| {})?;
//! println!("Processed {} out of {} cities", report.processed, report.total);
//! # Ok::<(), citygeo_core::GeoError>(())
//! ```

pub mod common;
pub mod enrich;
pub mod error;
pub mod geocoder;
pub mod loader;
pub mod record;

// Re-exports
pub use crate::common::DatasetStats;
pub use crate::enrich::{enrich_file, EnrichEvent, EnrichOptions, EnrichReport, Enricher};
pub use crate::error::{GeoError, Result};
pub use crate::geocoder::nominatim::{NominatimClient, NominatimConfig};
pub use crate::geocoder::{Geocoder, LookupError, LookupOutcome};
pub use crate::loader::{load_records, save_records, DEFAULT_DATASET_PATH};
pub use crate::record::{CityRecord, Coordinates};
