// crates/citygeo-core/src/loader.rs

//! # Dataset I/O
//!
//! Reads the whole record array into memory and writes it back in one go.
//! There is no partial write: the file on disk only changes when
//! [`save_records`] runs.

use crate::error::{GeoError, Result};
use crate::record::CityRecord;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Location of the dataset when none is given, relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "public/obscure_cities.json";

/// Loads and validates every record of the JSON array at `path`.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<CityRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        GeoError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    let value: Value = serde_json::from_reader(reader).map_err(GeoError::Json)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(GeoError::InvalidData(format!(
                "{} must contain a top-level JSON array, found {}",
                path.display(),
                json_kind(&other)
            )))
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            CityRecord::try_from(item).map_err(|reason| GeoError::InvalidRecord { index, reason })
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Overwrites `path` with the records as 2-space indented JSON.
pub fn save_records(path: impl AsRef<Path>, records: &[CityRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(GeoError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, records).map_err(GeoError::Json)?;
    writer.flush().map_err(GeoError::Io)?;

    log::info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
