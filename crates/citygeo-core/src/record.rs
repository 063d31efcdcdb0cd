// crates/citygeo-core/src/record.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const CITY_KEY: &str = "city";
pub const COUNTRY_KEY: &str = "country";
pub const LAT_KEY: &str = "lat";
pub const LON_KEY: &str = "lon";

/// Joins a place into the free-text form the geocoder searches for.
pub fn place_query(city: &str, country: &str) -> String {
    format!("{city}, {country}")
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Returns `None` unless both values are finite.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat={}, lon={}", self.lat, self.lon)
    }
}

/// One entry of the dataset.
///
/// The record keeps the whole JSON object it was read from, so fields other
/// than `city`, `country`, `lat` and `lon` are written back untouched and in
/// their original position. Construction guarantees that `city` and `country`
/// are strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct CityRecord {
    fields: Map<String, Value>,
}

impl CityRecord {
    pub fn city(&self) -> &str {
        self.str_field(CITY_KEY)
    }

    pub fn country(&self) -> &str {
        self.str_field(COUNTRY_KEY)
    }

    /// Free-text query sent to the geocoder: `"City, Country"`.
    pub fn query(&self) -> String {
        place_query(self.city(), self.country())
    }

    /// Both `lat` and `lon`, when both are present as numbers.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let lat = self.fields.get(LAT_KEY).and_then(Value::as_f64)?;
        let lon = self.fields.get(LON_KEY).and_then(Value::as_f64)?;
        Some(Coordinates { lat, lon })
    }

    /// True once both `lat` and `lon` keys exist, whatever their values.
    /// Such a record is never looked up again.
    pub fn is_enriched(&self) -> bool {
        self.fields.contains_key(LAT_KEY) && self.fields.contains_key(LON_KEY)
    }

    /// Merges coordinates into the record.
    ///
    /// New keys are appended after the existing fields; a key that is already
    /// present keeps its position and gets its value replaced.
    pub fn set_coordinates(&mut self, coords: Coordinates) {
        self.fields.insert(LAT_KEY.to_string(), Value::from(coords.lat));
        self.fields.insert(LON_KEY.to_string(), Value::from(coords.lon));
    }

    /// Raw access to any field, including pass-through ones.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn str_field(&self, key: &str) -> &str {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

impl TryFrom<Map<String, Value>> for CityRecord {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        for key in [CITY_KEY, COUNTRY_KEY] {
            match fields.get(key) {
                Some(Value::String(_)) => {}
                Some(other) => return Err(format!("`{key}` must be a string, got {other}")),
                None => return Err(format!("missing required field `{key}`")),
            }
        }
        Ok(Self { fields })
    }
}

impl TryFrom<Value> for CityRecord {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Self::try_from(fields),
            other => Err(format!("expected a JSON object, got {other}")),
        }
    }
}

impl From<CityRecord> for Map<String, Value> {
    fn from(record: CityRecord) -> Self {
        record.fields
    }
}
