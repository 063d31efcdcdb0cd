// crates/citygeo-core/src/geocoder/nominatim.rs
use super::{Geocoder, LookupError, LookupOutcome};
use crate::error::{GeoError, Result};
use crate::record::{place_query, Coordinates};
use reqwest::{blocking::Client, Url};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
/// Nominatim's usage policy requires an identifying User-Agent.
pub const DEFAULT_USER_AGENT: &str = "CityGeocoder/1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Blocking client for the Nominatim `/search` endpoint.
///
/// Each lookup is exactly one GET with `q=<city>, <country>`, `format=json`
/// and `limit=1`. There is no retry and no caching.
pub struct NominatimClient {
    client: Client,
    endpoint: Url,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            GeoError::InvalidData(format!("invalid endpoint {}: {}", config.endpoint, e))
        })?;
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(GeoError::Client)?;
        Ok(Self { client, endpoint })
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }

    fn search(&self, query: &str) -> std::result::Result<Option<Coordinates>, LookupError> {
        let url = self.search_url(query);
        log::debug!("GET {url}");

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }
        let body = response.text()?;
        parse_search_response(&body)
    }
}

impl Geocoder for NominatimClient {
    fn lookup(&self, city: &str, country: &str) -> LookupOutcome {
        let query = place_query(city, country);
        match self.search(&query) {
            Ok(Some(coords)) => {
                log::debug!("{query} -> {coords}");
                LookupOutcome::Found(coords)
            }
            Ok(None) => {
                log::warn!("No results for {query}");
                LookupOutcome::NotFound
            }
            Err(e) => {
                log::warn!("Error geocoding {query}: {e}");
                LookupOutcome::Failed(e)
            }
        }
    }
}

/// One entry of a `format=json` search response. Only the fields we read.
#[derive(Debug, Deserialize)]
struct Place {
    lat: Degrees,
    lon: Degrees,
}

/// Nominatim sends degrees as strings; plain numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Text(String),
    Number(f64),
}

impl Degrees {
    fn to_f64(&self, field: &str) -> std::result::Result<f64, LookupError> {
        match self {
            Degrees::Number(n) => Ok(*n),
            Degrees::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| LookupError::Malformed(format!("{field} {s:?}: {e}"))),
        }
    }
}

/// Parses a `/search?format=json` body into the first hit's coordinates.
///
/// An empty array is `Ok(None)`.
pub fn parse_search_response(body: &str) -> std::result::Result<Option<Coordinates>, LookupError> {
    let places: Vec<Place> = serde_json::from_str(body)?;
    let Some(first) = places.first() else {
        return Ok(None);
    };

    let lat = first.lat.to_f64("lat")?;
    let lon = first.lon.to_f64("lon")?;
    Coordinates::new(lat, lon)
        .map(Some)
        .ok_or_else(|| LookupError::Malformed(format!("non-finite coordinates ({lat}, {lon})")))
}
