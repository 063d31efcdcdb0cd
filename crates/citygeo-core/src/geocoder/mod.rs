// crates/citygeo-core/src/geocoder/mod.rs

//! # Geocoder
//!
//! A geocoder turns `(city, country)` into coordinates. Lookups never fail
//! the caller: every outcome, including transport problems, comes back as a
//! [`LookupOutcome`] so the enrichment loop can report it and move on.

use crate::record::Coordinates;
use thiserror::Error;

pub mod nominatim;

/// Result of a single lookup.
#[derive(Debug)]
pub enum LookupOutcome {
    Found(Coordinates),
    /// The service answered with an empty result list.
    NotFound,
    Failed(LookupError),
}

impl LookupOutcome {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            LookupOutcome::Found(c) => Some(*c),
            _ => None,
        }
    }
}

/// Why a lookup could not produce an answer.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid response body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("malformed result: {0}")]
    Malformed(String),
}

pub trait Geocoder {
    fn lookup(&self, city: &str, country: &str) -> LookupOutcome;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn lookup(&self, city: &str, country: &str) -> LookupOutcome {
        (**self).lookup(city, country)
    }
}
