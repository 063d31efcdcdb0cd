// crates/citygeo-core/src/enrich.rs

//! # Enrichment loop
//!
//! Walks the records in file order. Records that already carry both `lat`
//! and `lon` are skipped without a request or a pause; every other record
//! gets exactly one lookup followed by a fixed pause, whatever the outcome.

use crate::error::Result;
use crate::geocoder::{Geocoder, LookupError, LookupOutcome};
use crate::loader::{load_records, save_records};
use crate::record::{CityRecord, Coordinates};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Nominatim allows at most one request per second.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Pause after each lookup.
    pub delay: Duration,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }
}

/// Progress notification, emitted once per record.
#[derive(Debug)]
pub enum EnrichEvent<'a> {
    Skipped {
        index: usize,
        record: &'a CityRecord,
    },
    Geocoded {
        index: usize,
        record: &'a CityRecord,
        coords: Coordinates,
    },
    /// The record was left untouched. `error` is `None` when the service
    /// simply had no result.
    Failed {
        index: usize,
        record: &'a CityRecord,
        error: Option<&'a LookupError>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Records that received coordinates during this run.
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
}

pub struct Enricher<G> {
    geocoder: G,
    delay: Duration,
}

impl<G: Geocoder> Enricher<G> {
    pub fn new(geocoder: G, options: &EnrichOptions) -> Self {
        Self {
            geocoder,
            delay: options.delay,
        }
    }

    /// Enriches `records` in place and reports each step to `on_event`.
    pub fn run<F>(&self, records: &mut [CityRecord], mut on_event: F) -> EnrichReport
    where
        F: FnMut(EnrichEvent<'_>),
    {
        let mut report = EnrichReport {
            total: records.len(),
            ..EnrichReport::default()
        };

        for (index, record) in records.iter_mut().enumerate() {
            if record.is_enriched() {
                report.skipped += 1;
                on_event(EnrichEvent::Skipped {
                    index,
                    record: &*record,
                });
                continue;
            }

            let outcome = self.geocoder.lookup(record.city(), record.country());
            match &outcome {
                LookupOutcome::Found(coords) => {
                    record.set_coordinates(*coords);
                    report.processed += 1;
                    on_event(EnrichEvent::Geocoded {
                        index,
                        record: &*record,
                        coords: *coords,
                    });
                }
                LookupOutcome::NotFound => {
                    report.failed += 1;
                    on_event(EnrichEvent::Failed {
                        index,
                        record: &*record,
                        error: None,
                    });
                }
                LookupOutcome::Failed(e) => {
                    report.failed += 1;
                    on_event(EnrichEvent::Failed {
                        index,
                        record: &*record,
                        error: Some(e),
                    });
                }
            }

            self.pause();
        }

        log::info!(
            "enrichment finished: {} geocoded, {} failed, {} skipped of {}",
            report.processed,
            report.failed,
            report.skipped,
            report.total
        );
        report
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

/// Loads the dataset at `path`, enriches it, and overwrites the file.
///
/// The file is written exactly once, after the last record.
pub fn enrich_file<G, F>(
    path: impl AsRef<Path>,
    geocoder: G,
    options: &EnrichOptions,
    on_event: F,
) -> Result<EnrichReport>
where
    G: Geocoder,
    F: FnMut(EnrichEvent<'_>),
{
    let path = path.as_ref();
    let mut records = load_records(path)?;
    let report = Enricher::new(geocoder, options).run(&mut records, on_event);
    save_records(path, &records)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::time::Instant;

    enum Reply {
        Found(f64, f64),
        Empty,
        Broken,
    }

    #[derive(Default)]
    struct FakeGeocoder {
        replies: HashMap<String, Reply>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeGeocoder {
        fn with(mut self, query: &str, reply: Reply) -> Self {
            self.replies.insert(query.to_string(), reply);
            self
        }
    }

    impl Geocoder for FakeGeocoder {
        fn lookup(&self, city: &str, country: &str) -> LookupOutcome {
            let query = crate::record::place_query(city, country);
            self.calls.borrow_mut().push(query.clone());
            match self.replies.get(&query) {
                Some(Reply::Found(lat, lon)) => {
                    LookupOutcome::Found(Coordinates::new(*lat, *lon).unwrap())
                }
                Some(Reply::Broken) => {
                    LookupOutcome::Failed(LookupError::Malformed("connection reset".into()))
                }
                Some(Reply::Empty) | None => LookupOutcome::NotFound,
            }
        }
    }

    fn records(value: Value) -> Vec<CityRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn no_delay() -> EnrichOptions {
        EnrichOptions {
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn geocodes_missing_record() {
        let geocoder = FakeGeocoder::default().with("Foo, Bar", Reply::Found(12.34, 56.78));
        let mut data = records(json!([{"city": "Foo", "country": "Bar"}]));

        let report = Enricher::new(&geocoder, &no_delay()).run(&mut data, |_| {});

        assert_eq!(report.processed, 1);
        assert_eq!(report.total, 1);
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!([{"city": "Foo", "country": "Bar", "lat": 12.34, "lon": 56.78}])
        );
    }

    #[test]
    fn enriched_record_is_skipped_without_lookup() {
        let geocoder = FakeGeocoder::default();
        let input = json!([{"city": "X", "country": "Y", "lat": 1.0, "lon": 2.0}]);
        let mut data = records(input.clone());

        let mut skipped = Vec::new();
        let report = Enricher::new(&geocoder, &no_delay()).run(&mut data, |event| {
            if let EnrichEvent::Skipped { index, .. } = event {
                skipped.push(index);
            }
        });

        assert!(geocoder.calls.borrow().is_empty());
        assert_eq!(skipped, [0]);
        assert_eq!(report.processed, 0);
        assert_eq!(report.total, 1);
        assert_eq!(serde_json::to_value(&data).unwrap(), input);
    }

    #[test]
    fn failures_leave_records_untouched_and_loop_continues() {
        let geocoder = FakeGeocoder::default()
            .with("Broken, Net", Reply::Broken)
            .with("Atlantis, Sea", Reply::Empty)
            .with("Foo, Bar", Reply::Found(1.5, 2.5));
        let input = json!([
            {"city": "Broken", "country": "Net", "pop": 3},
            {"city": "Atlantis", "country": "Sea"},
            {"city": "Foo", "country": "Bar"},
        ]);
        let mut data = records(input.clone());

        let mut failures = Vec::new();
        let report = Enricher::new(&geocoder, &no_delay()).run(&mut data, |event| {
            if let EnrichEvent::Failed { index, error, .. } = event {
                failures.push((index, error.is_some()));
            }
        });

        assert_eq!(failures, [(0, true), (1, false)]);
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(serde_json::to_value(&data[0]).unwrap(), input[0]);
        assert_eq!(serde_json::to_value(&data[1]).unwrap(), input[1]);
        assert!(data[1].get("lat").is_none());
        assert_eq!(data[2].coordinates(), Coordinates::new(1.5, 2.5));
        assert_eq!(geocoder.calls.borrow().len(), 3);
    }

    #[test]
    fn lookups_happen_in_file_order() {
        let geocoder = FakeGeocoder::default();
        let mut data = records(json!([
            {"city": "C", "country": "Z"},
            {"city": "A", "country": "Z", "lat": 0.0, "lon": 0.0},
            {"city": "B", "country": "Z"},
        ]));

        Enricher::new(&geocoder, &no_delay()).run(&mut data, |_| {});

        assert_eq!(*geocoder.calls.borrow(), ["C, Z", "B, Z"]);
    }

    #[test]
    fn pauses_after_each_lookup_only() {
        let delay = Duration::from_millis(40);
        let geocoder = FakeGeocoder::default().with("A, Z", Reply::Found(1.0, 1.0));
        let mut data = records(json!([
            {"city": "A", "country": "Z"},
            {"city": "B", "country": "Z"},
            {"city": "C", "country": "Z", "lat": 0.0, "lon": 0.0},
        ]));

        let started = Instant::now();
        Enricher::new(&geocoder, &EnrichOptions { delay }).run(&mut data, |_| {});

        assert!(started.elapsed() >= delay * 2);
    }

    #[test]
    fn skipped_records_add_no_delay() {
        let geocoder = FakeGeocoder::default();
        let mut data = records(json!([
            {"city": "A", "country": "Z", "lat": 0.0, "lon": 0.0},
            {"city": "B", "country": "Z", "lat": 0.0, "lon": 0.0},
        ]));

        let started = Instant::now();
        let report = Enricher::new(&geocoder, &EnrichOptions::default()).run(&mut data, |_| {});

        assert_eq!(report.skipped, 2);
        assert!(started.elapsed() < DEFAULT_DELAY);
    }
}
