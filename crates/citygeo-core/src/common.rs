use crate::record::CityRecord;
use serde::{Deserialize, Serialize};

/// Simple aggregate counts over a loaded dataset.
///
/// `pending` is the number of records a run would send to the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total: usize,
    pub enriched: usize,
    pub pending: usize,
}

impl DatasetStats {
    pub fn from_records(records: &[CityRecord]) -> Self {
        let enriched = records.iter().filter(|r| r.is_enriched()).count();
        Self {
            total: records.len(),
            enriched,
            pending: records.len() - enriched,
        }
    }
}
