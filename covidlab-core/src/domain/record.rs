//! DailyRecord — one day's statistics for one area.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Per-day statistics as returned by the dashboard API.
///
/// The upstream omits or nulls any counter it has no figure for; those
/// decode as zero. `date` has no default — a missing or malformed date
/// fails the decode of the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "counter")]
    pub new_cases: u64,
    #[serde(default, deserialize_with = "counter")]
    pub total_cases: u64,
    #[serde(default, deserialize_with = "counter")]
    pub new_deaths: u64,
    #[serde(default, deserialize_with = "counter")]
    pub total_deaths: u64,
    #[serde(default, deserialize_with = "counter")]
    pub new_hospital_admissions: u64,
    #[serde(default, deserialize_with = "counter")]
    pub occupied_beds_with_ventilator: u64,
}

/// Decode an integer counter, treating JSON null like an absent field.
fn counter<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Sort a series newest-first.
///
/// The upstream guarantees no ordering, so "most recent" semantics
/// require an explicit sort before deriving summary values.
pub fn sort_most_recent_first(records: &mut [DailyRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}
