//! Derived presentation series and summary values.
//!
//! Every function here assumes a series sorted newest-first. The
//! upstream guarantees no ordering, so callers sort before deriving
//! (`domain::sort_most_recent_first`).

use super::{moving_average, scale};
use crate::domain::DailyRecord;

/// Days in the smoothing window.
pub const SMOOTHING_WINDOW_DAYS: usize = 7;
/// Days of history in the smoothed series (the most recent week).
pub const SMOOTHED_SPAN_DAYS: usize = 7;
/// Days of history in the raw scaled series (the most recent three weeks).
pub const RAW_SPAN_DAYS: usize = 21;

/// Smoothed series for one counter: the most recent week, scaled and run
/// through the 7-day trailing average.
pub fn smoothed_series(records: &[DailyRecord], field: fn(&DailyRecord) -> u64) -> Vec<f64> {
    let counts: Vec<u64> = records.iter().take(SMOOTHED_SPAN_DAYS).map(field).collect();
    moving_average(&scale(&counts), SMOOTHING_WINDOW_DAYS)
}

/// Raw scaled series for one counter: the most recent three weeks,
/// scaled but not smoothed.
pub fn raw_scaled_series(records: &[DailyRecord], field: fn(&DailyRecord) -> u64) -> Vec<f64> {
    let counts: Vec<u64> = records.iter().take(RAW_SPAN_DAYS).map(field).collect();
    scale(&counts)
}

/// First nonzero value of a counter scanning forward, or 0 when none is.
///
/// A linear scan, not a date comparison: "most recent" is only
/// meaningful on a newest-first series.
pub fn most_recent_nonzero(records: &[DailyRecord], field: fn(&DailyRecord) -> u64) -> u64 {
    records.iter().map(field).find(|&v| v != 0).unwrap_or(0)
}

/// The newest record, when the series is non-empty.
pub fn latest(records: &[DailyRecord]) -> Option<&DailyRecord> {
    records.first()
}

pub fn smoothed_new_cases(records: &[DailyRecord]) -> Vec<f64> {
    smoothed_series(records, |r| r.new_cases)
}

pub fn raw_new_cases(records: &[DailyRecord]) -> Vec<f64> {
    raw_scaled_series(records, |r| r.new_cases)
}

pub fn smoothed_new_deaths(records: &[DailyRecord]) -> Vec<f64> {
    smoothed_series(records, |r| r.new_deaths)
}

pub fn raw_new_deaths(records: &[DailyRecord]) -> Vec<f64> {
    raw_scaled_series(records, |r| r.new_deaths)
}

/// Most recent nonzero count of occupied ventilator beds. Hospitals
/// report this metric with a lag, so the newest records often carry zero.
pub fn ventilator_occupancy(records: &[DailyRecord]) -> u64 {
    most_recent_nonzero(records, |r| r.occupied_beds_with_ventilator)
}
