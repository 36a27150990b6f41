//! Pure series transforms.
//!
//! Everything here is synchronous and side-effect-free: normalization
//! into [0,1], a trailing moving average, and the derived presentation
//! series cut from a newest-first series.

pub mod moving_average;
pub mod scale;
pub mod series;

pub use moving_average::moving_average;
pub use scale::scale;
pub use series::{
    latest, most_recent_nonzero, raw_new_cases, raw_new_deaths, raw_scaled_series,
    smoothed_new_cases, smoothed_new_deaths, smoothed_series, ventilator_occupancy,
    RAW_SPAN_DAYS, SMOOTHED_SPAN_DAYS, SMOOTHING_WINDOW_DAYS,
};

/// Create a newest-first series from new-case counts for testing.
///
/// Index 0 is the most recent day; every other counter is zero.
#[cfg(test)]
pub fn make_records(new_cases: &[u64]) -> Vec<crate::domain::DailyRecord> {
    use crate::domain::DailyRecord;
    let base_date = chrono::NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
    new_cases
        .iter()
        .enumerate()
        .map(|(i, &n)| DailyRecord {
            date: base_date - chrono::Duration::days(i as i64),
            new_cases: n,
            total_cases: 0,
            new_deaths: 0,
            total_deaths: 0,
            new_hospital_admissions: 0,
            occupied_beds_with_ventilator: 0,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for analytics tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
