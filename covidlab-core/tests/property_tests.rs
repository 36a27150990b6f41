//! Property tests for the analytics kernels.
//!
//! Uses proptest to verify:
//! 1. Scaling preserves length and stays within [0,1]
//! 2. Scaling maps the maximum to exactly 1.0 when it is positive
//! 3. The moving average passes raw values through before the window fills
//! 4. From the window boundary on, each output is the window mean

use covidlab_core::analytics::{moving_average, scale};
use proptest::prelude::*;

proptest! {
    /// Scaled output has the input's length and every element in [0,1].
    #[test]
    fn scale_preserves_length_and_range(
        values in proptest::collection::vec(0u64..1_000_000, 0..200),
    ) {
        let scaled = scale(&values);
        prop_assert_eq!(scaled.len(), values.len());
        for v in &scaled {
            prop_assert!((0.0..=1.0).contains(v), "out of range: {v}");
        }
    }

    /// Whenever the maximum is positive, some element scales to exactly 1.
    #[test]
    fn scale_hits_one_at_the_maximum(
        values in proptest::collection::vec(0u64..1_000_000, 1..200),
    ) {
        prop_assume!(values.iter().any(|&v| v > 0));
        let scaled = scale(&values);
        let top = scaled.iter().cloned().fold(f64::MIN, f64::max);
        prop_assert!((top - 1.0).abs() < 1e-12);
    }

    /// Below the window boundary the input passes through untouched.
    #[test]
    fn moving_average_passes_through_before_window(
        values in proptest::collection::vec(0.0f64..1.0, 0..50),
    ) {
        let out = moving_average(&values, 7);
        prop_assert_eq!(out.len(), values.len());
        for i in 0..values.len().min(6) {
            prop_assert_eq!(out[i], values[i]);
        }
    }

    /// From the boundary on, each output equals the trailing window mean.
    #[test]
    fn moving_average_is_the_trailing_window_mean(
        values in proptest::collection::vec(0.0f64..1.0, 7..60),
    ) {
        let out = moving_average(&values, 7);
        for i in 6..values.len() {
            let mean: f64 = values[i - 6..=i].iter().sum::<f64>() / 7.0;
            prop_assert!((out[i] - mean).abs() < 1e-9);
        }
    }
}

#[test]
fn scale_of_empty_is_empty() {
    assert!(scale(&[]).is_empty());
}
