//! Normalization into [0,1] by the sequence maximum.

/// Scale a sequence into [0,1] by dividing every element by the maximum.
///
/// An empty input has no maximum and short-circuits to an empty output.
/// An all-zero input scales to all zeros, keeping every output in range.
pub fn scale(values: &[u64]) -> Vec<f64> {
    let Some(&max) = values.iter().max() else {
        return Vec::new();
    };
    if max == 0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|&v| v as f64 / max as f64).collect()
}
