//! Payload decoding.
//!
//! The upstream wraps the series in `{ "data": [...] }`. A payload with
//! no `data` key decodes to an empty series — defaulting by omission
//! applies at the container level as well as per field.

use super::error::DataError;
use crate::domain::DailyRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Vec<DailyRecord>,
}

/// Decode a response body into the day-by-day series, in upstream order.
pub fn decode_series(bytes: &[u8]) -> Result<Vec<DailyRecord>, DataError> {
    let response: ApiResponse =
        serde_json::from_slice(bytes).map_err(|e| DataError::Decode(e.to_string()))?;
    Ok(response.data)
}
