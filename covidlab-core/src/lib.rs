//! CovidLab Core — area selection, data acquisition, and series analytics.
//!
//! This crate contains the data pipeline behind the display surfaces:
//! - Domain types (areas, daily records)
//! - Request construction for the coronavirus dashboard API
//! - Cache-fallback fetching: a failed live request is answered from the
//!   last successful response for the same request, when one exists
//! - Defensive decoding of the upstream payload
//! - Pure series transforms (scaling, trailing moving average, summaries)

pub mod analytics;
pub mod client;
pub mod data;
pub mod domain;

pub use client::{ClientConfig, CovidDataClient};
pub use data::DataError;
