//! Data acquisition — request building, cache-fallback fetching, and
//! payload decoding.

pub mod batch;
pub mod cache;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod govuk;
pub mod transport;

pub use batch::{fetch_areas, FetchProgress, FetchSummary, StdoutProgress};
pub use cache::{CacheEntry, CacheMeta, ResponseCache};
pub use decode::decode_series;
pub use error::DataError;
pub use fetch::CachedFetcher;
pub use govuk::{ApiRequest, API_ENDPOINT};
pub use transport::{HttpTransport, ReqwestTransport};
