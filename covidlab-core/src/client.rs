//! High-level client — composes request building, cache-fallback
//! fetching, and decoding into a single series-for-area operation.

use crate::data::cache::ResponseCache;
use crate::data::decode::decode_series;
use crate::data::error::DataError;
use crate::data::fetch::CachedFetcher;
use crate::data::govuk::{ApiRequest, API_ENDPOINT};
use crate::data::transport::{HttpTransport, ReqwestTransport};
use crate::domain::{Area, DailyRecord};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the dashboard API.
    pub endpoint: String,

    /// Directory holding the response cache.
    pub cache_dir: PathBuf,

    /// Transport timeout in seconds.
    pub timeout_secs: u64,

    /// User agent presented to the API.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: API_ENDPOINT.to_string(),
            cache_dir: PathBuf::from("cache"),
            timeout_secs: 30,
            user_agent: "covidlab/0.1".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, DataError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DataError::Config(format!("read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| DataError::Config(format!("parse {}: {e}", path.display())))
    }
}

/// The single "get series for area" entry point.
pub struct CovidDataClient {
    config: ClientConfig,
    fetcher: CachedFetcher,
}

impl CovidDataClient {
    /// Construct a client with the production transport.
    pub fn new(config: ClientConfig) -> Result<Self, DataError> {
        let transport = ReqwestTransport::new(
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Construct a client over a specific transport (stubbed in tests).
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let cache = ResponseCache::new(&config.cache_dir);
        let fetcher = CachedFetcher::new(transport, cache);
        Self { config, fetcher }
    }

    /// Process-wide shared instance with default configuration,
    /// constructed on first use and never torn down.
    pub fn shared() -> &'static CovidDataClient {
        static SHARED: OnceLock<CovidDataClient> = OnceLock::new();
        SHARED.get_or_init(|| {
            CovidDataClient::new(ClientConfig::default()).expect("failed to build HTTP client")
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Requests currently in flight.
    pub fn in_flight(&self) -> usize {
        self.fetcher.in_flight()
    }

    /// Fetch and decode the day-by-day series for an area.
    ///
    /// Single attempt: the cache fallback inside the fetcher is the only
    /// resilience mechanism, and any failure surfaces unchanged. The
    /// series comes back in upstream order; sort it newest-first before
    /// deriving summary values (`domain::sort_most_recent_first`).
    pub async fn daily_series(&self, area: &Area) -> Result<Vec<DailyRecord>, DataError> {
        let request = ApiRequest::for_area(&self.config.endpoint, area)?;
        let body = self.fetcher.fetch(&request).await?;
        decode_series(&body)
    }
}
