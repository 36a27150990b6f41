//! Cache-fallback fetcher.
//!
//! Policy: issue the live request; on success, store the body for future
//! fallback use and return it; on any failure — transport error, timeout
//! or non-success status alike — consult the cache and return the stored
//! body when one exists, otherwise fail with the original cause.
//!
//! Every in-flight request is held in a keyed registry from start to
//! completion: inserted before the first poll of its task, removed on
//! completion regardless of outcome. Concurrent fetches are independent
//! and may complete in any order; identical requests are not coalesced,
//! and there is no cancellation or retry.

use super::cache::ResponseCache;
use super::error::DataError;
use super::govuk::ApiRequest;
use super::transport::HttpTransport;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::AbortHandle;

/// Fetcher with a cache fallback for failed live requests.
pub struct CachedFetcher {
    transport: Arc<dyn HttpTransport>,
    cache: ResponseCache,
    pending: Mutex<HashMap<u64, AbortHandle>>,
    next_id: AtomicU64,
}

impl CachedFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, cache: ResponseCache) -> Self {
        Self {
            transport,
            cache,
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Number of requests currently in flight.
    pub fn in_flight(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Fetch the body for a request, falling back to the cache on failure.
    ///
    /// Each call is a wholly independent operation: a repeat of a
    /// completed request starts from scratch.
    pub async fn fetch(&self, request: &ApiRequest) -> Result<Vec<u8>, DataError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let task = tokio::spawn(run_fetch(
            Arc::clone(&self.transport),
            self.cache.clone(),
            request.clone(),
        ));

        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(id, task.abort_handle());
        }
        // Owns the registry entry for exactly the lifetime of the
        // operation; dropped on every exit path below.
        let _entry = RegistryEntry {
            registry: &self.pending,
            id,
        };

        task.await
            .map_err(|e| DataError::Other(format!("fetch task failed: {e}")))?
    }
}

/// Removes its registry entry when the operation completes.
struct RegistryEntry<'a> {
    registry: &'a Mutex<HashMap<u64, AbortHandle>>,
    id: u64,
}

impl Drop for RegistryEntry<'_> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.registry.lock() {
            pending.remove(&self.id);
        }
    }
}

async fn run_fetch(
    transport: Arc<dyn HttpTransport>,
    cache: ResponseCache,
    request: ApiRequest,
) -> Result<Vec<u8>, DataError> {
    match transport.get(request.url()).await {
        Ok(body) => {
            // Opportunistic store; a cache write failure never fails the
            // fetch that produced the body.
            if let Err(e) = cache.store(&request, &body) {
                eprintln!(
                    "WARNING: failed to cache response for {}: {e}",
                    request.area_name()
                );
            }
            Ok(body)
        }
        Err(cause) => match cache.load(&request) {
            Ok(body) => Ok(body),
            Err(_) => Err(DataError::FetchFailed {
                cause: Box::new(cause),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::govuk::API_ENDPOINT;
    use crate::domain::{Area, Nation};
    use async_trait::async_trait;
    use reqwest::Url;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use tokio::sync::Semaphore;

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_cache_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("covidlab_fetch_{}_{id}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn england_request() -> ApiRequest {
        ApiRequest::for_area(API_ENDPOINT, &Area::Nation(Nation::England)).unwrap()
    }

    struct FixedTransport(Vec<u8>);

    #[async_trait]
    impl HttpTransport for FixedTransport {
        async fn get(&self, _url: &Url) -> Result<Vec<u8>, DataError> {
            Ok(self.0.clone())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl HttpTransport for FailingTransport {
        async fn get(&self, _url: &Url) -> Result<Vec<u8>, DataError> {
            Err(DataError::Network("connection refused".to_string()))
        }
    }

    /// Blocks every GET until a permit is released by the test.
    struct GatedTransport {
        gate: Arc<Semaphore>,
    }

    #[async_trait]
    impl HttpTransport for GatedTransport {
        async fn get(&self, _url: &Url) -> Result<Vec<u8>, DataError> {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| DataError::Other(e.to_string()))?;
            permit.forget();
            Ok(b"{}".to_vec())
        }
    }

    #[tokio::test]
    async fn success_returns_body_and_stores_it() {
        let dir = temp_cache_dir();
        let cache = ResponseCache::new(&dir);
        let fetcher = CachedFetcher::new(
            Arc::new(FixedTransport(b"{\"data\":[]}".to_vec())),
            cache.clone(),
        );
        let request = england_request();

        let body = fetcher.fetch(&request).await.unwrap();
        assert_eq!(body, b"{\"data\":[]}");
        assert_eq!(cache.load(&request).unwrap(), b"{\"data\":[]}");

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn failure_with_primed_cache_returns_cached_body() {
        let dir = temp_cache_dir();
        let cache = ResponseCache::new(&dir);
        let request = england_request();
        cache.store(&request, b"{\"data\":[]}").unwrap();

        let fetcher = CachedFetcher::new(Arc::new(FailingTransport), cache);
        let body = fetcher.fetch(&request).await.unwrap();
        assert_eq!(body, b"{\"data\":[]}");

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn failure_without_cache_is_fetch_failed_with_original_cause() {
        let dir = temp_cache_dir();
        let fetcher =
            CachedFetcher::new(Arc::new(FailingTransport), ResponseCache::new(&dir));

        let err = fetcher.fetch(&england_request()).await.unwrap_err();
        match err {
            DataError::FetchFailed { cause } => {
                assert!(matches!(*cause, DataError::Network(_)));
            }
            other => panic!("expected FetchFailed, got {other}"),
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn registry_drains_after_success_and_failure() {
        let dir = temp_cache_dir();
        let ok_fetcher = CachedFetcher::new(
            Arc::new(FixedTransport(b"{}".to_vec())),
            ResponseCache::new(&dir),
        );
        let _ = ok_fetcher.fetch(&england_request()).await;
        assert_eq!(ok_fetcher.in_flight(), 0);

        let err_fetcher =
            CachedFetcher::new(Arc::new(FailingTransport), ResponseCache::new(&dir));
        let _ = err_fetcher.fetch(&england_request()).await;
        assert_eq!(err_fetcher.in_flight(), 0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_fetches_are_registered_independently() {
        let dir = temp_cache_dir();
        let gate = Arc::new(Semaphore::new(0));
        let fetcher = Arc::new(CachedFetcher::new(
            Arc::new(GatedTransport {
                gate: Arc::clone(&gate),
            }),
            ResponseCache::new(&dir),
        ));

        let england = england_request();
        let wales = ApiRequest::for_area(API_ENDPOINT, &Area::Nation(Nation::Wales)).unwrap();

        let f1 = {
            let fetcher = Arc::clone(&fetcher);
            tokio::spawn(async move { fetcher.fetch(&england).await })
        };
        let f2 = {
            let fetcher = Arc::clone(&fetcher);
            tokio::spawn(async move { fetcher.fetch(&wales).await })
        };

        while fetcher.in_flight() < 2 {
            tokio::task::yield_now().await;
        }

        gate.add_permits(2);
        assert!(f1.await.unwrap().is_ok());
        assert!(f2.await.unwrap().is_ok());
        assert_eq!(fetcher.in_flight(), 0);

        let _ = fs::remove_dir_all(&dir);
    }
}
