//! Response cache — the fallback store for failed live fetches.
//!
//! Layout: `{cache_dir}/request={key}/body.json` plus a `meta.json`
//! sidecar per entry.
//!
//! Features:
//! - Atomic writes (write to .tmp, rename into place)
//! - Integrity validation on load (body hash vs sidecar)
//! - Quarantine for corrupt entries ({filename}.quarantined)
//! - Metadata sidecar per request (url, area, hash, stored_at)
//!
//! The cache holds exactly one body per request identity — the most
//! recent successful response — and implements no freshness or TTL
//! logic: a fallback lookup returns whatever was stored last.

use super::error::DataError;
use super::govuk::ApiRequest;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata sidecar for a cached response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub url: String,
    pub area_name: String,
    pub body_bytes: usize,
    pub body_hash: String,
    pub stored_at: chrono::NaiveDateTime,
}

/// File-backed store of the last successful response per request.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    cache_dir: PathBuf,
}

impl ResponseCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Directory for a specific request: `{cache_dir}/request={key}/`
    fn entry_dir(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("request={key}"))
    }

    fn body_path(&self, key: &str) -> PathBuf {
        self.entry_dir(key).join("body.json")
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.entry_dir(key).join("meta.json")
    }

    /// Store a response body for a request, replacing any previous entry.
    ///
    /// Writes are atomic: write to .tmp then rename.
    pub fn store(&self, request: &ApiRequest, body: &[u8]) -> Result<(), DataError> {
        let key = request.cache_key();
        let dir = self.entry_dir(&key);
        fs::create_dir_all(&dir)
            .map_err(|e| DataError::Cache(format!("failed to create dir: {e}")))?;

        let body_path = self.body_path(&key);
        let tmp_path = body_path.with_extension("json.tmp");
        fs::write(&tmp_path, body).map_err(|e| DataError::Cache(format!("body write: {e}")))?;
        fs::rename(&tmp_path, &body_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::Cache(format!("atomic rename failed: {e}"))
        })?;

        let meta = CacheMeta {
            url: request.url().as_str().to_string(),
            area_name: request.area_name().to_string(),
            body_bytes: body.len(),
            body_hash: blake3::hash(body).to_hex().to_string(),
            stored_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::Cache(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(&key), meta_json)
            .map_err(|e| DataError::Cache(format!("meta write: {e}")))?;

        Ok(())
    }

    /// Load the stored body for a request, if one exists.
    ///
    /// A body whose hash no longer matches its sidecar is quarantined
    /// and reported as a miss.
    pub fn load(&self, request: &ApiRequest) -> Result<Vec<u8>, DataError> {
        let key = request.cache_key();
        let body_path = self.body_path(&key);
        if !body_path.exists() {
            return Err(DataError::CacheMiss { key });
        }

        let body =
            fs::read(&body_path).map_err(|e| DataError::Cache(format!("body read: {e}")))?;

        if let Some(meta) = self.meta(&key) {
            let hash = blake3::hash(&body).to_hex().to_string();
            if hash != meta.body_hash {
                let quarantine = body_path.with_extension("json.quarantined");
                eprintln!(
                    "WARNING: quarantining corrupt cache entry {}",
                    body_path.display()
                );
                let _ = fs::rename(&body_path, &quarantine);
                return Err(DataError::CacheMiss { key });
            }
        }

        Ok(body)
    }

    fn meta(&self, key: &str) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path(key)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Every stored entry, for status reporting.
    pub fn status(&self) -> Vec<CacheEntry> {
        let mut entries = Vec::new();
        let Ok(read_dir) = fs::read_dir(&self.cache_dir) else {
            return entries;
        };

        for entry in read_dir.flatten() {
            let name = entry.file_name();
            let Some(key) = name.to_str().and_then(|n| n.strip_prefix("request=")) else {
                continue;
            };
            let meta = self.meta(key);
            entries.push(CacheEntry {
                key: key.to_string(),
                area_name: meta.as_ref().map(|m| m.area_name.clone()),
                body_bytes: meta.as_ref().map(|m| m.body_bytes),
                stored_at: meta.as_ref().map(|m| m.stored_at),
            });
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// Remove every stored entry. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, DataError> {
        let read_dir = match fs::read_dir(&self.cache_dir) {
            Ok(rd) => rd,
            Err(_) => return Ok(0),
        };

        let mut removed = 0;
        for entry in read_dir.flatten() {
            let is_entry = entry
                .file_name()
                .to_str()
                .is_some_and(|n| n.starts_with("request="));
            if is_entry {
                fs::remove_dir_all(entry.path())
                    .map_err(|e| DataError::Cache(format!("remove entry: {e}")))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Cache status for a single stored request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub area_name: Option<String>,
    pub body_bytes: Option<usize>,
    pub stored_at: Option<chrono::NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::govuk::API_ENDPOINT;
    use crate::domain::{Area, Nation};
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_cache_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("covidlab_test_{}_{id}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn england_request() -> ApiRequest {
        ApiRequest::for_area(API_ENDPOINT, &Area::Nation(Nation::England)).unwrap()
    }

    #[test]
    fn store_and_load_roundtrip() {
        let dir = temp_cache_dir();
        let cache = ResponseCache::new(&dir);
        let request = england_request();

        cache.store(&request, b"{\"data\":[]}").unwrap();
        let body = cache.load(&request).unwrap();
        assert_eq!(body, b"{\"data\":[]}");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_without_entry_is_a_miss() {
        let dir = temp_cache_dir();
        let cache = ResponseCache::new(&dir);

        let result = cache.load(&england_request());
        assert!(matches!(result, Err(DataError::CacheMiss { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn store_replaces_previous_entry() {
        let dir = temp_cache_dir();
        let cache = ResponseCache::new(&dir);
        let request = england_request();

        cache.store(&request, b"old").unwrap();
        cache.store(&request, b"new").unwrap();
        assert_eq!(cache.load(&request).unwrap(), b"new");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn tampered_body_is_quarantined_and_missed() {
        let dir = temp_cache_dir();
        let cache = ResponseCache::new(&dir);
        let request = england_request();

        cache.store(&request, b"{\"data\":[]}").unwrap();
        let body_path = dir
            .join(format!("request={}", request.cache_key()))
            .join("body.json");
        fs::write(&body_path, b"garbage").unwrap();

        let result = cache.load(&request);
        assert!(matches!(result, Err(DataError::CacheMiss { .. })));
        assert!(!body_path.exists());
        assert!(body_path.with_extension("json.quarantined").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn status_lists_stored_entries() {
        let dir = temp_cache_dir();
        let cache = ResponseCache::new(&dir);
        let request = england_request();

        assert!(cache.status().is_empty());
        cache.store(&request, b"body").unwrap();

        let entries = cache.status();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].area_name.as_deref(), Some("england"));
        assert_eq!(entries[0].body_bytes, Some(4));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn clear_removes_all_entries() {
        let dir = temp_cache_dir();
        let cache = ResponseCache::new(&dir);

        cache.store(&england_request(), b"body").unwrap();
        let wales = ApiRequest::for_area(API_ENDPOINT, &Area::Nation(Nation::Wales)).unwrap();
        cache.store(&wales, b"body").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.status().is_empty());

        let _ = fs::remove_dir_all(&dir);
    }
}
