//! Caching layer for aviation API responses.
//!
//! Identical requests inside one TTL window are answered from memory. The
//! window is a time bucket (`unix_now / ttl`) folded into the cache key, so
//! entries are never expired explicitly: once the bucket advances, new
//! requests compute a new key and the old entry ages out of the LRU.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use lru::LruCache;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::aviation::{FlightTransport, Params, RawResponse, TransportError};

/// Default bucket width in seconds.
pub const DEFAULT_TTL_SECS: i64 = 60;

/// Default maximum number of cached responses.
pub const DEFAULT_MAX_CAPACITY: usize = 128;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Bucket width in seconds. Zero or negative disables caching.
    pub ttl_secs: i64,

    /// Maximum number of cached entries.
    pub max_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// Source of the current Unix time, in seconds.
pub trait Clock: Send + Sync {
    fn unix_now(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Canonical serialization of query parameters: compact JSON, keys sorted.
pub fn canonical_params(params: &Params) -> String {
    let object: serde_json::Map<String, Value> = params
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect();
    Value::Object(object).to_string()
}

/// Time bucket for `now`, or `None` when caching is disabled.
pub fn ttl_bucket(now_secs: u64, ttl_secs: i64) -> Option<u64> {
    let ttl = u64::try_from(ttl_secs).ok().filter(|&t| t > 0)?;
    Some(now_secs / ttl)
}

/// Cache key for a request: SHA-256 over endpoint, canonical params and bucket.
pub fn cache_key(endpoint: &str, params: &Params, bucket: u64) -> String {
    let raw = format!("{endpoint}:{}:{bucket}", canonical_params(params));
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// Memoizing wrapper around a [`FlightTransport`].
///
/// The store is safe to share between tasks. Two concurrent misses on the
/// same key both reach the transport; the later insert wins.
pub struct RequestCache<T> {
    transport: T,
    store: Mutex<LruCache<String, RawResponse>>,
    ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl<T: FlightTransport> RequestCache<T> {
    /// Create a new cache in front of `transport`, using wall-clock time.
    pub fn new(transport: T, config: &CacheConfig) -> Self {
        Self::with_clock(transport, config, Arc::new(SystemClock))
    }

    /// Create a new cache reading time from `clock`.
    pub fn with_clock(transport: T, config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(config.max_capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            transport,
            store: Mutex::new(LruCache::new(capacity)),
            ttl_secs: config.ttl_secs,
            clock,
        }
    }

    /// Return the memoized response for this request, fetching on a miss.
    ///
    /// Fails only if the transport call fails; failures are not cached.
    pub async fn get_or_fetch(
        &self,
        endpoint: &str,
        params: &Params,
    ) -> Result<RawResponse, TransportError> {
        let Some(bucket) = ttl_bucket(self.clock.unix_now(), self.ttl_secs) else {
            debug!(endpoint, "cache disabled, calling transport");
            return self.transport.call(endpoint, params).await;
        };

        let key = cache_key(endpoint, params, bucket);

        if let Some(hit) = self.lookup(&key) {
            debug!(endpoint, key = %key, "cache hit");
            return Ok(hit);
        }

        debug!(endpoint, key = %key, "cache miss");
        let response = self.transport.call(endpoint, params).await?;
        self.lock_store().put(key, response.clone());

        Ok(response)
    }

    /// Access the underlying transport for calls that bypass the cache.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn lookup(&self, key: &str) -> Option<RawResponse> {
        self.lock_store().get(key).cloned()
    }
}

impl<T> RequestCache<T> {
    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock_store().len()
    }

    /// Check if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock_store().is_empty()
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.lock_store().clear();
    }

    fn lock_store(&self) -> MutexGuard<'_, LruCache<String, RawResponse>> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}
