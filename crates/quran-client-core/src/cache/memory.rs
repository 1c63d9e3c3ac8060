use moka::future::Cache;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;

/// In-memory response cache using moka with entry-count eviction.
///
/// Concurrent lookups of the same missing key are coalesced into one fetch.
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<String, Arc<Value>>,
}

/// Outcome of a coalesced lookup
pub struct Lookup {
    pub value: Arc<Value>,
    /// True when this call ran the fetch and stored its result
    pub fetched: bool,
}

impl MemoryCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    /// Return the live entry for `key`, or run `fetch` and store its result.
    ///
    /// Failures are never stored.
    pub async fn get_or_try_insert<F>(&self, key: &str, fetch: F) -> Result<Lookup, Arc<Error>>
    where
        F: Future<Output = Result<Value, Error>>,
    {
        let entry = self
            .cache
            .entry_by_ref(key)
            .or_try_insert_with(async move { fetch.await.map(Arc::new) })
            .await?;

        Ok(Lookup {
            fetched: entry.is_fresh(),
            value: entry.into_value(),
        })
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}
