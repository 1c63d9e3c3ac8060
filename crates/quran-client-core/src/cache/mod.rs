mod memory;
mod key;

pub use memory::{Lookup, MemoryCache};
pub use key::CacheKey;

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::CacheConfig;
use crate::error::{Error, Result};

/// Time-bounded cache of raw upstream payloads, owned by a client.
///
/// Cloning is cheap and clones share the same entries. A zero lifetime
/// disables storage: every lookup goes to the network.
#[derive(Clone)]
pub struct ResponseCache {
    memory: Option<MemoryCache>,
}

impl ResponseCache {
    /// Create a response cache from configuration
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_ttl(config.max_entries, config.ttl())
    }

    /// Create a response cache with an explicit entry lifetime
    pub fn with_ttl(max_entries: u64, ttl: Duration) -> Self {
        let memory = if ttl.is_zero() {
            None
        } else {
            Some(MemoryCache::new(max_entries, ttl))
        };

        Self { memory }
    }

    /// Serve `key` from cache while it is fresh, otherwise run `fetch`.
    ///
    /// A successful fetch is stored with a new capture time. A failed fetch
    /// leaves the slot untouched and its error is returned to every caller
    /// that was waiting on it.
    pub async fn get_or_fetch<F>(&self, key: &CacheKey, fetch: F) -> Result<Arc<Value>>
    where
        F: Future<Output = Result<Value>>,
    {
        let Some(ref memory) = self.memory else {
            debug!("Caching disabled, fetching {}", key);
            return fetch.await.map(Arc::new);
        };

        let lookup = memory
            .get_or_try_insert(key.as_str(), fetch)
            .await
            .map_err(Error::from_shared)?;

        if lookup.fetched {
            debug!("Cache miss for {}, stored fresh response", key);
        } else {
            debug!("Cache hit for {}", key);
        }

        Ok(lookup.value)
    }

    /// Drop every entry
    pub fn clear(&self) {
        if let Some(ref memory) = self.memory {
            memory.clear();
        }
    }

    /// Number of live entries
    pub async fn entry_count(&self) -> u64 {
        match self.memory {
            Some(ref memory) => memory.entry_count().await,
            None => 0,
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
