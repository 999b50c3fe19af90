use std::hash::Hash;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

/// Bounds for a [`MemoryCache`]
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_capacity: u64,
    pub time_to_live: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            time_to_live: Duration::from_secs(30 * 24 * 60 * 60), // 30 days
        }
    }
}

impl CacheConfig {
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn with_time_to_live(mut self, time_to_live: Duration) -> Self {
        self.time_to_live = time_to_live;
        self
    }
}

/// Async in-memory cache with a capacity bound and per-entry TTL
#[derive(Clone)]
pub struct MemoryCache<K, V> {
    inner: MokaCache<K, V>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            inner: MokaCache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(config.time_to_live)
                .build(),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let value = self.inner.get(key).await;
        debug!(hit = value.is_some(), "Cache lookup");
        value
    }

    pub async fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value).await;
    }

    /// Insert many entries, e.g. when warming from a file
    pub async fn extend(&self, entries: impl IntoIterator<Item = (K, V)>) {
        for (key, value) in entries {
            self.inner.insert(key, value).await;
        }
    }

    pub async fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    /// Exact once pending maintenance has run; see [`MemoryCache::sync`]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Snapshot of every live entry
    pub fn entries(&self) -> Vec<(K, V)> {
        self.inner
            .iter()
            .map(|(k, v)| (k.as_ref().clone(), v))
            .collect()
    }
}
