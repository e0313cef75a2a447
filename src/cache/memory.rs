// ABOUTME: In-memory cache with LRU eviction, TTL entries, and background cleanup
// ABOUTME: One store serves both the TTL cache and the eternal cache contracts
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use super::{CacheConfig, CacheResult, CacheService, EternalCacheService, ETERNAL_TTL};
use crate::errors::CacheError;

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn remaining_ttl(&self) -> Option<Duration> {
        self.expires_at.checked_duration_since(Instant::now())
    }
}

/// In-memory cache with LRU eviction and optional background cleanup
///
/// Values are stored as JSON bytes under string keys. The `Arc<RwLock<..>>`
/// is shared with the cleanup task, which sweeps expired entries on an
/// interval until the shutdown channel closes. `LruCache` bounds capacity,
/// so a hot store evicts the least recently read keys first.
///
/// Implements both [`CacheService`] (caller TTL) and [`EternalCacheService`]
/// (fixed 365-day TTL) over the same storage.
#[derive(Clone)]
pub struct InMemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
    shutdown_tx: Option<Arc<tokio::sync::mpsc::Sender<()>>>,
}

impl InMemoryCache {
    /// Fallback capacity when config specifies zero entries
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a cache, spawning the cleanup task when configured
    ///
    /// Must be called within a tokio runtime when
    /// `config.enable_background_cleanup` is set.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        let store = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = if config.enable_background_cleanup {
            let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
            let store_clone = store.clone();
            let cleanup_interval = config.cleanup_interval;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::cleanup_expired(&store_clone).await;
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::debug!("cache cleanup task received shutdown signal");
                            break;
                        }
                    }
                }
            });

            Some(Arc::new(shutdown_tx))
        } else {
            None
        };

        Self { store, shutdown_tx }
    }

    /// Remove all expired entries
    async fn cleanup_expired(store: &Arc<RwLock<LruCache<String, CacheEntry>>>) {
        let mut store_guard = store.write().await;

        // Collect first; the store cannot be mutated while iterating.
        let expired_keys: Vec<String> = store_guard
            .iter()
            .filter_map(|(k, v)| v.is_expired().then(|| k.clone()))
            .collect();

        for key in &expired_keys {
            store_guard.pop(key);
        }

        let removed = expired_keys.len();
        drop(store_guard);
        if removed > 0 {
            tracing::debug!("cleaned up {removed} expired cache entries");
        }
    }

    async fn read_bytes(&self, key: &str) -> Option<Vec<u8>> {
        let mut store = self.store.write().await;

        // LruCache::get is mutable (updates access order)
        if let Some(entry) = store.get(key) {
            if entry.is_expired() {
                store.pop(key);
                return None;
            }
            return Some(entry.data.clone());
        }
        None
    }

    async fn write_bytes(&self, key: &str, data: Vec<u8>, ttl: Duration) {
        let entry = CacheEntry::new(data, ttl);
        // LruCache evicts automatically on push
        self.store.write().await.push(key.to_owned(), entry);
    }

    /// Whether a live (non-expired) entry exists for `key`
    pub async fn exists(&self, key: &str) -> bool {
        self.read_bytes(key).await.is_some()
    }

    /// Remaining TTL of a live entry, `None` when absent or expired
    pub async fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let store = self.store.write().await;
        // peek avoids disturbing LRU order
        store.peek(key).and_then(CacheEntry::remaining_ttl)
    }

    /// Drop every entry (testing/admin)
    pub async fn clear_all(&self) {
        self.store.write().await.clear();
    }
}

#[async_trait::async_trait]
impl CacheService for InMemoryCache {
    async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned + Send,
    {
        match self.read_bytes(key).await {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), CacheError>
    where
        T: Serialize + Send + Sync,
    {
        let serialized = serde_json::to_vec(value)?;
        self.write_bytes(key, serialized, ttl).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.pop(key);
        Ok(())
    }

    async fn remove_by_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        // A trailing `*` is optional: "Equipment:" and "Equipment:*" both
        // mean "every key starting with Equipment:". Patterns carrying other
        // glob metacharacters get full glob matching.
        let prefix = pattern.strip_suffix('*').unwrap_or(pattern);
        let glob_pattern = if prefix.contains(['*', '?', '[']) {
            Some(
                glob::Pattern::new(pattern).map_err(|e| CacheError::InvalidPattern {
                    pattern: pattern.to_owned(),
                    message: e.to_string(),
                })?,
            )
        } else {
            None
        };

        let mut store = self.store.write().await;

        let keys_to_remove: Vec<String> = store
            .iter()
            .filter_map(|(k, _)| {
                let matched = glob_pattern
                    .as_ref()
                    .map_or_else(|| k.starts_with(prefix), |p| p.matches(k));
                matched.then(|| k.clone())
            })
            .collect();

        for key in &keys_to_remove {
            store.pop(key);
        }

        let removed = keys_to_remove.len() as u64;
        drop(store);
        if removed > 0 {
            tracing::debug!("removed {removed} cache entries matching '{pattern}'");
        }
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl EternalCacheService for InMemoryCache {
    async fn get<T>(&self, key: &str) -> Result<CacheResult<T>, CacheError>
    where
        T: DeserializeOwned + Send,
    {
        match self.read_bytes(key).await {
            Some(bytes) => Ok(CacheResult::Hit(serde_json::from_slice(&bytes)?)),
            None => Ok(CacheResult::Miss),
        }
    }

    async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize + Send + Sync,
    {
        let serialized = serde_json::to_vec(value)?;
        self.write_bytes(key, serialized, ETERNAL_TTL).await;
        Ok(())
    }
}

impl Drop for InMemoryCache {
    fn drop(&mut self) {
        // Signal the cleanup task; the channel being closed already is normal
        // when other clones are still alive.
        if let Some(tx) = &self.shutdown_tx {
            if let Err(e) = tx.try_send(()) {
                tracing::debug!(error = ?e, "cache shutdown signal send failed (channel likely closed)");
            }
        }
    }
}
