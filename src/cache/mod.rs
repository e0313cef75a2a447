// ABOUTME: Cache abstraction layer: TTL cache and eternal cache contracts
// ABOUTME: Pluggable backends; in-memory implementation lives in memory.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Cache Layer
//!
//! Two cache policies cover all reference data:
//!
//! - [`CacheService`]: caller-supplied TTL, for reference data that users can
//!   mutate (equipment). Misses surface as `None`.
//! - [`EternalCacheService`]: fixed 365-day TTL, for data that is immutable
//!   once created (workout states, metric types). Misses surface as a
//!   first-class [`CacheResult::Miss`] because consumers must branch on
//!   hit/miss explicitly, and "not found yet" must stay retryable:
//!   [`EternalCacheService::get_or_create_empty_aware`] never caches an empty
//!   factory result, so an entity created moments later is still observable.
//!
//! Both contracts are satisfied by [`memory::InMemoryCache`] over a single
//! store. Keys are plain strings built by [`keys`]; identical logical lookups
//! always produce byte-identical keys, which is what makes invalidation by
//! table prefix possible.

/// Deterministic cache key construction
pub mod keys;
/// In-memory cache implementation
pub mod memory;

pub use memory::InMemoryCache;

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CacheError;
use crate::models::EmptyValue;

/// Fixed TTL of the eternal cache: 365 days
pub const ETERNAL_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Default TTL for mutable reference data: 1 hour
pub const DEFAULT_REFERENCE_TTL: Duration = Duration::from_secs(60 * 60);

/// Default entry bound for the in-memory store
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Default background cleanup interval in seconds
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

/// Outcome of a single eternal-cache lookup
///
/// An explicit hit/miss wrapper rather than `Option` because eternal-cache
/// consumers branch on hit/miss as a first-class decision: a miss on the
/// eternal cache does not mean "does not exist", only "not cached yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheResult<T> {
    /// The key was present; carries the cached value
    Hit(T),
    /// The key was absent or expired
    Miss,
}

impl<T> CacheResult<T> {
    /// Wrap a cached value
    pub const fn hit(value: T) -> Self {
        Self::Hit(value)
    }

    /// The absent marker
    pub const fn miss() -> Self {
        Self::Miss
    }

    /// Whether the lookup hit
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// Whether the lookup missed
    pub const fn is_miss(&self) -> bool {
        matches!(self, Self::Miss)
    }

    /// Convert to `Option`, discarding the hit/miss distinction
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss => None,
        }
    }

    /// Map the cached value, preserving misses
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CacheResult<U> {
        match self {
            Self::Hit(value) => CacheResult::Hit(f(value)),
            Self::Miss => CacheResult::Miss,
        }
    }
}

impl<T: EmptyValue> CacheResult<T> {
    /// The cached value on hit, the type's Empty sentinel on miss
    pub fn into_value_or_empty(self) -> T {
        match self {
            Self::Hit(value) => value,
            Self::Miss => T::empty(),
        }
    }
}

/// TTL cache contract for mutable reference data
///
/// All operations are async and safe for concurrent invocation; individual
/// get/set operations are atomic, no cross-key transactions exist. Misses are
/// ordinary `Ok(None)` returns, never errors.
#[async_trait::async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieve a value, `None` on miss or natural expiry
    ///
    /// # Errors
    ///
    /// Returns an error only if a present entry fails to deserialize.
    async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned + Send;

    /// Store a value, overwriting any existing entry; TTL runs from now
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), CacheError>
    where
        T: Serialize + Send + Sync;

    /// Delete one entry; no-op when absent
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the operation.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Delete all entries whose key starts with the given prefix, returning
    /// the number removed
    ///
    /// A trailing `*` is optional: `"ReferenceTable:Equipment:"` and
    /// `"ReferenceTable:Equipment:*"` are equivalent. Patterns with other
    /// glob metacharacters are matched as full globs.
    ///
    /// # Errors
    ///
    /// Returns an error if a glob pattern does not parse.
    async fn remove_by_pattern(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Return the cached value, or invoke `factory` exactly once, store its
    /// result under `ttl`, and return it
    ///
    /// The factory must not run when a cached value exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or serialization fails.
    async fn get_or_create<T, F, Fut>(
        &self,
        key: &str,
        factory: F,
        ttl: Duration,
    ) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
    {
        if let Some(cached) = self.get::<T>(key).await? {
            return Ok(cached);
        }
        let value = factory().await;
        self.set(key, &value, ttl).await?;
        Ok(value)
    }
}

/// Eternal cache contract for reference data that never changes once created
///
/// No caller-supplied TTL: every write uses [`ETERNAL_TTL`]. Empty-awareness
/// is the load-bearing difference from [`CacheService`]: negative lookups are
/// never cached, so a concurrently-created entity stays observable.
#[async_trait::async_trait]
pub trait EternalCacheService: Send + Sync {
    /// Retrieve a value with an explicit hit/miss result
    ///
    /// # Errors
    ///
    /// Returns an error only if a present entry fails to deserialize.
    async fn get<T>(&self, key: &str) -> Result<CacheResult<T>, CacheError>
    where
        T: DeserializeOwned + Send;

    /// Store a value under the fixed 365-day TTL
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize + Send + Sync;

    /// The cached value on hit, the type's Empty sentinel on miss
    ///
    /// # Errors
    ///
    /// Returns an error only if a present entry fails to deserialize.
    async fn get_or_empty<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: EmptyValue + DeserializeOwned + Send,
    {
        Ok(self.get::<T>(key).await?.into_value_or_empty())
    }

    /// Return the cached value, or invoke `factory` once and cache its result
    /// only when non-empty
    ///
    /// An empty factory result is returned to the caller but deliberately not
    /// cached: caching it would poison the key for an entity that may be
    /// created concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or serialization fails.
    async fn get_or_create_empty_aware<T, F, Fut>(
        &self,
        key: &str,
        factory: F,
    ) -> Result<T, CacheError>
    where
        T: EmptyValue + Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
    {
        if let CacheResult::Hit(cached) = self.get::<T>(key).await? {
            return Ok(cached);
        }
        let value = factory().await;
        if !value.is_empty() {
            self.set(key, &value).await?;
        }
        Ok(value)
    }
}

/// Cache store configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries held by the in-memory store
    pub max_entries: usize,
    /// How often the background task sweeps expired entries
    pub cleanup_interval: Duration,
    /// Whether to spawn the background sweeper (disable in tests)
    pub enable_background_cleanup: bool,
    /// TTL handed to services that cache mutable reference data
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            default_ttl: DEFAULT_REFERENCE_TTL,
        }
    }
}

impl CacheConfig {
    /// Build configuration from environment variables, falling back to defaults
    ///
    /// Honors `CACHE_MAX_ENTRIES`, `CACHE_CLEANUP_INTERVAL_SECS`, and
    /// `CACHE_DEFAULT_TTL_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: std::env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_entries),
            cleanup_interval: std::env::var("CACHE_CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.cleanup_interval, Duration::from_secs),
            enable_background_cleanup: defaults.enable_background_cleanup,
            default_ttl: std::env::var("CACHE_DEFAULT_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.default_ttl, Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_result_hit_and_miss() {
        let hit = CacheResult::hit(7);
        assert!(hit.is_hit());
        assert_eq!(hit.into_option(), Some(7));

        let miss: CacheResult<i32> = CacheResult::miss();
        assert!(miss.is_miss());
        assert_eq!(miss.into_option(), None);
    }

    #[test]
    fn cache_result_map_preserves_miss() {
        let doubled = CacheResult::hit(21).map(|v| v * 2);
        assert_eq!(doubled, CacheResult::Hit(42));

        let miss: CacheResult<i32> = CacheResult::Miss;
        assert_eq!(miss.map(|v| v * 2), CacheResult::Miss);
    }

    #[test]
    fn into_value_or_empty_yields_sentinel_on_miss() {
        let miss: CacheResult<Vec<u8>> = CacheResult::Miss;
        assert!(miss.into_value_or_empty().is_empty());
        assert_eq!(CacheResult::hit(vec![1u8]).into_value_or_empty(), vec![1u8]);
    }

    #[test]
    fn eternal_ttl_is_a_year() {
        assert_eq!(ETERNAL_TTL.as_secs(), 365 * 24 * 60 * 60);
    }
}
