// ABOUTME: Shared test utilities: in-memory repository, fake unit-of-work provider
// ABOUTME: Counting cache wrapper and quiet logging setup for integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `fitref`
//!
//! Fakes for the repository and unit-of-work seams plus a call-counting cache
//! wrapper, so tests can assert not just what services return but what they
//! touched along the way.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use fitref::cache::memory::InMemoryCache;
use fitref::cache::{CacheConfig, CacheService};
use fitref::errors::{CacheError, RepositoryError};
use fitref::models::entities::ReferenceEntity;
use fitref::models::EmptyValue;
use fitref::repositories::{
    MutableReferenceRepository, ReadOnlyUnitOfWork, ReferenceRepository, UnitOfWorkProvider,
    WritableUnitOfWork,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// An in-memory cache with background cleanup off, so tests control time
pub fn test_cache() -> InMemoryCache {
    init_test_logging();
    InMemoryCache::new(&CacheConfig {
        enable_background_cleanup: false,
        ..CacheConfig::default()
    })
}

/// Per-method call counters for [`InMemoryRepository`]
#[derive(Debug, Default)]
pub struct CallCounts {
    pub get_by_id: AtomicUsize,
    pub get_by_value: AtomicUsize,
    pub get_by_code: AtomicUsize,
    pub get_all_active: AtomicUsize,
    pub exists: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
}

/// Vec-backed repository; both unit-of-work scopes hand out this type
///
/// A read-only scope's repository views the shared rows directly. A writable
/// scope's repository views a staged copy that only reaches the shared rows on
/// commit, so a dropped scope persists nothing.
#[derive(Debug, Clone)]
pub struct InMemoryRepository<E: ReferenceEntity> {
    rows: Arc<Mutex<Vec<E>>>,
    in_use_ids: Arc<Mutex<HashSet<E::Id>>>,
    pub calls: Arc<CallCounts>,
}

#[async_trait]
impl<E: ReferenceEntity> ReferenceRepository for InMemoryRepository<E> {
    type Entity = E;

    async fn get_by_id(&self, id: E::Id) -> Result<E, RepositoryError> {
        self.calls.get_by_id.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|row| row.id() == id)
            .cloned()
            .unwrap_or_else(E::empty))
    }

    async fn get_by_value(&self, value: &str) -> Result<E, RepositoryError> {
        self.calls.get_by_value.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|row| row.value().eq_ignore_ascii_case(value))
            .cloned()
            .unwrap_or_else(E::empty))
    }

    async fn get_by_code(&self, code: &str) -> Result<E, RepositoryError> {
        self.calls.get_by_code.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|row| row.code().is_some_and(|c| c.eq_ignore_ascii_case(code)))
            .cloned()
            .unwrap_or_else(E::empty))
    }

    async fn get_all_active(&self) -> Result<Vec<E>, RepositoryError> {
        self.calls.get_all_active.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|row| row.is_active()).cloned().collect())
    }

    async fn exists(&self, id: E::Id) -> Result<bool, RepositoryError> {
        self.calls.exists.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().any(|row| row.id() == id && row.is_active()))
    }
}

#[async_trait]
impl<E: ReferenceEntity> MutableReferenceRepository for InMemoryRepository<E> {
    async fn create(&mut self, entity: E) -> Result<E, RepositoryError> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(entity.clone());
        Ok(entity)
    }

    async fn update(&mut self, entity: E) -> Result<E, RepositoryError> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|row| row.id() == entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(entity)
            }
            None => Err(RepositoryError::Storage(format!(
                "no row with id {}",
                entity.id()
            ))),
        }
    }

    async fn delete(&mut self, id: E::Id) -> Result<bool, RepositoryError> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok(rows.len() < before)
    }

    async fn deactivate(&mut self, id: E::Id) -> Result<bool, RepositoryError> {
        // tests drive hard deletes; soft delete is not modeled by the Vec fake
        let _ = id;
        Ok(false)
    }

    async fn exists_by_value(
        &self,
        value: &str,
        exclude: Option<E::Id>,
    ) -> Result<bool, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().any(|row| {
            row.is_active()
                && row.value().eq_ignore_ascii_case(value)
                && exclude != Some(row.id())
        }))
    }

    async fn in_use(&self, id: E::Id) -> Result<bool, RepositoryError> {
        Ok(self.in_use_ids.lock().unwrap().contains(&id))
    }
}

/// Read-only scope over the shared rows
pub struct FakeReadOnly<E: ReferenceEntity> {
    repo: InMemoryRepository<E>,
}

impl<E: ReferenceEntity> ReadOnlyUnitOfWork for FakeReadOnly<E> {
    type Repository = InMemoryRepository<E>;

    fn repository(&self) -> &Self::Repository {
        &self.repo
    }
}

/// Writable scope over a staged copy; commit writes the copy back
pub struct FakeWritable<E: ReferenceEntity> {
    repo: InMemoryRepository<E>,
    shared: Arc<Mutex<Vec<E>>>,
    commits: Arc<AtomicUsize>,
}

#[async_trait]
impl<E: ReferenceEntity> WritableUnitOfWork for FakeWritable<E> {
    type Repository = InMemoryRepository<E>;

    fn repository(&mut self) -> &mut Self::Repository {
        &mut self.repo
    }

    async fn commit(self) -> Result<(), RepositoryError> {
        let staged = self.repo.rows.lock().unwrap().clone();
        *self.shared.lock().unwrap() = staged;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Unit-of-work provider over an in-memory table, with scope counters
pub struct FakeProvider<E: ReferenceEntity> {
    rows: Arc<Mutex<Vec<E>>>,
    in_use_ids: Arc<Mutex<HashSet<E::Id>>>,
    pub calls: Arc<CallCounts>,
    pub read_only_scopes: AtomicUsize,
    pub writable_scopes: AtomicUsize,
    pub commits: Arc<AtomicUsize>,
}

impl<E: ReferenceEntity> FakeProvider<E> {
    pub fn new(rows: Vec<E>) -> Self {
        init_test_logging();
        Self {
            rows: Arc::new(Mutex::new(rows)),
            in_use_ids: Arc::new(Mutex::new(HashSet::new())),
            calls: Arc::new(CallCounts::default()),
            read_only_scopes: AtomicUsize::new(0),
            writable_scopes: AtomicUsize::new(0),
            commits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mark a row as referenced by other data, blocking hard deletes
    pub fn mark_in_use(&self, id: E::Id) {
        self.in_use_ids.lock().unwrap().insert(id);
    }

    /// Snapshot of the committed rows
    pub fn rows(&self) -> Vec<E> {
        self.rows.lock().unwrap().clone()
    }

    pub fn read_only_count(&self) -> usize {
        self.read_only_scopes.load(Ordering::SeqCst)
    }

    pub fn writable_count(&self) -> usize {
        self.writable_scopes.load(Ordering::SeqCst)
    }

    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<E: ReferenceEntity> UnitOfWorkProvider for FakeProvider<E> {
    type Repository = InMemoryRepository<E>;
    type ReadOnly = FakeReadOnly<E>;
    type Writable = FakeWritable<E>;

    async fn create_read_only(&self) -> Result<Self::ReadOnly, RepositoryError> {
        self.read_only_scopes.fetch_add(1, Ordering::SeqCst);
        Ok(FakeReadOnly {
            repo: InMemoryRepository {
                rows: self.rows.clone(),
                in_use_ids: self.in_use_ids.clone(),
                calls: self.calls.clone(),
            },
        })
    }

    async fn create_writable(&self) -> Result<Self::Writable, RepositoryError> {
        self.writable_scopes.fetch_add(1, Ordering::SeqCst);
        let staged = self.rows.lock().unwrap().clone();
        Ok(FakeWritable {
            repo: InMemoryRepository {
                rows: Arc::new(Mutex::new(staged)),
                in_use_ids: self.in_use_ids.clone(),
                calls: self.calls.clone(),
            },
            shared: self.rows.clone(),
            commits: self.commits.clone(),
        })
    }
}

/// Provider standing in for an unreachable store: every scope request fails
pub struct UnreachableProvider<E: ReferenceEntity> {
    _entity: std::marker::PhantomData<fn() -> E>,
}

impl<E: ReferenceEntity> UnreachableProvider<E> {
    pub fn new() -> Self {
        init_test_logging();
        Self {
            _entity: std::marker::PhantomData,
        }
    }
}

impl<E: ReferenceEntity> Default for UnreachableProvider<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: ReferenceEntity> UnitOfWorkProvider for UnreachableProvider<E> {
    type Repository = InMemoryRepository<E>;
    type ReadOnly = FakeReadOnly<E>;
    type Writable = FakeWritable<E>;

    async fn create_read_only(&self) -> Result<Self::ReadOnly, RepositoryError> {
        Err(RepositoryError::Storage("connection refused".into()))
    }

    async fn create_writable(&self) -> Result<Self::Writable, RepositoryError> {
        Err(RepositoryError::Storage("connection refused".into()))
    }
}

/// [`CacheService`] wrapper that counts pattern invalidations and sets
pub struct CountingCache {
    inner: InMemoryCache,
    pub sets: AtomicUsize,
    pub pattern_removals: AtomicUsize,
}

impl CountingCache {
    pub fn new() -> Self {
        Self {
            inner: test_cache(),
            sets: AtomicUsize::new(0),
            pattern_removals: AtomicUsize::new(0),
        }
    }

    pub fn pattern_removal_count(&self) -> usize {
        self.pattern_removals.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

impl Default for CountingCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for CountingCache {
    async fn get<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned + Send,
    {
        self.inner.get(key).await
    }

    async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), CacheError>
    where
        T: Serialize + Send + Sync,
    {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value, ttl).await
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.inner.remove(key).await
    }

    async fn remove_by_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        self.pattern_removals.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_by_pattern(pattern).await
    }
}
