// ABOUTME: Read-only service for reference tables that never change after seeding
// ABOUTME: Every read is cache-first against the eternal cache; misses load once
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Pure Reference Service
//!
//! Read path for immutable lookup tables: guard the input, probe the eternal
//! cache, and only on a miss open a read-only repository scope. Loaded values
//! are cached under the 365-day TTL; Empty and not-found results are returned
//! but never cached, so a later seed run becomes visible without any flush.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::cache::keys;
use crate::cache::{CacheResult, EternalCacheService};
use crate::errors::{ServiceError, ServiceResult};
use crate::models::entities::ReferenceEntity;
use crate::models::ids::ReferenceId;
use crate::models::EmptyValue;
use crate::repositories::{ReadOnlyUnitOfWork, ReferenceRepository, UnitOfWorkProvider};
use crate::services::{internal_failure, ReferenceTable, TableId};
use crate::validation::ServiceValidate;

/// Cache-first read service over one immutable reference table
///
/// Generic over the table binding `T`, the unit-of-work provider `P`, and the
/// eternal cache `C`. There is deliberately no write surface: these tables
/// change only through seed migrations, which restart the process.
pub struct PureReferenceService<T, P, C> {
    provider: Arc<P>,
    cache: Arc<C>,
    _table: PhantomData<fn() -> T>,
}

impl<T, P, C> PureReferenceService<T, P, C>
where
    T: ReferenceTable,
    P: UnitOfWorkProvider,
    P::Repository: ReferenceRepository<Entity = T::Entity>,
    C: EternalCacheService,
{
    /// Create a service over the given provider and eternal cache
    pub fn new(provider: Arc<P>, cache: Arc<C>) -> Self {
        Self {
            provider,
            cache,
            _table: PhantomData,
        }
    }

    /// All active rows, ordered by display order
    ///
    /// An empty table is a valid success with an empty list; it is not cached,
    /// so freshly seeded rows show up on the next call.
    pub async fn get_all_active(&self) -> ServiceResult<Vec<T::Dto>> {
        let key = keys::get_all_key(T::TABLE);
        match self.cache.get::<Vec<T::Dto>>(&key).await {
            Ok(CacheResult::Hit(dtos)) => {
                tracing::debug!(table = T::TABLE, "GetAll served from cache");
                ServiceResult::success(dtos)
            }
            Ok(CacheResult::Miss) => self.load_all(&key).await,
            Err(err) => internal_failure(T::TABLE, "load", &err),
        }
    }

    /// One active row by id
    ///
    /// An Empty id fails with `InvalidFormat` before any cache or repository
    /// access. A well-formed id with no active row fails with `NotFound`.
    pub async fn get_by_id(&self, id: TableId<T>) -> ServiceResult<T::Dto> {
        ServiceValidate::new()
            .ensure_not_empty(&id, invalid_id_message::<T>())
            .when_valid(|| async move {
                let key = keys::get_by_id_key(T::TABLE, id);
                match self.cache.get::<T::Dto>(&key).await {
                    Ok(CacheResult::Hit(dto)) => {
                        tracing::debug!(table = T::TABLE, %id, "GetById served from cache");
                        ServiceResult::success(dto)
                    }
                    Ok(CacheResult::Miss) => self.load_by_id(&key, id).await,
                    Err(err) => internal_failure(T::TABLE, "load", &err),
                }
            })
            .await
    }

    /// One active row by display value, case-insensitively
    ///
    /// Blank input fails with `ValidationFailed` before any I/O. The cache key
    /// lowercases the value, so differently-cased callers share one entry.
    pub async fn get_by_value(&self, value: &str) -> ServiceResult<T::Dto> {
        ServiceValidate::new()
            .ensure_not_whitespace(value, format!("{} value cannot be empty", T::ENTITY))
            .when_valid(|| async move {
                let key = keys::get_by_value_key(T::TABLE, value);
                match self.cache.get::<T::Dto>(&key).await {
                    Ok(CacheResult::Hit(dto)) => {
                        tracing::debug!(table = T::TABLE, value, "GetByValue served from cache");
                        ServiceResult::success(dto)
                    }
                    Ok(CacheResult::Miss) => self.load_by_value(&key, value).await,
                    Err(err) => internal_failure(T::TABLE, "load", &err),
                }
            })
            .await
    }

    /// One active row by lookup code, case-insensitively
    ///
    /// Only tables that carry codes (execution protocols) resolve anything
    /// here; on other tables every lookup is `NotFound`. Blank input fails
    /// with `ValidationFailed` before any I/O.
    pub async fn get_by_code(&self, code: &str) -> ServiceResult<T::Dto> {
        ServiceValidate::new()
            .ensure_not_whitespace(code, format!("{} code cannot be empty", T::ENTITY))
            .when_valid(|| async move {
                let key = keys::get_by_code_key(T::TABLE, code);
                match self.cache.get::<T::Dto>(&key).await {
                    Ok(CacheResult::Hit(dto)) => {
                        tracing::debug!(table = T::TABLE, code, "GetByCode served from cache");
                        ServiceResult::success(dto)
                    }
                    Ok(CacheResult::Miss) => self.load_by_code(&key, code).await,
                    Err(err) => internal_failure(T::TABLE, "load", &err),
                }
            })
            .await
    }

    /// Whether an active row with this id exists
    ///
    /// Rides the `get_by_id` cache path, so repeated existence checks for the
    /// same id cost one repository read at most.
    pub async fn exists(&self, id: TableId<T>) -> ServiceResult<bool> {
        if EmptyValue::is_empty(&id) {
            return ServiceResult::success(false);
        }
        let result = self.get_by_id(id).await;
        ServiceResult::success(result.is_success() && !result.data().is_empty())
    }

    async fn load_all(&self, key: &str) -> ServiceResult<Vec<T::Dto>> {
        let uow = match self.provider.create_read_only().await {
            Ok(uow) => uow,
            Err(err) => return internal_failure(T::TABLE, "load", &err),
        };
        let mut entities = match uow.repository().get_all_active().await {
            Ok(entities) => entities,
            Err(err) => return internal_failure(T::TABLE, "load", &err),
        };
        entities.sort_by_key(ReferenceEntity::display_order);
        let dtos: Vec<T::Dto> = entities.iter().map(T::to_dto).collect();
        if dtos.is_empty() {
            return ServiceResult::success(dtos);
        }
        if let Err(err) = self.cache.set(key, &dtos).await {
            tracing::warn!(table = T::TABLE, error = %err, "failed to cache GetAll result");
        }
        ServiceResult::success(dtos)
    }

    async fn load_by_id(&self, key: &str, id: TableId<T>) -> ServiceResult<T::Dto> {
        let uow = match self.provider.create_read_only().await {
            Ok(uow) => uow,
            Err(err) => return internal_failure(T::TABLE, "load", &err),
        };
        let entity = match uow.repository().get_by_id(id).await {
            Ok(entity) => entity,
            Err(err) => return internal_failure(T::TABLE, "load", &err),
        };
        self.cache_or_not_found(key, &entity, || {
            ServiceError::not_found_with_id(T::ENTITY, id.to_string())
        })
        .await
    }

    async fn load_by_value(&self, key: &str, value: &str) -> ServiceResult<T::Dto> {
        let uow = match self.provider.create_read_only().await {
            Ok(uow) => uow,
            Err(err) => return internal_failure(T::TABLE, "load", &err),
        };
        let entity = match uow.repository().get_by_value(value).await {
            Ok(entity) => entity,
            Err(err) => return internal_failure(T::TABLE, "load", &err),
        };
        self.cache_or_not_found(key, &entity, || {
            ServiceError::not_found_with_id(T::ENTITY, value)
        })
        .await
    }

    async fn load_by_code(&self, key: &str, code: &str) -> ServiceResult<T::Dto> {
        let uow = match self.provider.create_read_only().await {
            Ok(uow) => uow,
            Err(err) => return internal_failure(T::TABLE, "load", &err),
        };
        let entity = match uow.repository().get_by_code(code).await {
            Ok(entity) => entity,
            Err(err) => return internal_failure(T::TABLE, "load", &err),
        };
        self.cache_or_not_found(key, &entity, || {
            ServiceError::not_found_with_id(T::ENTITY, code)
        })
        .await
    }

    /// Cache and return a live entity; turn Empty or inactive into `NotFound`
    /// without caching, so the negative result stays re-checkable.
    async fn cache_or_not_found(
        &self,
        key: &str,
        entity: &T::Entity,
        not_found: impl FnOnce() -> ServiceError,
    ) -> ServiceResult<T::Dto> {
        if entity.is_empty() || !entity.is_active() {
            return ServiceResult::failure(T::Dto::empty(), not_found());
        }
        let dto = T::to_dto(entity);
        if let Err(err) = self.cache.set(key, &dto).await {
            tracing::warn!(table = T::TABLE, error = %err, "failed to cache lookup result");
        }
        ServiceResult::success(dto)
    }
}

/// "Invalid BodyPart id format. Expected: bodypart-<uuid>"
pub(crate) fn invalid_id_message<T: ReferenceTable>() -> String {
    format!(
        "Invalid {} id format. Expected: {}-<uuid>",
        T::ENTITY,
        <TableId<T> as ReferenceId>::PREFIX
    )
}
