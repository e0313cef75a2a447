// ABOUTME: CRUD service for reference tables users can edit, fronted by the TTL cache
// ABOUTME: Writes run validate -> writable scope -> commit -> invalidate table prefix
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Enhanced Reference Service
//!
//! Extends the cache-first read path with create, update, and delete. Reads use
//! the TTL cache instead of the eternal one; every committed write removes the
//! table's whole cache-key prefix in one pattern invalidation, so the next read
//! repopulates from storage. Uniqueness is checked on a read-only scope before
//! any writable scope opens, and a scope dropped without commit persists
//! nothing.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::keys;
use crate::cache::{CacheService, DEFAULT_REFERENCE_TTL};
use crate::errors::{ServiceError, ServiceResult};
use crate::models::entities::ReferenceEntity;
use crate::models::EmptyValue;
use crate::repositories::{
    MutableReferenceRepository, ReadOnlyUnitOfWork, ReferenceRepository, UnitOfWorkProvider,
    WritableUnitOfWork,
};
use crate::services::pure::invalid_id_message;
use crate::services::{internal_failure, ReferenceTable, TableId};
use crate::validation::ServiceValidate;

/// Extends [`ReferenceTable`] with entity construction for the write path
pub trait MutableReferenceTable: ReferenceTable {
    /// What references rows of this table; used in delete-conflict messages
    const DEPENDENT: &'static str = "other records";

    /// Build a fresh entity from a create command (value already trimmed)
    fn new_entity(command: &CreateReferenceCommand) -> Self::Entity;

    /// Apply an update command to an existing entity (value already trimmed)
    fn apply_update(existing: Self::Entity, command: &UpdateReferenceCommand) -> Self::Entity;
}

/// Input for creating a reference row
#[derive(Debug, Clone)]
pub struct CreateReferenceCommand {
    /// Display value; trimmed by the service before validation
    pub value: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Sort position for list endpoints
    pub display_order: i32,
}

/// Input for renaming or re-describing a reference row
#[derive(Debug, Clone)]
pub struct UpdateReferenceCommand {
    /// New display value; trimmed by the service before validation
    pub value: String,
    /// New description, replacing the old one
    pub description: Option<String>,
}

/// Cache-fronted CRUD service over one editable reference table
pub struct EnhancedReferenceService<T, P, C> {
    provider: Arc<P>,
    cache: Arc<C>,
    ttl: Duration,
    _table: PhantomData<fn() -> T>,
}

impl<T, P, C> EnhancedReferenceService<T, P, C>
where
    T: MutableReferenceTable,
    P: UnitOfWorkProvider,
    P::Repository: MutableReferenceRepository<Entity = T::Entity>,
    C: CacheService,
{
    /// Create a service with the default one-hour read TTL
    pub fn new(provider: Arc<P>, cache: Arc<C>) -> Self {
        Self::with_ttl(provider, cache, DEFAULT_REFERENCE_TTL)
    }

    /// Create a service with an explicit read TTL
    pub fn with_ttl(provider: Arc<P>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            provider,
            cache,
            ttl,
            _table: PhantomData,
        }
    }

    /// All active rows, ordered by display order
    pub async fn get_all_active(&self) -> ServiceResult<Vec<T::Dto>> {
        let key = keys::get_all_key(T::TABLE);
        match self.cache.get::<Vec<T::Dto>>(&key).await {
            Ok(Some(dtos)) => {
                tracing::debug!(table = T::TABLE, "GetAll served from cache");
                ServiceResult::success(dtos)
            }
            Ok(None) => self.load_all(&key).await,
            Err(err) => internal_failure(T::TABLE, "load", &err),
        }
    }

    /// One active row by id; `InvalidFormat` on an Empty id, `NotFound` when
    /// no active row matches
    pub async fn get_by_id(&self, id: TableId<T>) -> ServiceResult<T::Dto> {
        ServiceValidate::new()
            .ensure_not_empty(&id, invalid_id_message::<T>())
            .when_valid(|| async move {
                let key = keys::get_by_id_key(T::TABLE, id);
                match self.cache.get::<T::Dto>(&key).await {
                    Ok(Some(dto)) => {
                        tracing::debug!(table = T::TABLE, %id, "GetById served from cache");
                        ServiceResult::success(dto)
                    }
                    Ok(None) => self.load_by_id(&key, id).await,
                    Err(err) => internal_failure(T::TABLE, "load", &err),
                }
            })
            .await
    }

    /// One active row by display value, case-insensitively
    pub async fn get_by_value(&self, value: &str) -> ServiceResult<T::Dto> {
        ServiceValidate::new()
            .ensure_not_whitespace(value, format!("{} value cannot be empty", T::ENTITY))
            .when_valid(|| async move {
                let key = keys::get_by_value_key(T::TABLE, value);
                match self.cache.get::<T::Dto>(&key).await {
                    Ok(Some(dto)) => {
                        tracing::debug!(table = T::TABLE, value, "GetByValue served from cache");
                        ServiceResult::success(dto)
                    }
                    Ok(None) => self.load_by_value(&key, value).await,
                    Err(err) => internal_failure(T::TABLE, "load", &err),
                }
            })
            .await
    }

    /// Whether an active row with this id exists; rides the `get_by_id` cache
    pub async fn exists(&self, id: TableId<T>) -> ServiceResult<bool> {
        if EmptyValue::is_empty(&id) {
            return ServiceResult::success(false);
        }
        let result = self.get_by_id(id).await;
        ServiceResult::success(result.is_success() && !result.data().is_empty())
    }

    /// Create a row; fails with `AlreadyExists` when an active row already
    /// carries the same value (case-insensitively)
    ///
    /// The uniqueness probe runs on a read-only scope, so a duplicate never
    /// opens a writable scope at all.
    pub async fn create(&self, command: CreateReferenceCommand) -> ServiceResult<T::Dto> {
        let command = CreateReferenceCommand {
            value: command.value.trim().to_owned(),
            ..command
        };
        ServiceValidate::new()
            .ensure_not_whitespace(
                &command.value,
                format!("{} value cannot be empty", T::ENTITY),
            )
            .when_valid(|| self.perform_create(&command))
            .await
    }

    /// Rename or re-describe a row
    ///
    /// Uniqueness excludes the row itself, so renaming "Barbell" to "Barbell"
    /// succeeds while renaming it onto another row's value fails.
    pub async fn update(
        &self,
        id: TableId<T>,
        command: UpdateReferenceCommand,
    ) -> ServiceResult<T::Dto> {
        let command = UpdateReferenceCommand {
            value: command.value.trim().to_owned(),
            ..command
        };
        ServiceValidate::new()
            .ensure_not_empty(&id, invalid_id_message::<T>())
            .ensure_not_whitespace(
                &command.value,
                format!("{} value cannot be empty", T::ENTITY),
            )
            .when_valid(|| self.perform_update(id, &command))
            .await
    }

    /// Hard-delete a row; fails with `NotFound` when absent and with
    /// `DependencyExists` while anything still references it
    pub async fn delete(&self, id: TableId<T>) -> ServiceResult<bool> {
        ServiceValidate::new()
            .ensure_not_empty(&id, invalid_id_message::<T>())
            .when_valid(|| self.perform_delete(id))
            .await
    }

    async fn perform_create(&self, command: &CreateReferenceCommand) -> ServiceResult<T::Dto> {
        let uow = match self.provider.create_read_only().await {
            Ok(uow) => uow,
            Err(err) => return internal_failure(T::TABLE, "create", &err),
        };
        match uow.repository().exists_by_value(&command.value, None).await {
            Ok(true) => {
                return ServiceResult::failure(
                    T::Dto::empty(),
                    ServiceError::already_exists(T::ENTITY, &command.value),
                );
            }
            Ok(false) => {}
            Err(err) => return internal_failure(T::TABLE, "create", &err),
        }
        drop(uow);

        let mut uow = match self.provider.create_writable().await {
            Ok(uow) => uow,
            Err(err) => return internal_failure(T::TABLE, "create", &err),
        };
        let created = match uow.repository().create(T::new_entity(command)).await {
            Ok(created) => created,
            Err(err) => return internal_failure(T::TABLE, "create", &err),
        };
        if let Err(err) = uow.commit().await {
            return internal_failure(T::TABLE, "create", &err);
        }
        self.invalidate_table().await;
        tracing::info!(table = T::TABLE, id = %created.id(), value = %command.value, "created");
        ServiceResult::success(T::to_dto(&created))
    }

    async fn perform_update(
        &self,
        id: TableId<T>,
        command: &UpdateReferenceCommand,
    ) -> ServiceResult<T::Dto> {
        let uow = match self.provider.create_read_only().await {
            Ok(uow) => uow,
            Err(err) => return internal_failure(T::TABLE, "update", &err),
        };
        match uow
            .repository()
            .exists_by_value(&command.value, Some(id))
            .await
        {
            Ok(true) => {
                return ServiceResult::failure(
                    T::Dto::empty(),
                    ServiceError::already_exists(T::ENTITY, &command.value),
                );
            }
            Ok(false) => {}
            Err(err) => return internal_failure(T::TABLE, "update", &err),
        }
        drop(uow);

        let mut uow = match self.provider.create_writable().await {
            Ok(uow) => uow,
            Err(err) => return internal_failure(T::TABLE, "update", &err),
        };
        let existing = match uow.repository().get_by_id(id).await {
            Ok(existing) => existing,
            Err(err) => return internal_failure(T::TABLE, "update", &err),
        };
        if existing.is_empty() || !existing.is_active() {
            // dropped uncommitted; nothing was written
            return ServiceResult::failure(
                T::Dto::empty(),
                ServiceError::not_found_with_id(T::ENTITY, id.to_string()),
            );
        }
        let updated = match uow
            .repository()
            .update(T::apply_update(existing, command))
            .await
        {
            Ok(updated) => updated,
            Err(err) => return internal_failure(T::TABLE, "update", &err),
        };
        if let Err(err) = uow.commit().await {
            return internal_failure(T::TABLE, "update", &err);
        }
        self.invalidate_table().await;
        tracing::info!(table = T::TABLE, %id, value = %command.value, "updated");
        ServiceResult::success(T::to_dto(&updated))
    }

    async fn perform_delete(&self, id: TableId<T>) -> ServiceResult<bool> {
        // Both guards run on one read-only scope before anything writable
        // opens. A store error here is an internal failure, never NotFound.
        let uow = match self.provider.create_read_only().await {
            Ok(uow) => uow,
            Err(err) => return internal_failure(T::TABLE, "delete", &err),
        };
        match uow.repository().exists(id).await {
            Ok(true) => {}
            Ok(false) => {
                return ServiceResult::failure(false, ServiceError::not_found(T::ENTITY));
            }
            Err(err) => return internal_failure(T::TABLE, "delete", &err),
        }
        match uow.repository().in_use(id).await {
            Ok(false) => {}
            Ok(true) => {
                return ServiceResult::failure(
                    false,
                    ServiceError::dependency_exists(T::ENTITY, T::DEPENDENT),
                );
            }
            Err(err) => return internal_failure(T::TABLE, "delete", &err),
        }
        drop(uow);

        let mut uow = match self.provider.create_writable().await {
            Ok(uow) => uow,
            Err(err) => return internal_failure(T::TABLE, "delete", &err),
        };
        let deleted = match uow.repository().delete(id).await {
            Ok(deleted) => deleted,
            Err(err) => return internal_failure(T::TABLE, "delete", &err),
        };
        if !deleted {
            // raced with another delete between the existence check and here
            return ServiceResult::failure(false, ServiceError::not_found(T::ENTITY));
        }
        if let Err(err) = uow.commit().await {
            return internal_failure(T::TABLE, "delete", &err);
        }
        self.invalidate_table().await;
        tracing::info!(table = T::TABLE, %id, "deleted");
        ServiceResult::success(true)
    }

    /// Drop every cached entry for this table in one pattern invalidation
    async fn invalidate_table(&self) {
        let pattern = keys::table_pattern(T::TABLE);
        match self.cache.remove_by_pattern(&pattern).await {
            Ok(removed) => {
                tracing::debug!(table = T::TABLE, removed, "invalidated table cache");
            }
            Err(err) => {
                tracing::warn!(table = T::TABLE, error = %err, "table cache invalidation failed");
            }
        }
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
        if let Err(err) = self.cache.set(key, &dtos, self.ttl).await {
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
        if let Err(err) = self.cache.set(key, &dto, self.ttl).await {
            tracing::warn!(table = T::TABLE, error = %err, "failed to cache lookup result");
        }
        ServiceResult::success(dto)
    }
}
