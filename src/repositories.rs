// ABOUTME: Collaborator seams: repository and unit-of-work abstractions
// ABOUTME: Implemented by the persistence layer; the core only consumes them
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Repository and Unit-of-Work Seams
//!
//! These traits are the narrow interfaces the service layer consumes; the
//! crate ships no persistence of its own. Repositories return an entity's
//! `Empty` sentinel when nothing matches, never a "not found" error — the
//! `Err` channel is reserved for infrastructure failures. A writable unit of
//! work persists nothing unless [`WritableUnitOfWork::commit`] is called;
//! dropping it on any exit path (early return, error) discards the pending
//! work.

use async_trait::async_trait;

use crate::errors::RepositoryError;
use crate::models::entities::ReferenceEntity;

/// Read operations shared by every reference-table repository
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    /// The entity type this repository serves
    type Entity: ReferenceEntity;

    /// Fetch by id; `Entity::empty()` when absent
    async fn get_by_id(
        &self,
        id: <Self::Entity as ReferenceEntity>::Id,
    ) -> Result<Self::Entity, RepositoryError>;

    /// Fetch by display value, case-insensitively; `Entity::empty()` when absent
    async fn get_by_value(&self, value: &str) -> Result<Self::Entity, RepositoryError>;

    /// Fetch by lookup code, case-insensitively; `Entity::empty()` when absent
    /// or when the table carries no codes
    async fn get_by_code(&self, code: &str) -> Result<Self::Entity, RepositoryError>;

    /// All active rows
    async fn get_all_active(&self) -> Result<Vec<Self::Entity>, RepositoryError>;

    /// Whether an active row with this id exists
    async fn exists(
        &self,
        id: <Self::Entity as ReferenceEntity>::Id,
    ) -> Result<bool, RepositoryError>;
}

/// Mutation operations for reference tables that users can edit
#[async_trait]
pub trait MutableReferenceRepository: ReferenceRepository {
    /// Persist a new row, returning it as stored
    async fn create(&mut self, entity: Self::Entity) -> Result<Self::Entity, RepositoryError>;

    /// Persist changes to an existing row, returning it as stored
    async fn update(&mut self, entity: Self::Entity) -> Result<Self::Entity, RepositoryError>;

    /// Hard-delete a row; `false` when no row matched
    ///
    /// Only legal when nothing references the row; the service checks
    /// [`in_use`](Self::in_use) first.
    async fn delete(
        &mut self,
        id: <Self::Entity as ReferenceEntity>::Id,
    ) -> Result<bool, RepositoryError>;

    /// Soft-delete: clear the active flag; `false` when no row matched
    async fn deactivate(
        &mut self,
        id: <Self::Entity as ReferenceEntity>::Id,
    ) -> Result<bool, RepositoryError>;

    /// Whether an active row with this display value exists, case-insensitively,
    /// optionally excluding one id (update-uniqueness checks)
    async fn exists_by_value(
        &self,
        value: &str,
        exclude: Option<<Self::Entity as ReferenceEntity>::Id>,
    ) -> Result<bool, RepositoryError>;

    /// Whether other data references this row (blocks hard delete)
    async fn in_use(
        &self,
        id: <Self::Entity as ReferenceEntity>::Id,
    ) -> Result<bool, RepositoryError>;
}

/// A read-only scope over one repository
pub trait ReadOnlyUnitOfWork: Send {
    /// The repository type this scope yields
    type Repository;

    /// Borrow the repository for the duration of the scope
    fn repository(&self) -> &Self::Repository;
}

/// A writable scope over one repository
///
/// Nothing persists until `commit` consumes the scope; dropping an
/// uncommitted scope rolls the pending work back.
#[async_trait]
pub trait WritableUnitOfWork: Send {
    /// The repository type this scope yields
    type Repository;

    /// Borrow the repository mutably for the duration of the scope
    fn repository(&mut self) -> &mut Self::Repository;

    /// Persist all pending work atomically
    async fn commit(self) -> Result<(), RepositoryError>;
}

/// Factory for unit-of-work scopes, one scope per service operation
///
/// A scope is never shared across concurrent calls and never held open
/// beyond the operation that created it.
#[async_trait]
pub trait UnitOfWorkProvider: Send + Sync {
    /// The repository type scopes yield
    type Repository;
    /// Read-only scope type
    type ReadOnly: ReadOnlyUnitOfWork<Repository = Self::Repository> + Send;
    /// Writable scope type
    type Writable: WritableUnitOfWork<Repository = Self::Repository> + Send;

    /// Open a read-only scope
    async fn create_read_only(&self) -> Result<Self::ReadOnly, RepositoryError>;

    /// Open a writable scope
    async fn create_writable(&self) -> Result<Self::Writable, RepositoryError>;
}
