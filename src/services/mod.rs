// ABOUTME: Service layer: cache-fronted read and write paths over reference tables
// ABOUTME: Table bindings live in tables, read-only services in pure, CRUD in enhanced
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Reference Data Services
//!
//! Two generic service shapes cover every reference table:
//!
//! - [`PureReferenceService`](pure::PureReferenceService) for tables that never
//!   change after seeding (body parts, difficulty levels, ...). Reads go through
//!   the eternal cache; there is no write path.
//! - [`EnhancedReferenceService`](enhanced::EnhancedReferenceService) for tables
//!   users can edit (equipment). Reads go through the TTL cache; every committed
//!   write invalidates the table's whole key prefix.
//!
//! A concrete table plugs in through [`ReferenceTable`], which binds an entity,
//! a DTO, and the table name used in cache keys. [`tables`] holds the bindings
//! and the per-table service aliases.

pub mod enhanced;
pub mod pure;
pub mod tables;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{ServiceError, ServiceResult};
use crate::models::entities::ReferenceEntity;
use crate::models::EmptyValue;

/// Binds one reference table to its entity, DTO, and cache-key name
pub trait ReferenceTable: Send + Sync + 'static {
    /// Domain entity backing the table
    type Entity: ReferenceEntity;
    /// Wire shape returned by services and stored in the cache
    type Dto: EmptyValue
        + Clone
        + PartialEq
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Plural table name; second segment of every cache key
    const TABLE: &'static str;
    /// Singular entity name for error messages ("BodyPart not found")
    const ENTITY: &'static str;

    /// Map a stored entity to its DTO
    fn to_dto(entity: &Self::Entity) -> Self::Dto;
}

/// Shorthand for a table's id type
pub type TableId<T> = <<T as ReferenceTable>::Entity as ReferenceEntity>::Id;

/// Log an infrastructure error and collapse it into an `InternalError` failure
///
/// Cache and repository errors never escape a service as `Err`; callers see a
/// uniform [`ServiceResult`] failure with the Empty sentinel as payload.
pub(crate) fn internal_failure<T: EmptyValue>(
    table: &str,
    action: &str,
    err: &dyn std::fmt::Display,
) -> ServiceResult<T> {
    tracing::error!(table, error = %err, "{action} failed");
    ServiceResult::failure(
        T::empty(),
        ServiceError::internal(format!("Failed to {action} {table}")),
    )
}
