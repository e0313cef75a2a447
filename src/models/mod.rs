// ABOUTME: Domain model layer: typed ids, reference entities, DTOs
// ABOUTME: Everything follows the Empty sentinel pattern instead of Option/null
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Domain Models
//!
//! Reference data is small, rarely-changing lookup rows (body parts,
//! difficulty levels, muscle groups, ...). Every model type has an `Empty`
//! sentinel instead of an `Option` wrapper: "no value" is an ordinary instance
//! answering `is_empty() == true`. This removes null-checking from the whole
//! service layer; see [`EmptyValue`].

/// DTOs returned by services and stored in the cache
pub mod dto;
/// Reference entities as returned by repositories
pub mod entities;
/// Strongly-typed reference identifiers
pub mod ids;

/// The empty-object pattern: a per-type sentinel standing in for "no value"
///
/// Repositories return `T::empty()` instead of erroring on "not found", and
/// `ServiceResult` failures carry `T::empty()` as payload so the data field
/// is never a null-like value.
pub trait EmptyValue {
    /// The sentinel instance representing "no value"
    fn empty() -> Self;
    /// Whether this instance is the sentinel
    fn is_empty(&self) -> bool;
}

// Failure payloads for existence checks and collection endpoints.
impl EmptyValue for bool {
    fn empty() -> Self {
        false
    }

    fn is_empty(&self) -> bool {
        !*self
    }
}

impl<T> EmptyValue for Vec<T> {
    fn empty() -> Self {
        Self::new()
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}
