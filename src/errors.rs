// ABOUTME: Result-typed error railway used by every service in the crate
// ABOUTME: Expected domain outcomes are ServiceResult failures, never panics
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Service Result and Error Types
//!
//! Services return [`ServiceResult<T>`] for every operation. Expected domain
//! outcomes (not found, validation failure, duplicate) are failures carrying a
//! [`ServiceError`]; they are never modeled as `Err` or panics. Infrastructure
//! failures ([`CacheError`], [`RepositoryError`]) are converted to
//! `InternalError` failures at the service boundary so callers see one shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for expected domain outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceErrorCode {
    /// No error (success results)
    #[serde(rename = "NONE")]
    None,
    /// Input failed a validation rule (empty name, malformed request)
    #[serde(rename = "VALIDATION_FAILED")]
    ValidationFailed,
    /// Input does not parse into the expected identifier shape
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat,
    /// Well-formed lookup key, no matching active entity
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// Uniqueness constraint violated on create/update
    #[serde(rename = "ALREADY_EXISTS")]
    AlreadyExists,
    /// Delete blocked because other data references this entity
    #[serde(rename = "DEPENDENCY_EXISTS")]
    DependencyExists,
    /// Actor lacks rights over the target aggregate
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,
    /// Unclassified or infrastructure failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ServiceErrorCode {
    /// HTTP status this code maps to at the (out-of-scope) transport boundary
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::ValidationFailed | Self::InvalidFormat => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::AlreadyExists | Self::DependencyExists => 409,
            Self::InternalError => 500,
            Self::None => 200,
        }
    }
}

/// A single expected domain error: a code plus a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ServiceError {
    /// Classification of the failure
    pub code: ServiceErrorCode,
    /// Human-readable message, always non-empty
    pub message: String,
}

impl ServiceError {
    /// Create an error with an explicit code
    pub fn new(code: ServiceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Input failed a validation rule
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::ValidationFailed, message)
    }

    /// Field does not match the expected format
    pub fn invalid_format(field: impl Into<String>, expected_format: impl Into<String>) -> Self {
        Self::new(
            ServiceErrorCode::InvalidFormat,
            format!(
                "Invalid {}. Expected format: {}",
                field.into(),
                expected_format.into()
            ),
        )
    }

    /// Entity not found
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::new(
            ServiceErrorCode::NotFound,
            format!("{} not found", entity.into()),
        )
    }

    /// Entity not found, naming the lookup key
    pub fn not_found_with_id(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(
            ServiceErrorCode::NotFound,
            format!("{} '{}' not found", entity.into(), id.into()),
        )
    }

    /// Create/update violates a uniqueness constraint
    pub fn already_exists(entity: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            ServiceErrorCode::AlreadyExists,
            format!("{} '{}' already exists", entity.into(), value.into()),
        )
    }

    /// Delete blocked by referencing data
    pub fn dependency_exists(entity: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::new(
            ServiceErrorCode::DependencyExists,
            format!(
                "Cannot delete {} because it is referenced by {}",
                entity.into(),
                dependency.into()
            ),
        )
    }

    /// Actor lacks rights over the target aggregate
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::Unauthorized, message)
    }

    /// Unclassified or infrastructure failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::InternalError, message)
    }
}

/// Discriminated success/failure wrapper for service operations
///
/// `data` is always present: failures carry the type's Empty sentinel so
/// callers never deal with null-like payloads. The invariant
/// `is_success() == errors.is_empty()` holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceResult<T> {
    data: T,
    errors: Vec<ServiceError>,
}

impl<T> ServiceResult<T> {
    /// Successful result carrying `data` and no errors
    pub const fn success(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Failed result carrying an empty-sentinel payload and one error
    pub fn failure(data: T, error: ServiceError) -> Self {
        Self {
            data,
            errors: vec![error],
        }
    }

    /// Failed result carrying multiple errors (bulk/multi-field validation)
    ///
    /// An empty error list would break the success invariant, so it is
    /// replaced with a generic internal error.
    pub fn failure_many(data: T, errors: Vec<ServiceError>) -> Self {
        let errors = if errors.is_empty() {
            vec![ServiceError::internal("Operation failed")]
        } else {
            errors
        };
        Self { data, errors }
    }

    /// Whether the operation succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// The payload; an Empty sentinel on failure, never a null-like value
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Consume the result, yielding the payload
    pub fn into_data(self) -> T {
        self.data
    }

    /// All errors, in the order they were recorded
    #[must_use]
    pub fn errors(&self) -> &[ServiceError] {
        &self.errors
    }

    /// Error messages only, for callers that surface plain strings
    #[must_use]
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Code of the first error, or `None` for successes
    #[must_use]
    pub fn primary_error_code(&self) -> ServiceErrorCode {
        self.errors
            .first()
            .map_or(ServiceErrorCode::None, |e| e.code)
    }

    /// Map the payload, preserving errors
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ServiceResult<U> {
        ServiceResult {
            data: f(self.data),
            errors: self.errors,
        }
    }
}

/// Infrastructure failures raised by the cache store
#[derive(Debug, Error)]
pub enum CacheError {
    /// Value failed to serialize into or deserialize out of the store
    #[error("cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Invalidation pattern did not parse as a glob
    #[error("invalid cache pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Parser diagnostic
        message: String,
    },
}

/// Infrastructure failures raised by repository / unit-of-work collaborators
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying storage failed
    #[error("storage failure: {0}")]
    Storage(String),
    /// Commit of a writable unit of work failed; no partial state persists
    #[error("commit failed: {0}")]
    Commit(String),
}

impl From<CacheError> for ServiceError {
    fn from(err: CacheError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_http_status() {
        assert_eq!(ServiceErrorCode::ValidationFailed.http_status(), 400);
        assert_eq!(ServiceErrorCode::NotFound.http_status(), 404);
        assert_eq!(ServiceErrorCode::AlreadyExists.http_status(), 409);
        assert_eq!(ServiceErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn success_has_no_errors_and_none_code() {
        let result = ServiceResult::success(42);
        assert!(result.is_success());
        assert!(result.errors().is_empty());
        assert_eq!(result.primary_error_code(), ServiceErrorCode::None);
        assert_eq!(*result.data(), 42);
    }

    #[test]
    fn failure_takes_code_from_first_error() {
        let result = ServiceResult::failure_many(
            0,
            vec![
                ServiceError::not_found("BodyPart"),
                ServiceError::validation_failed("second"),
            ],
        );
        assert!(!result.is_success());
        assert_eq!(result.primary_error_code(), ServiceErrorCode::NotFound);
        assert_eq!(result.errors().len(), 2);
    }

    #[test]
    fn failure_many_with_no_errors_stays_failed() {
        let result = ServiceResult::failure_many(0, Vec::new());
        assert!(!result.is_success());
        assert_eq!(result.primary_error_code(), ServiceErrorCode::InternalError);
    }

    #[test]
    fn convenience_constructors_format_messages() {
        let err = ServiceError::already_exists("Equipment", "Barbell");
        assert_eq!(err.code, ServiceErrorCode::AlreadyExists);
        assert_eq!(err.message, "Equipment 'Barbell' already exists");

        let err = ServiceError::invalid_format("body part id", "bodypart-<uuid>");
        assert_eq!(err.code, ServiceErrorCode::InvalidFormat);
        assert!(err.message.contains("bodypart-<uuid>"));
    }

    #[test]
    fn error_serialization_uses_screaming_codes() {
        let err = ServiceError::dependency_exists("Equipment", "exercises");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("DEPENDENCY_EXISTS"));
    }
}
