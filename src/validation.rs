// ABOUTME: ServiceValidate: ordered, short-circuiting validation chains
// ABOUTME: Checks run at the terminal call; the first failure wins
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Validation Pipeline
//!
//! [`ServiceValidate`] replaces scattered guard clauses with a declarative
//! chain of (check, error) pairs. Nothing runs while the chain is being
//! built; the terminal [`when_valid`](ServiceValidate::when_valid) call
//! evaluates checks in declaration order and stops at the first failure, so
//! a later check may safely rely on an earlier one having passed. Only when
//! every check passes does the wrapped operation execute.
//!
//! ```
//! # use fitref::validation::ServiceValidate;
//! # use fitref::errors::{ServiceError, ServiceResult};
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let name = "  Barbell  ";
//! let result: ServiceResult<Vec<String>> = ServiceValidate::new()
//!     .ensure_not_whitespace(name, "Name cannot be empty")
//!     .when_valid(|| async { ServiceResult::success(vec![name.trim().to_owned()]) })
//!     .await;
//! assert!(result.is_success());
//! # });
//! ```

use futures_util::future::BoxFuture;
use std::future::Future;
use std::marker::PhantomData;

use crate::errors::{ServiceError, ServiceResult};
use crate::models::EmptyValue;

enum Check<'a> {
    Sync {
        predicate: Box<dyn FnOnce() -> bool + Send + 'a>,
        error: ServiceError,
    },
    Async {
        // Built eagerly, polled lazily: a short-circuited chain never
        // executes the checks after the failing one.
        future: BoxFuture<'a, bool>,
        error: ServiceError,
    },
}

/// Fluent builder for short-circuiting validation chains
///
/// `T` is the payload type of the operation being guarded; on failure the
/// synthesized result carries `T::empty()` and the first violated check's
/// error only.
pub struct ServiceValidate<'a, T> {
    checks: Vec<Check<'a>>,
    _payload: PhantomData<fn() -> T>,
}

impl<T: EmptyValue> Default for ServiceValidate<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: EmptyValue> ServiceValidate<'a, T> {
    /// Start an empty chain
    #[must_use]
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            _payload: PhantomData,
        }
    }

    /// Append a synchronous check; `error` is returned when the predicate is false
    #[must_use]
    pub fn ensure(
        mut self,
        predicate: impl FnOnce() -> bool + Send + 'a,
        error: ServiceError,
    ) -> Self {
        self.checks.push(Check::Sync {
            predicate: Box::new(predicate),
            error,
        });
        self
    }

    /// Append an asynchronous check; the future is not polled if an earlier
    /// check fails
    #[must_use]
    pub fn ensure_async(
        mut self,
        check: impl Future<Output = bool> + Send + 'a,
        error: ServiceError,
    ) -> Self {
        self.checks.push(Check::Async {
            future: Box::pin(check),
            error,
        });
        self
    }

    /// Reject empty identifiers with an `InvalidFormat` error
    #[must_use]
    pub fn ensure_not_empty(self, id: &impl EmptyValue, message: impl Into<String>) -> Self {
        let is_empty = id.is_empty();
        self.ensure(
            move || !is_empty,
            ServiceError::new(crate::errors::ServiceErrorCode::InvalidFormat, message),
        )
    }

    /// Reject blank or whitespace-only strings with a `ValidationFailed` error
    #[must_use]
    pub fn ensure_not_whitespace(self, value: &str, message: impl Into<String>) -> Self {
        let is_blank = value.trim().is_empty();
        self.ensure(move || !is_blank, ServiceError::validation_failed(message))
    }

    /// Append an async existence check; sugar over [`ensure_async`](Self::ensure_async)
    /// for the common "must exist before we touch it" guard
    #[must_use]
    pub fn ensure_exists_async(
        self,
        check: impl Future<Output = bool> + Send + 'a,
        error: ServiceError,
    ) -> Self {
        self.ensure_async(check, error)
    }

    /// Evaluate the chain; run `operation` only when every check passes
    ///
    /// Checks run in declaration order. The first failure short-circuits:
    /// later checks are not evaluated and the failure carries only the
    /// violated check's error.
    pub async fn when_valid<F, Fut>(self, operation: F) -> ServiceResult<T>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = ServiceResult<T>> + Send,
    {
        for check in self.checks {
            let (passed, error) = match check {
                Check::Sync { predicate, error } => (predicate(), error),
                Check::Async { future, error } => (future.await, error),
            };
            if !passed {
                return ServiceResult::failure(T::empty(), error);
            }
        }
        operation().await
    }
}
