// ABOUTME: Main library entry point for the fitness reference-data service core
// ABOUTME: Result-typed services over cached, unit-of-work-scoped reference tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # fitref
//!
//! Domain core for fitness reference data: the lookup tables (body parts,
//! difficulty levels, muscle groups, movement patterns, metric types, workout
//! states, equipment) that every workout and exercise record points at.
//!
//! Three ideas shape the crate:
//!
//! - **Result-typed outcomes.** Every service operation returns a
//!   [`ServiceResult`](errors::ServiceResult). Expected domain outcomes (not
//!   found, validation failure, duplicate value) are failures carrying a
//!   [`ServiceError`](errors::ServiceError), never panics or `Err`.
//! - **Empty over null.** Absent values are type-level Empty sentinels via
//!   [`EmptyValue`](models::EmptyValue); no `Option` threading through the
//!   service layer.
//! - **Cache-first reads.** Immutable tables sit behind a 365-day eternal
//!   cache, editable ones behind a TTL cache whose table prefix is invalidated
//!   on every committed write.
//!
//! ```
//! use std::sync::Arc;
//! use fitref::cache::{CacheConfig, InMemoryCache};
//!
//! let config = CacheConfig {
//!     enable_background_cleanup: false, // no runtime in this example
//!     ..CacheConfig::default()
//! };
//! let cache = Arc::new(InMemoryCache::new(&config));
//! # drop(cache);
//! ```

/// Two-tier read-through cache: TTL service, eternal service, key builder
pub mod cache;
/// Result-typed error railway shared by every service
pub mod errors;
/// Tracing subscriber setup for embedders
pub mod logging;
/// Ids, entities, DTOs, and the Empty sentinel trait
pub mod models;
/// Repository and unit-of-work traits the services run against
pub mod repositories;
/// Generic reference-data services and the concrete table bindings
pub mod services;
/// Short-circuiting validation chain in front of service operations
pub mod validation;
