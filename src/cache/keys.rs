// ABOUTME: Deterministic cache key construction for reference tables
// ABOUTME: Identical logical lookups must always produce byte-identical keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache keys have the shape `"ReferenceTable:<Table>:<Operation>[:<arg>]"`.
//! Value and code arguments are lower-cased so lookups are case-insensitive;
//! ids are used verbatim (the canonical id form is already case-normalized).
//! These functions are pure: key construction is load-bearing for cache-hit
//! correctness and invalidation by table prefix.

use std::fmt::Display;

/// Namespace shared by all reference-table keys
pub const REFERENCE_TABLE_NAMESPACE: &str = "ReferenceTable";

/// Key for the full active collection of a table
#[must_use]
pub fn get_all_key(table: &str) -> String {
    format!("{REFERENCE_TABLE_NAMESPACE}:{table}:GetAll")
}

/// Key for a lookup by id; the id is used verbatim
#[must_use]
pub fn get_by_id_key(table: &str, id: impl Display) -> String {
    format!("{REFERENCE_TABLE_NAMESPACE}:{table}:GetById:{id}")
}

/// Key for a lookup by display value; the value is lower-cased
#[must_use]
pub fn get_by_value_key(table: &str, value: &str) -> String {
    format!(
        "{REFERENCE_TABLE_NAMESPACE}:{table}:GetByValue:{}",
        value.to_lowercase()
    )
}

/// Key for a lookup by code; the code is lower-cased
#[must_use]
pub fn get_by_code_key(table: &str, code: &str) -> String {
    format!(
        "{REFERENCE_TABLE_NAMESPACE}:{table}:GetByCode:{}",
        code.to_lowercase()
    )
}

/// Invalidation pattern covering every key of a table
#[must_use]
pub fn table_pattern(table: &str) -> String {
    format!("{REFERENCE_TABLE_NAMESPACE}:{table}:*")
}
