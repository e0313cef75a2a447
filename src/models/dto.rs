// ABOUTME: DTOs handed to callers and stored in the cache as JSON
// ABOUTME: One shared shape for pure lookup tables, a richer one for equipment
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::{Equipment, ExecutionProtocol, ReferenceEntity};
use super::EmptyValue;

/// Shared DTO for pure reference tables (body parts, difficulty levels, ...)
///
/// The id is the canonical string form (`"bodypart-<uuid>"`) so callers never
/// see raw UUIDs or table internals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDataDto {
    /// Canonical string id
    pub id: String,
    /// Display value
    pub value: String,
    /// Optional longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ReferenceDataDto {
    /// Map any reference entity to the shared DTO shape
    pub fn from_entity<E: ReferenceEntity>(entity: &E) -> Self {
        Self {
            id: entity.id().to_string(),
            value: entity.value().to_owned(),
            description: entity.description().map(str::to_owned),
        }
    }
}

impl EmptyValue for ReferenceDataDto {
    fn empty() -> Self {
        Self {
            id: String::new(),
            value: String::new(),
            description: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

/// Execution protocol DTO: the shared lookup shape plus the protocol code
/// and its time/rep base flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionProtocolDto {
    /// Canonical string id (`"executionprotocol-<uuid>"`)
    pub id: String,
    /// Display value
    pub value: String,
    /// Stable lookup code ("AMRAP")
    pub code: String,
    /// Optional longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether sets under this protocol are bounded by time
    pub time_base: bool,
    /// Whether sets under this protocol are bounded by repetitions
    pub rep_base: bool,
}

impl From<&ExecutionProtocol> for ExecutionProtocolDto {
    fn from(entity: &ExecutionProtocol) -> Self {
        Self {
            id: entity.id.to_string(),
            value: entity.value.clone(),
            code: entity.code.clone(),
            description: entity.description.clone(),
            time_base: entity.time_base,
            rep_base: entity.rep_base,
        }
    }
}

impl EmptyValue for ExecutionProtocolDto {
    fn empty() -> Self {
        Self {
            id: String::new(),
            value: String::new(),
            code: String::new(),
            description: None,
            time_base: false,
            rep_base: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

/// Equipment DTO with audit timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDto {
    /// Canonical string id (`"equipment-<uuid>"`)
    pub id: String,
    /// Equipment name
    pub name: String,
    /// Optional longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the row is active
    pub is_active: bool,
    /// When the row was created
    pub created_at: DateTime<Utc>,
    /// When the row was last updated; equals `created_at` until the first rename
    pub updated_at: DateTime<Utc>,
}

impl From<&Equipment> for EquipmentDto {
    fn from(entity: &Equipment) -> Self {
        Self {
            id: entity.id.to_string(),
            name: entity.name.clone(),
            description: entity.description.clone(),
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl EmptyValue for EquipmentDto {
    fn empty() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: None,
            is_active: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}
