// ABOUTME: Concrete table bindings: entity, DTO, and cache-key name per table
// ABOUTME: Also exports the per-table service aliases the rest of the app uses
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Table Bindings
//!
//! One marker type per reference table wires an entity and DTO into the
//! generic services. The `TABLE` constant is the second segment of every cache
//! key for that table ("ReferenceTable:BodyParts:GetAll"), so renaming one
//! here invalidates nothing but orphans old entries until they expire.

use crate::models::dto::{EquipmentDto, ExecutionProtocolDto, ReferenceDataDto};
use crate::models::entities::{
    BodyPart, DifficultyLevel, Equipment, ExecutionProtocol, MetricType, MovementPattern,
    MuscleGroup, WorkoutState,
};
use crate::services::enhanced::{
    CreateReferenceCommand, EnhancedReferenceService, MutableReferenceTable,
    UpdateReferenceCommand,
};
use crate::services::pure::PureReferenceService;
use crate::services::ReferenceTable;

macro_rules! pure_table {
    ($(#[$meta:meta])* $marker:ident, $entity:ty, $table:literal, $singular:literal) => {
        $(#[$meta])*
        pub struct $marker;

        impl ReferenceTable for $marker {
            type Entity = $entity;
            type Dto = ReferenceDataDto;

            const TABLE: &'static str = $table;
            const ENTITY: &'static str = $singular;

            fn to_dto(entity: &Self::Entity) -> Self::Dto {
                ReferenceDataDto::from_entity(entity)
            }
        }
    };
}

pure_table!(
    /// Body parts (Chest, Back, Legs, ...)
    BodyParts,
    BodyPart,
    "BodyParts",
    "BodyPart"
);
pure_table!(
    /// Difficulty levels (Beginner, Intermediate, Advanced)
    DifficultyLevels,
    DifficultyLevel,
    "DifficultyLevels",
    "DifficultyLevel"
);
pure_table!(
    /// Muscle groups (Biceps, Quadriceps, ...)
    MuscleGroups,
    MuscleGroup,
    "MuscleGroups",
    "MuscleGroup"
);
pure_table!(
    /// Movement patterns (Push, Pull, Hinge, Squat, ...)
    MovementPatterns,
    MovementPattern,
    "MovementPatterns",
    "MovementPattern"
);
pure_table!(
    /// Metric types (Weight, Time, Distance, Repetitions)
    MetricTypes,
    MetricType,
    "MetricTypes",
    "MetricType"
);
pure_table!(
    /// Workout states (Draft, Production, Archived)
    WorkoutStates,
    WorkoutState,
    "WorkoutStates",
    "WorkoutState"
);

/// Execution protocols (Standard, AMRAP, Drop Set, ...), addressable by code
///
/// The one pure table with its own DTO shape: callers need the protocol code
/// and the time/rep base flags, which the shared lookup DTO does not carry.
pub struct ExecutionProtocols;

impl ReferenceTable for ExecutionProtocols {
    type Entity = ExecutionProtocol;
    type Dto = ExecutionProtocolDto;

    const TABLE: &'static str = "ExecutionProtocols";
    const ENTITY: &'static str = "ExecutionProtocol";

    fn to_dto(entity: &Self::Entity) -> Self::Dto {
        ExecutionProtocolDto::from(entity)
    }
}

/// Equipment: the one reference table users edit at runtime
pub struct EquipmentTable;

impl ReferenceTable for EquipmentTable {
    type Entity = Equipment;
    type Dto = EquipmentDto;

    const TABLE: &'static str = "Equipment";
    const ENTITY: &'static str = "Equipment";

    fn to_dto(entity: &Self::Entity) -> Self::Dto {
        EquipmentDto::from(entity)
    }
}

impl MutableReferenceTable for EquipmentTable {
    const DEPENDENT: &'static str = "exercises that are in use";

    fn new_entity(command: &CreateReferenceCommand) -> Self::Entity {
        Equipment::new(
            command.value.clone(),
            command.description.clone(),
            command.display_order,
        )
    }

    fn apply_update(existing: Self::Entity, command: &UpdateReferenceCommand) -> Self::Entity {
        existing.renamed(command.value.clone(), command.description.clone())
    }
}

/// Read-only body part lookups
pub type BodyPartService<P, C> = PureReferenceService<BodyParts, P, C>;
/// Read-only difficulty level lookups
pub type DifficultyLevelService<P, C> = PureReferenceService<DifficultyLevels, P, C>;
/// Read-only muscle group lookups
pub type MuscleGroupService<P, C> = PureReferenceService<MuscleGroups, P, C>;
/// Read-only movement pattern lookups
pub type MovementPatternService<P, C> = PureReferenceService<MovementPatterns, P, C>;
/// Read-only metric type lookups
pub type MetricTypeService<P, C> = PureReferenceService<MetricTypes, P, C>;
/// Read-only workout state lookups
pub type WorkoutStateService<P, C> = PureReferenceService<WorkoutStates, P, C>;
/// Read-only execution protocol lookups, by id, value, or code
pub type ExecutionProtocolService<P, C> = PureReferenceService<ExecutionProtocols, P, C>;
/// Full CRUD over equipment
pub type EquipmentService<P, C> = EnhancedReferenceService<EquipmentTable, P, C>;
