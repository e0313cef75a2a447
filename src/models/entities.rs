// ABOUTME: Reference entities: immutable value records behind the repository seam
// ABOUTME: Deletion is modeled as deactivation; absence is the Empty sentinel
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Utc};

use super::ids::{
    BodyPartId, DifficultyLevelId, EquipmentId, ExecutionProtocolId, MetricTypeId,
    MovementPatternId, MuscleGroupId, ReferenceId, WorkoutStateId,
};
use super::EmptyValue;

/// Common surface of a reference-data row
///
/// Each row has an identifier, a display value, an optional description, a
/// display-order integer, and an active flag. Rows are immutable value
/// records; "deleting" one means deactivating it unless the repository
/// supports hard delete for unreferenced rows.
pub trait ReferenceEntity: EmptyValue + Clone + Send + Sync + 'static {
    /// The typed identifier for this table
    type Id: ReferenceId;

    /// Row identifier
    fn id(&self) -> Self::Id;
    /// Display value ("Barbell", "Beginner", ...)
    fn value(&self) -> &str;
    /// Lookup code for tables that carry one ("AMRAP", "SUPERSET"); `None`
    /// for tables addressed only by value
    fn code(&self) -> Option<&str> {
        None
    }
    /// Optional longer description
    fn description(&self) -> Option<&str>;
    /// Sort position for list endpoints
    fn display_order(&self) -> i32;
    /// Inactive rows are invisible to lookups
    fn is_active(&self) -> bool;
}

macro_rules! reference_entity {
    ($(#[$meta:meta])* $name:ident, $id:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            /// Row identifier
            pub id: $id,
            /// Display value
            pub value: String,
            /// Optional longer description
            pub description: Option<String>,
            /// Sort position for list endpoints
            pub display_order: i32,
            /// Inactive rows are invisible to lookups
            pub is_active: bool,
        }

        impl $name {
            /// Create an active row with a fresh id
            #[must_use]
            pub fn new(
                value: impl Into<String>,
                description: Option<String>,
                display_order: i32,
            ) -> Self {
                Self {
                    id: <$id>::new(),
                    value: value.into(),
                    description,
                    display_order,
                    is_active: true,
                }
            }
        }

        impl EmptyValue for $name {
            fn empty() -> Self {
                Self {
                    id: EmptyValue::empty(),
                    value: String::new(),
                    description: None,
                    display_order: 0,
                    is_active: false,
                }
            }

            fn is_empty(&self) -> bool {
                EmptyValue::is_empty(&self.id)
            }
        }

        impl ReferenceEntity for $name {
            type Id = $id;

            fn id(&self) -> Self::Id {
                self.id
            }

            fn value(&self) -> &str {
                &self.value
            }

            fn description(&self) -> Option<&str> {
                self.description.as_deref()
            }

            fn display_order(&self) -> i32 {
                self.display_order
            }

            fn is_active(&self) -> bool {
                self.is_active
            }
        }
    };
}

reference_entity!(
    /// Body part lookup row (Chest, Back, Legs, ...)
    BodyPart,
    BodyPartId
);
reference_entity!(
    /// Difficulty level lookup row (Beginner, Intermediate, Advanced)
    DifficultyLevel,
    DifficultyLevelId
);
reference_entity!(
    /// Muscle group lookup row (Biceps, Quadriceps, ...)
    MuscleGroup,
    MuscleGroupId
);
reference_entity!(
    /// Movement pattern lookup row (Push, Pull, Hinge, Squat, ...)
    MovementPattern,
    MovementPatternId
);
reference_entity!(
    /// Metric type lookup row (Weight, Time, Distance, Repetitions)
    MetricType,
    MetricTypeId
);
reference_entity!(
    /// Workout state lookup row (Draft, Production, Archived)
    WorkoutState,
    WorkoutStateId
);

/// Execution protocol row: a lookup table addressed by code as well as value
///
/// Protocols ("Standard", "AMRAP", "Drop Set") carry a stable upper-case code
/// that workout definitions reference, plus flags describing whether the
/// protocol is time-based or rep-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionProtocol {
    /// Row identifier
    pub id: ExecutionProtocolId,
    /// Display value ("As Many Reps As Possible")
    pub value: String,
    /// Stable lookup code ("AMRAP")
    pub code: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Whether sets under this protocol are bounded by time
    pub time_base: bool,
    /// Whether sets under this protocol are bounded by repetitions
    pub rep_base: bool,
    /// Sort position for list endpoints
    pub display_order: i32,
    /// Inactive rows are invisible to lookups
    pub is_active: bool,
}

impl ExecutionProtocol {
    /// Create an active row with a fresh id
    #[must_use]
    pub fn new(
        value: impl Into<String>,
        code: impl Into<String>,
        description: Option<String>,
        time_base: bool,
        rep_base: bool,
        display_order: i32,
    ) -> Self {
        Self {
            id: ExecutionProtocolId::new(),
            value: value.into(),
            code: code.into(),
            description,
            time_base,
            rep_base,
            display_order,
            is_active: true,
        }
    }
}

impl EmptyValue for ExecutionProtocol {
    fn empty() -> Self {
        Self {
            id: EmptyValue::empty(),
            value: String::new(),
            code: String::new(),
            description: None,
            time_base: false,
            rep_base: false,
            display_order: 0,
            is_active: false,
        }
    }

    fn is_empty(&self) -> bool {
        EmptyValue::is_empty(&self.id)
    }
}

impl ReferenceEntity for ExecutionProtocol {
    type Id = ExecutionProtocolId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn display_order(&self) -> i32 {
        self.display_order
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Equipment row: mutable reference data with audit timestamps
///
/// Unlike the pure lookup tables above, equipment rows are created and
/// renamed by users, so they carry created/updated timestamps and live behind
/// the TTL cache rather than the eternal one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equipment {
    /// Row identifier
    pub id: EquipmentId,
    /// Equipment name ("Barbell", "Cable Machine", ...)
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Sort position for list endpoints
    pub display_order: i32,
    /// Inactive rows are invisible to lookups
    pub is_active: bool,
    /// When the row was created
    pub created_at: DateTime<Utc>,
    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    /// Create an active row with a fresh id and current timestamps
    #[must_use]
    pub fn new(name: impl Into<String>, description: Option<String>, display_order: i32) -> Self {
        let now = Utc::now();
        Self {
            id: EquipmentId::new(),
            name: name.into(),
            description,
            display_order,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy with a new name/description and a bumped `updated_at`
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>, description: Option<String>) -> Self {
        self.name = name.into();
        self.description = description;
        self.updated_at = Utc::now();
        self
    }
}

impl EmptyValue for Equipment {
    fn empty() -> Self {
        Self {
            id: EmptyValue::empty(),
            name: String::new(),
            description: None,
            display_order: 0,
            is_active: false,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn is_empty(&self) -> bool {
        EmptyValue::is_empty(&self.id)
    }
}

impl ReferenceEntity for Equipment {
    type Id = EquipmentId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn value(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn display_order(&self) -> i32 {
        self.display_order
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_entities_answer_is_empty() {
        assert!(BodyPart::empty().is_empty());
        assert!(Equipment::empty().is_empty());
        assert!(!BodyPart::new("Chest", None, 1).is_empty());
    }

    #[test]
    fn new_rows_are_active() {
        let level = DifficultyLevel::new("Beginner", Some("Entry level".into()), 1);
        assert!(level.is_active);
        assert!(!level.id.is_empty());
    }

    #[test]
    fn code_is_carried_only_by_coded_tables() {
        let part = BodyPart::new("Chest", None, 1);
        assert_eq!(part.code(), None);
        let amrap = ExecutionProtocol::new("AMRAP", "AMRAP", None, true, false, 4);
        assert_eq!(ReferenceEntity::code(&amrap), Some("AMRAP"));
    }

    #[test]
    fn new_equipment_timestamps_start_equal() {
        let equipment = Equipment::new("Barbell", None, 0);
        assert_eq!(equipment.created_at, equipment.updated_at);
    }

    #[test]
    fn rename_bumps_updated_at() {
        let original = Equipment::new("Barbel", None, 0);
        let created = original.created_at;
        let renamed = original.renamed("Barbell", None);
        assert_eq!(renamed.name, "Barbell");
        assert_eq!(renamed.created_at, created);
        assert!(renamed.updated_at >= created);
    }
}
