// ABOUTME: Strongly-typed reference identifiers in canonical "<table>-<uuid>" form
// ABOUTME: Parsing never errors; malformed input yields the empty id
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use uuid::Uuid;

use super::EmptyValue;

/// Common surface of every typed reference identifier
///
/// Ids render as `"<table>-<uuid>"` (e.g. `equipment-550e8400-...`) and parse
/// back from that exact form. `parse_or_empty` never fails: anything that is
/// not a well-formed id of the right table yields the empty id, which the
/// validation layer rejects with `InvalidFormat` before any I/O happens.
pub trait ReferenceId:
    EmptyValue + Copy + Eq + std::hash::Hash + fmt::Display + fmt::Debug + Send + Sync + 'static
{
    /// Table prefix of the canonical string form, without the dash
    const PREFIX: &'static str;

    /// Parse the canonical form, yielding the empty id on any mismatch
    fn parse_or_empty(input: &str) -> Self;

    /// Wrap an existing UUID
    fn from_uuid(id: Uuid) -> Self;
}

macro_rules! reference_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random id
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The wrapped UUID
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl ReferenceId for $name {
            const PREFIX: &'static str = $prefix;

            fn parse_or_empty(input: &str) -> Self {
                input
                    .strip_prefix(concat!($prefix, "-"))
                    .and_then(|raw| Uuid::parse_str(raw).ok())
                    .map_or_else(<Self as EmptyValue>::empty, Self)
            }

            fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl EmptyValue for $name {
            fn empty() -> Self {
                Self(Uuid::nil())
            }

            fn is_empty(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                <Self as EmptyValue>::empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

reference_id!(
    /// Identifier for a body part row
    BodyPartId,
    "bodypart"
);
reference_id!(
    /// Identifier for a difficulty level row
    DifficultyLevelId,
    "difficultylevel"
);
reference_id!(
    /// Identifier for a muscle group row
    MuscleGroupId,
    "musclegroup"
);
reference_id!(
    /// Identifier for a movement pattern row
    MovementPatternId,
    "movementpattern"
);
reference_id!(
    /// Identifier for a metric type row
    MetricTypeId,
    "metrictype"
);
reference_id!(
    /// Identifier for a workout state row
    WorkoutStateId,
    "workoutstate"
);
reference_id!(
    /// Identifier for an execution protocol row
    ExecutionProtocolId,
    "executionprotocol"
);
reference_id!(
    /// Identifier for an equipment row
    EquipmentId,
    "equipment"
);
