// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Strongly typed entity identifiers.
//!
//! Every identifier the backend hands out is a positive integer. Each entity
//! gets its own newtype so a grade id can never be passed where a section id
//! is expected. Deserialization goes through the same validation as
//! construction, so an id that made it past the service boundary is valid.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::InvalidId` if `value` is not positive.
            pub const fn new(value: i64) -> Result<Self, DomainError> {
                if value <= 0 {
                    return Err(DomainError::InvalidId {
                        entity: $entity,
                        value,
                    });
                }
                Ok(Self(value))
            }

            /// Returns the raw identifier value.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = DomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value: i64 = s.trim().parse().map_err(|_| DomainError::InvalidId {
                    entity: $entity,
                    value: 0,
                })?;
                Self::new(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// An academic cycle (school year).
    CycleId,
    "cycle"
);
entity_id!(
    /// A bimester within a cycle.
    BimesterId,
    "bimester"
);
entity_id!(
    /// A grade (year level).
    GradeId,
    "grade"
);
entity_id!(
    /// A section (class group) within a grade.
    SectionId,
    "section"
);
entity_id!(
    /// A teaching week within a bimester.
    WeekId,
    "week"
);
entity_id!(StudentId, "student");
entity_id!(CourseId, "course");
entity_id!(
    /// A student's enrollment in a section for a cycle.
    EnrollmentId,
    "enrollment"
);
entity_id!(
    /// A column of the evaluation grid.
    CategoryId,
    "category"
);
entity_id!(TopicId, "topic");
entity_id!(TeacherId, "teacher");
entity_id!(
    /// A persisted attendance record.
    AttendanceId,
    "attendance"
);
entity_id!(AttendanceStatusId, "attendance status");
entity_id!(EvaluationId, "evaluation");
