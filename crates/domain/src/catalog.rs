// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Option catalogs offered at each level of the filter cascade.

use crate::ids::{AttendanceStatusId, BimesterId, CycleId, GradeId, SectionId, WeekId};
use serde::{Deserialize, Serialize};
use time::Date;

/// A bimester of an academic cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bimester {
    /// The bimester identifier.
    pub id: BimesterId,
    /// The owning cycle, when the backend includes it.
    #[serde(default)]
    pub cycle_id: Option<CycleId>,
    /// Display name (e.g., "I Bimestre").
    pub name: String,
    /// Ordinal within the cycle (1-based).
    #[serde(default)]
    pub number: Option<u8>,
    /// First day of the bimester.
    #[serde(default, with = "crate::date_format::option")]
    pub start_date: Option<Date>,
    /// Last day of the bimester.
    #[serde(default, with = "crate::date_format::option")]
    pub end_date: Option<Date>,
    /// Whether this is the bimester currently in progress.
    #[serde(default)]
    pub is_active: bool,
}

/// A grade (year level) offered during a bimester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    /// The grade identifier.
    pub id: GradeId,
    /// Display name (e.g., "3ro").
    pub name: String,
    /// Education level the grade belongs to (e.g., "Primaria").
    #[serde(default)]
    pub level: Option<String>,
}

/// A section (class group) of a grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// The section identifier.
    pub id: SectionId,
    /// Display name (e.g., "A").
    pub name: String,
    /// The grade this section belongs to.
    #[serde(default)]
    pub grade_id: Option<GradeId>,
    /// Number of enrolled students, when reported.
    #[serde(default)]
    pub student_count: Option<u32>,
}

/// A teaching week of a bimester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    /// The week identifier.
    pub id: WeekId,
    /// Ordinal within the bimester (1-based).
    pub number: u8,
    /// Monday of the week.
    #[serde(with = "crate::date_format")]
    pub start_date: Date,
    /// Last school day of the week.
    #[serde(with = "crate::date_format")]
    pub end_date: Date,
}

/// How an attendance status counts towards statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    /// The student attended.
    Present,
    /// The student attended late.
    Late,
    /// The student was absent without justification.
    Absent,
    /// The student was absent with a justification.
    Justified,
    /// Any status the backend reports that has no statistical meaning here.
    #[serde(other)]
    Other,
}

impl StatusCategory {
    /// Returns whether this category counts as attended.
    #[must_use]
    pub const fn is_attended(self) -> bool {
        matches!(self, Self::Present | Self::Late)
    }
}

/// An attendance status from the lookup catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatus {
    /// The status identifier.
    pub id: AttendanceStatusId,
    /// Short code shown in the sheet (e.g., "P", "T", "F").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Statistical category.
    pub category: StatusCategory,
    /// Display color, when configured.
    #[serde(default)]
    pub color: Option<String>,
}
