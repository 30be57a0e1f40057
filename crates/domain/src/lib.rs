// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Domain types for the Campus records client.
//!
//! Validated identifiers, the catalog entities behind the filter cascade,
//! and the attendance and evaluation records the editors work on.

mod attendance;
mod catalog;
pub mod date_format;
mod error;
mod evaluation;
mod ids;

#[cfg(test)]
mod tests;

pub use attendance::{
    AttendanceKey, AttendanceMark, AttendanceRecord, AttendanceStatistics, DailyMark,
    ReportParams, SectionAttendanceReport, StatusCounts, StudentAttendanceRow, StudentStatistics,
};
pub use catalog::{AttendanceStatus, Bimester, Grade, Section, StatusCategory, Week};
pub use error::DomainError;
pub use evaluation::{
    EvaluationCategory, EvaluationGrid, EvaluationKey, EvaluationRecord, GridCell, GridStudent,
    ScaleCode,
};
pub use ids::{
    AttendanceId, AttendanceStatusId, BimesterId, CategoryId, CourseId, CycleId, EnrollmentId,
    EvaluationId, GradeId, SectionId, StudentId, TeacherId, TopicId, WeekId,
};
