// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance records, section reports, and attendance statistics.

use crate::catalog::StatusCategory;
use crate::error::DomainError;
use crate::ids::{AttendanceId, AttendanceStatusId, CourseId, SectionId, StudentId, WeekId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// Identity of one cell of the attendance sheet.
///
/// Displayed as `"{student}-{course}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceKey {
    /// The student the mark belongs to.
    pub student_id: StudentId,
    /// The course the mark was taken in.
    pub course_id: CourseId,
}

impl AttendanceKey {
    /// Creates a new attendance key.
    #[must_use]
    pub const fn new(student_id: StudentId, course_id: CourseId) -> Self {
        Self {
            student_id,
            course_id,
        }
    }
}

impl std::fmt::Display for AttendanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.student_id, self.course_id)
    }
}

impl std::str::FromStr for AttendanceKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (student, course) = s
            .split_once('-')
            .ok_or_else(|| DomainError::InvalidChangeKey(s.to_string()))?;
        Ok(Self::new(student.parse()?, course.parse()?))
    }
}

/// The editable value of one attendance cell.
///
/// A mark with no status means "no attendance recorded"; saving it over an
/// existing record deletes that record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    /// The selected status, if any.
    pub status_id: Option<AttendanceStatusId>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AttendanceMark {
    /// Creates a mark with the given status and no notes.
    #[must_use]
    pub const fn with_status(status_id: AttendanceStatusId) -> Self {
        Self {
            status_id: Some(status_id),
            notes: None,
        }
    }

    /// Creates a mark that clears the cell.
    #[must_use]
    pub const fn cleared() -> Self {
        Self {
            status_id: None,
            notes: None,
        }
    }

    /// Returns whether this mark clears the cell.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        self.status_id.is_none()
    }
}

/// A persisted attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// The record identifier.
    pub id: AttendanceId,
    /// The student.
    pub student_id: StudentId,
    /// The course.
    pub course_id: CourseId,
    /// The day the attendance was taken.
    #[serde(with = "crate::date_format")]
    pub date: Date,
    /// The recorded status.
    pub status_id: AttendanceStatusId,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    /// Returns the sheet cell this record occupies.
    #[must_use]
    pub const fn key(&self) -> AttendanceKey {
        AttendanceKey::new(self.student_id, self.course_id)
    }

    /// Returns the editable value of this record.
    #[must_use]
    pub fn mark(&self) -> AttendanceMark {
        AttendanceMark {
            status_id: Some(self.status_id),
            notes: self.notes.clone(),
        }
    }
}

/// Secondary parameters of a section attendance report.
///
/// None of these gate the report; all of them are part of its identity, so
/// two equal parameter sets always denote the same request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReportParams {
    week_id: Option<WeekId>,
    start_date: Option<Date>,
    end_date: Option<Date>,
}

impl ReportParams {
    /// Creates report parameters.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if both dates are given and
    /// `end_date` is before `start_date`.
    pub fn new(
        week_id: Option<WeekId>,
        start_date: Option<Date>,
        end_date: Option<Date>,
    ) -> Result<Self, DomainError> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(DomainError::InvalidDateRange { start, end });
            }
        }
        Ok(Self {
            week_id,
            start_date,
            end_date,
        })
    }

    /// Returns a copy of these parameters scoped to a week.
    #[must_use]
    pub fn with_week(mut self, week_id: Option<WeekId>) -> Self {
        self.week_id = week_id;
        self
    }

    /// The week filter.
    #[must_use]
    pub const fn week_id(&self) -> Option<WeekId> {
        self.week_id
    }

    /// The first day of the range.
    #[must_use]
    pub const fn start_date(&self) -> Option<Date> {
        self.start_date
    }

    /// The last day of the range.
    #[must_use]
    pub const fn end_date(&self) -> Option<Date> {
        self.end_date
    }

    /// Returns the query parameters in a fixed order, omitting unset ones.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = Vec::new();
        if let Some(week) = self.week_id {
            pairs.push(("weekId", week.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate", crate::date_format::format_date(start)));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", crate::date_format::format_date(end)));
        }
        pairs
    }

    /// Returns a stable serialized form, suitable as a cache or dedup key.
    #[must_use]
    pub fn stable_key(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<String>>()
            .join("&")
    }
}

/// One day's mark in a section report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMark {
    /// The day.
    #[serde(with = "crate::date_format")]
    pub date: Date,
    /// The course, when the report is broken down per course.
    #[serde(default)]
    pub course_id: Option<CourseId>,
    /// The recorded status.
    pub status_id: AttendanceStatusId,
    /// The status code (e.g., "P").
    pub status_code: String,
    /// Statistical category of the status.
    pub category: StatusCategory,
}

/// A student's row in a section report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendanceRow {
    /// The student.
    pub student_id: StudentId,
    /// The student's full name.
    pub full_name: String,
    /// Every mark in the report range.
    #[serde(default)]
    pub marks: Vec<DailyMark>,
}

/// Attendance report for one section over a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionAttendanceReport {
    /// The section.
    pub section_id: SectionId,
    /// The week filter the report was built for.
    #[serde(default)]
    pub week_id: Option<WeekId>,
    /// First day covered.
    #[serde(default, with = "crate::date_format::option")]
    pub start_date: Option<Date>,
    /// Last day covered.
    #[serde(default, with = "crate::date_format::option")]
    pub end_date: Option<Date>,
    /// One row per enrolled student.
    #[serde(default)]
    pub students: Vec<StudentAttendanceRow>,
}

/// Status-category counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    /// Present marks.
    pub present: u32,
    /// Late marks.
    pub late: u32,
    /// Unjustified absences.
    pub absent: u32,
    /// Justified absences.
    pub justified: u32,
    /// Marks with no statistical category.
    pub other: u32,
}

impl StatusCounts {
    /// Records one mark of the given category.
    pub const fn record(&mut self, category: StatusCategory) {
        match category {
            StatusCategory::Present => self.present += 1,
            StatusCategory::Late => self.late += 1,
            StatusCategory::Absent => self.absent += 1,
            StatusCategory::Justified => self.justified += 1,
            StatusCategory::Other => self.other += 1,
        }
    }

    /// Adds another set of counts to this one.
    pub const fn absorb(&mut self, other: &Self) {
        self.present += other.present;
        self.late += other.late;
        self.absent += other.absent;
        self.justified += other.justified;
        self.other += other.other;
    }

    /// Total number of marks.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.present + self.late + self.absent + self.justified + self.other
    }

    /// Percentage of marks counted as attended (present or late).
    ///
    /// Returns `0.0` when there are no marks.
    #[must_use]
    pub fn attendance_rate(&self) -> f64 {
        let total: u32 = self.total();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.present + self.late) * 100.0 / f64::from(total)
    }
}

/// Statistics for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatistics {
    /// The student.
    pub student_id: StudentId,
    /// The student's full name.
    pub full_name: String,
    /// Mark counts.
    pub counts: StatusCounts,
    /// Attendance percentage.
    pub attendance_rate: f64,
}

/// Statistics for a section over a report range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatistics {
    /// The section.
    pub section_id: SectionId,
    /// Number of students in the report.
    pub total_students: u32,
    /// Section-wide mark counts.
    pub counts: StatusCounts,
    /// Section-wide attendance percentage.
    pub attendance_rate: f64,
    /// Per-student breakdown.
    #[serde(default)]
    pub students: Vec<StudentStatistics>,
}

impl AttendanceStatistics {
    /// Computes statistics from a section report.
    ///
    /// Students are ordered by id. A student that appears in several rows
    /// has the rows merged.
    #[must_use]
    pub fn from_report(report: &SectionAttendanceReport) -> Self {
        let mut per_student: BTreeMap<StudentId, (String, StatusCounts)> = BTreeMap::new();
        for row in &report.students {
            let entry = per_student
                .entry(row.student_id)
                .or_insert_with(|| (row.full_name.clone(), StatusCounts::default()));
            for mark in &row.marks {
                entry.1.record(mark.category);
            }
        }

        let mut counts: StatusCounts = StatusCounts::default();
        let students: Vec<StudentStatistics> = per_student
            .into_iter()
            .map(|(student_id, (full_name, student_counts))| {
                counts.absorb(&student_counts);
                StudentStatistics {
                    student_id,
                    full_name,
                    counts: student_counts,
                    attendance_rate: student_counts.attendance_rate(),
                }
            })
            .collect();

        Self {
            section_id: report.section_id,
            total_students: u32::try_from(students.len()).unwrap_or(u32::MAX),
            counts,
            attendance_rate: counts.attendance_rate(),
            students,
        }
    }
}
