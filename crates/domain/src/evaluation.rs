// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! ERICA evaluation grid types.
//!
//! The grid is a matrix of enrolled students (rows) by evaluation
//! categories (columns). Each cell holds a scale code such as `E` or `P`.

use crate::error::DomainError;
use crate::ids::{
    BimesterId, CategoryId, EnrollmentId, EvaluationId, SectionId, StudentId, TopicId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest scale code the backend accepts.
const MAX_SCALE_CODE_LEN: usize = 3;

/// Identity of one cell of the evaluation grid.
///
/// Displayed as `"{enrollment}-{category}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationKey {
    /// The enrollment (student row).
    pub enrollment_id: EnrollmentId,
    /// The category (column).
    pub category_id: CategoryId,
}

impl EvaluationKey {
    /// Creates a new evaluation key.
    #[must_use]
    pub const fn new(enrollment_id: EnrollmentId, category_id: CategoryId) -> Self {
        Self {
            enrollment_id,
            category_id,
        }
    }
}

impl std::fmt::Display for EvaluationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.enrollment_id, self.category_id)
    }
}

impl std::str::FromStr for EvaluationKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (enrollment, category) = s
            .split_once('-')
            .ok_or_else(|| DomainError::InvalidChangeKey(s.to_string()))?;
        Ok(Self::new(enrollment.parse()?, category.parse()?))
    }
}

/// A scale code on the evaluation scale.
///
/// Codes are one to three ASCII letters or digits and are stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScaleCode(String);

impl ScaleCode {
    /// Creates a new scale code, normalizing to upper-case.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScaleCode` if the code is empty, longer
    /// than three characters, or contains anything but ASCII alphanumerics.
    pub fn new(code: &str) -> Result<Self, DomainError> {
        let trimmed: &str = code.trim();
        if trimmed.is_empty()
            || trimmed.len() > MAX_SCALE_CODE_LEN
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(DomainError::InvalidScaleCode(code.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ScaleCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ScaleCode> for String {
    fn from(code: ScaleCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for ScaleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The editable value of one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    /// The selected scale code.
    pub scale_code: ScaleCode,
    /// Teacher notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GridCell {
    /// Creates a cell with a scale code and no notes.
    #[must_use]
    pub const fn new(scale_code: ScaleCode) -> Self {
        Self {
            scale_code,
            notes: None,
        }
    }
}

/// A column of the evaluation grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCategory {
    /// The category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Column position.
    #[serde(default)]
    pub order: u16,
}

/// A row of the evaluation grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStudent {
    /// The enrollment identifier (row identity).
    pub enrollment_id: EnrollmentId,
    /// The student.
    pub student_id: StudentId,
    /// The student's full name.
    pub full_name: String,
}

/// A persisted evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    /// The evaluation identifier, when the backend reports it.
    #[serde(default)]
    pub id: Option<EvaluationId>,
    /// The enrollment.
    pub enrollment_id: EnrollmentId,
    /// The category.
    pub category_id: CategoryId,
    /// The recorded scale code.
    pub scale_code: ScaleCode,
    /// Teacher notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl EvaluationRecord {
    /// Returns the grid cell this record occupies.
    #[must_use]
    pub const fn key(&self) -> EvaluationKey {
        EvaluationKey::new(self.enrollment_id, self.category_id)
    }

    /// Returns the editable value of this record.
    #[must_use]
    pub fn cell(&self) -> GridCell {
        GridCell {
            scale_code: self.scale_code.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// The evaluation grid of one topic for a section and bimester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationGrid {
    /// The evaluated topic.
    pub topic_id: TopicId,
    /// The section.
    pub section_id: SectionId,
    /// The bimester.
    pub bimester_id: BimesterId,
    /// Columns, in display order.
    #[serde(default)]
    pub categories: Vec<EvaluationCategory>,
    /// Rows, in display order.
    #[serde(default)]
    pub students: Vec<GridStudent>,
    /// Recorded evaluations.
    #[serde(default)]
    pub evaluations: Vec<EvaluationRecord>,
}

impl EvaluationGrid {
    /// Returns every recorded cell keyed by its grid identity.
    #[must_use]
    pub fn cells(&self) -> BTreeMap<EvaluationKey, GridCell> {
        self.evaluations
            .iter()
            .map(|record| (record.key(), record.cell()))
            .collect()
    }

    /// Returns every cell identity of the grid, row by row.
    #[must_use]
    pub fn keys(&self) -> Vec<EvaluationKey> {
        self.students
            .iter()
            .flat_map(|student| {
                self.categories
                    .iter()
                    .map(move |category| EvaluationKey::new(student.enrollment_id, category.id))
            })
            .collect()
    }
}
