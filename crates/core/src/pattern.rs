// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk fill patterns for the evaluation grid.
//!
//! A pattern produces ordinary buffered edits, so it is saved, retried, and
//! discarded exactly like cell-by-cell editing.

use crate::pending::PendingChangeBuffer;
use campus_domain::{CategoryId, EnrollmentId, EvaluationKey, GridCell, ScaleCode};

/// A way of filling many grid cells with one scale code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridPattern {
    /// Every student in one category.
    Column {
        /// The category to fill.
        category_id: CategoryId,
        /// The scale code to apply.
        scale_code: ScaleCode,
    },
    /// Every category for one student.
    Row {
        /// The enrollment to fill.
        enrollment_id: EnrollmentId,
        /// The scale code to apply.
        scale_code: ScaleCode,
    },
    /// Every cell that currently displays nothing.
    FillEmpty {
        /// The scale code to apply.
        scale_code: ScaleCode,
    },
}

impl GridPattern {
    const fn scale_code(&self) -> &ScaleCode {
        match self {
            Self::Column { scale_code, .. }
            | Self::Row { scale_code, .. }
            | Self::FillEmpty { scale_code } => scale_code,
        }
    }

    fn targets(&self, key: &EvaluationKey, current: Option<&GridCell>) -> bool {
        match self {
            Self::Column { category_id, .. } => key.category_id == *category_id,
            Self::Row { enrollment_id, .. } => key.enrollment_id == *enrollment_id,
            Self::FillEmpty { .. } => current.is_none(),
        }
    }
}

/// Applies a pattern over the given grid cells.
///
/// Cells already displaying the pattern's scale code are left alone. Notes
/// of the displayed value are carried over. Returns the number of cells
/// that received an edit.
pub fn apply_pattern(
    buffer: &mut PendingChangeBuffer<EvaluationKey, GridCell>,
    keys: &[EvaluationKey],
    pattern: &GridPattern,
) -> usize {
    let scale_code: &ScaleCode = pattern.scale_code();
    let mut edits: Vec<(EvaluationKey, GridCell)> = Vec::new();

    for key in keys {
        let current: Option<&GridCell> = buffer.get_value(key);
        if !pattern.targets(key, current) {
            continue;
        }
        if current.is_some_and(|cell| cell.scale_code == *scale_code) {
            continue;
        }
        edits.push((
            *key,
            GridCell {
                scale_code: scale_code.clone(),
                notes: current.and_then(|cell| cell.notes.clone()),
            },
        ));
    }

    let count: usize = edits.len();
    for (key, cell) in edits {
        buffer.set_value(key, cell);
    }
    count
}
