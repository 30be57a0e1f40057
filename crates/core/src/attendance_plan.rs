// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Partitioning of buffered attendance edits into bulk operations.

use campus_domain::{AttendanceId, AttendanceKey, AttendanceMark, AttendanceStatusId};
use std::collections::BTreeMap;

/// An edit that creates a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCreate {
    /// The cell.
    pub key: AttendanceKey,
    /// The status to record.
    pub status_id: AttendanceStatusId,
    /// Notes to record.
    pub notes: Option<String>,
}

/// An edit that changes an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpdate {
    /// The cell.
    pub key: AttendanceKey,
    /// The record being changed.
    pub record_id: AttendanceId,
    /// The new status.
    pub status_id: AttendanceStatusId,
    /// The new notes.
    pub notes: Option<String>,
}

/// An edit that removes an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDelete {
    /// The cell.
    pub key: AttendanceKey,
    /// The record being removed.
    pub record_id: AttendanceId,
}

/// Buffered attendance edits split by the bulk endpoint that handles them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendancePlan {
    /// Cells with a status and no record yet.
    pub create: Vec<PlannedCreate>,
    /// Cells with a status and an existing record.
    pub update: Vec<PlannedUpdate>,
    /// Cleared cells with an existing record.
    pub delete: Vec<PlannedDelete>,
    /// Cleared cells with no record: nothing to send.
    pub noop: Vec<AttendanceKey>,
}

impl AttendancePlan {
    /// Splits edits by whether a record already exists for their cell.
    #[must_use]
    pub fn build(
        entries: &[(AttendanceKey, AttendanceMark)],
        record_ids: &BTreeMap<AttendanceKey, AttendanceId>,
    ) -> Self {
        let mut plan: Self = Self::default();
        for (key, mark) in entries {
            match (record_ids.get(key), mark.status_id) {
                (None, Some(status_id)) => plan.create.push(PlannedCreate {
                    key: *key,
                    status_id,
                    notes: mark.notes.clone(),
                }),
                (Some(record_id), Some(status_id)) => plan.update.push(PlannedUpdate {
                    key: *key,
                    record_id: *record_id,
                    status_id,
                    notes: mark.notes.clone(),
                }),
                (Some(record_id), None) => plan.delete.push(PlannedDelete {
                    key: *key,
                    record_id: *record_id,
                }),
                (None, None) => plan.noop.push(*key),
            }
        }
        plan
    }

    /// Number of edits that require a request.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.create.len() + self.update.len() + self.delete.len()
    }

    /// Returns whether nothing needs to be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.request_count() == 0
    }
}
