// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Buffered editing of one attendance sheet.
//!
//! A save splits the buffered marks into creates, updates and deletes by
//! whether the cell already has a record, and sends the three partitions
//! concurrently. Each partition is reconciled on its own, so one failed
//! request does not hide the outcome of the others.

use crate::attendance::{
    ApplyStatusRequest, AttendanceChange, AttendanceRemoval, AttendanceService, BulkWriteOutcome,
    NewAttendance, SheetScope,
};
use crate::error::ClientError;
use crate::save::{SaveReport, all_failed, partial_failure_banner, request_failure_banner};
use crate::transport::Transport;
use campus::{AttendancePlan, BulkOperationResult, PendingChangeBuffer, reconcile};
use campus_domain::{
    AttendanceId, AttendanceKey, AttendanceMark, AttendanceRecord, AttendanceStatusId, CourseId,
    StudentId,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// Reason given to a cell whose record was created but whose id is still
/// unknown because the sheet could not be reloaded.
pub const UNRESOLVED_RECORD_REASON: &str =
    "The sheet could not be reloaded after this cell was created";

/// Holds the server records of one sheet and the marks edited on top.
#[derive(Debug)]
pub struct AttendanceSheetEditor<T> {
    service: AttendanceService<T>,
    scope: SheetScope,
    record_ids: BTreeMap<AttendanceKey, AttendanceId>,
    // Created on the server without an echoed record. Their ids only come
    // back with the next successful load.
    unresolved: BTreeSet<AttendanceKey>,
    buffer: PendingChangeBuffer<AttendanceKey, AttendanceMark>,
}

impl<T: Transport> AttendanceSheetEditor<T> {
    /// Creates an editor with nothing loaded.
    #[must_use]
    pub fn new(service: AttendanceService<T>, scope: SheetScope) -> Self {
        Self {
            service,
            scope,
            record_ids: BTreeMap::new(),
            unresolved: BTreeSet::new(),
            buffer: PendingChangeBuffer::new(),
        }
    }

    /// The sheet being edited.
    #[must_use]
    pub const fn scope(&self) -> &SheetScope {
        &self.scope
    }

    /// Loads the sheet and replaces the snapshot. Buffered marks are kept.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error; the previous snapshot is
    /// kept in that case.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let records: Vec<AttendanceRecord> = self.service.sheet(&self.scope).await?;
        self.record_ids = records.iter().map(|r| (r.key(), r.id)).collect();
        self.unresolved.clear();
        self.buffer
            .replace_snapshot(records.iter().map(|r| (r.key(), r.mark())).collect());
        Ok(())
    }

    /// The record stored for a cell, if any.
    #[must_use]
    pub fn record_id(&self, key: &AttendanceKey) -> Option<AttendanceId> {
        self.record_ids.get(key).copied()
    }

    /// The mark to display: the buffered edit, else the server value.
    #[must_use]
    pub fn get_value(&self, key: &AttendanceKey) -> Option<&AttendanceMark> {
        self.buffer.get_value(key)
    }

    /// Buffers a mark. A cleared mark deletes the record on save.
    pub fn set_value(&mut self, key: AttendanceKey, mark: AttendanceMark) {
        self.buffer.set_value(key, mark);
    }

    /// Drops the buffered mark of one cell.
    pub fn clear(&mut self, key: &AttendanceKey) -> Option<AttendanceMark> {
        self.buffer.clear(key)
    }

    /// Drops every buffered mark. Returns how many were dropped.
    pub fn discard(&mut self) -> usize {
        self.buffer.clear_all()
    }

    /// Returns whether a student has buffered marks.
    #[must_use]
    pub fn has_pending(&self, student_id: StudentId) -> bool {
        self.buffer.has_pending(&student_id)
    }

    /// Number of buffered marks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.buffer.pending_count()
    }

    /// Why the last save refused this cell, if it did.
    #[must_use]
    pub fn failure(&self, key: &AttendanceKey) -> Option<&str> {
        self.buffer.failure(key)
    }

    /// The underlying buffer.
    #[must_use]
    pub const fn buffer(&self) -> &PendingChangeBuffer<AttendanceKey, AttendanceMark> {
        &self.buffer
    }

    /// Sends every buffered mark and reconciles the results.
    ///
    /// A cleared mark on a cell without a record needs no request and
    /// counts as saved. After any response the sheet is reloaded.
    ///
    /// When an earlier save created records whose ids are still unknown,
    /// the sheet is reloaded first. If that reload fails, edits of those
    /// cells are held back and reported as failed with
    /// [`UNRESOLVED_RECORD_REASON`], so they are never created twice.
    pub async fn save(&mut self) -> SaveReport<AttendanceKey> {
        let entries: Vec<(AttendanceKey, AttendanceMark)> = self.buffer.pending_entries();
        if entries.is_empty() {
            return SaveReport::nothing_to_save();
        }
        let resync: Result<(), ClientError> = if self.unresolved.is_empty() {
            Ok(())
        } else {
            self.load().await
        };
        if let Err(e) = resync {
            warn!(
                error = %e,
                cells = self.unresolved.len(),
                "Could not resolve created records"
            );
        }
        let (entries, held): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|(key, _)| !self.unresolved.contains(key));
        let held: Vec<AttendanceKey> = held.into_iter().map(|(key, _)| key).collect();
        for key in &held {
            self.buffer.mark_failed(key, UNRESOLVED_RECORD_REASON);
        }

        let plan: AttendancePlan = AttendancePlan::build(&entries, &self.record_ids);
        debug!(
            create = plan.create.len(),
            update = plan.update.len(),
            delete = plan.delete.len(),
            noop = plan.noop.len(),
            "Planned attendance save"
        );

        let creates: Vec<NewAttendance> = plan.create.iter().map(NewAttendance::from).collect();
        let updates: Vec<AttendanceChange> =
            plan.update.iter().map(AttendanceChange::from).collect();
        let removals: Vec<AttendanceRemoval> =
            plan.delete.iter().map(AttendanceRemoval::from).collect();

        let (created, updated, deleted) = futures::future::join3(
            self.service.bulk_create(&self.scope, &creates),
            self.service.bulk_update(&self.scope, &updates),
            self.service.bulk_delete(&self.scope, &removals),
        )
        .await;

        let mut reported: BulkOperationResult<AttendanceKey> =
            all_failed(&held, UNRESOLVED_RECORD_REASON);
        let mut banner: Option<String> = None;
        let mut responded: bool = false;

        for key in &plan.noop {
            self.buffer.commit_confirmed(key, None);
            reported.succeeded.push(*key);
        }

        let create_keys: Vec<AttendanceKey> = plan.create.iter().map(|p| p.key).collect();
        let update_keys: Vec<AttendanceKey> = plan.update.iter().map(|p| p.key).collect();
        let delete_keys: Vec<AttendanceKey> = plan.delete.iter().map(|p| p.key).collect();

        for (outcome, batch, deletes) in [
            (created, create_keys, false),
            (updated, update_keys, false),
            (deleted, delete_keys, true),
        ] {
            if batch.is_empty() {
                continue;
            }
            match outcome {
                Ok(outcome) => {
                    responded = true;
                    self.absorb(&outcome, deletes);
                    reported.merge(outcome.result);
                }
                Err(e) => {
                    warn!(error = %e, cells = batch.len(), "Attendance request failed");
                    banner.get_or_insert_with(|| request_failure_banner(&e));
                    reported.merge(all_failed(&batch, &e.to_string()));
                }
            }
        }

        if banner.is_none() && !reported.is_complete_success() {
            banner = Some(partial_failure_banner(reported.failed.len(), reported.len()));
        }

        let refreshed: bool = if responded {
            match self.load().await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "Could not reload the sheet after saving");
                    false
                }
            }
        } else {
            false
        };
        info!(
            saved = reported.succeeded.len(),
            failed = reported.failed.len(),
            "Attendance saved"
        );
        SaveReport {
            result: reported,
            banner,
            refreshed,
        }
    }

    fn absorb(&mut self, outcome: &BulkWriteOutcome, deletes: bool) {
        reconcile(&mut self.buffer, &outcome.result);
        for record in &outcome.records {
            self.record_ids.insert(record.key(), record.id);
        }
        if deletes {
            for key in &outcome.result.succeeded {
                self.buffer.commit_confirmed(key, None);
                self.record_ids.remove(key);
            }
            return;
        }
        for key in &outcome.result.succeeded {
            if !self.record_ids.contains_key(key) {
                self.unresolved.insert(*key);
            }
        }
    }

    /// Gives every student the same status for one course, then reloads the
    /// sheet. Buffered marks are kept. Returns the number of records the
    /// backend touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. A failed reload after a
    /// successful request is logged and does not fail the call.
    pub async fn apply_status_to_all(
        &mut self,
        course_id: CourseId,
        status_id: AttendanceStatusId,
    ) -> Result<u32, ClientError> {
        let request: ApplyStatusRequest = ApplyStatusRequest {
            section_id: self.scope.section_id,
            course_id,
            date: self.scope.date,
            status_id,
        };
        let affected: u32 = self.service.apply_status(&request).await?;
        info!(affected, course = %course_id, "Applied status to the whole section");
        if let Err(e) = self.load().await {
            warn!(error = %e, "Could not reload the sheet after applying a status");
        }
        Ok(affected)
    }
}
