// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Buffered editing of one evaluation grid.

use crate::error::ClientError;
use crate::evaluations::{EvaluationService, GridSaveEntry, GridSaveRequest};
use crate::save::{SaveReport, all_failed, partial_failure_banner, request_failure_banner};
use crate::transport::Transport;
use campus::{
    BulkOperationResult, GridPattern, PendingChangeBuffer, ReconcileSummary, apply_pattern,
    reconcile,
};
use campus_domain::{
    BimesterId, EnrollmentId, EvaluationGrid, EvaluationKey, GridCell, SectionId, TeacherId,
    TopicId,
};
use tracing::{debug, info, warn};

/// Which grid an editor works on, and who is editing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridScope {
    /// The evaluated topic.
    pub topic_id: TopicId,
    /// The section.
    pub section_id: SectionId,
    /// The bimester.
    pub bimester_id: BimesterId,
    /// The teacher saving the edits.
    pub teacher_id: TeacherId,
}

/// Holds the server grid and the edits made on top of it.
#[derive(Debug)]
pub struct EvaluationGridEditor<T> {
    service: EvaluationService<T>,
    scope: GridScope,
    grid: Option<EvaluationGrid>,
    buffer: PendingChangeBuffer<EvaluationKey, GridCell>,
}

impl<T: Transport> EvaluationGridEditor<T> {
    /// Creates an editor with nothing loaded.
    #[must_use]
    pub fn new(service: EvaluationService<T>, scope: GridScope) -> Self {
        Self {
            service,
            scope,
            grid: None,
            buffer: PendingChangeBuffer::new(),
        }
    }

    /// The grid being edited.
    #[must_use]
    pub const fn scope(&self) -> &GridScope {
        &self.scope
    }

    /// The last grid loaded from the backend.
    #[must_use]
    pub const fn grid(&self) -> Option<&EvaluationGrid> {
        self.grid.as_ref()
    }

    /// Loads the grid and replaces the snapshot. Buffered edits are kept.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error; the previous snapshot is
    /// kept in that case.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let grid: EvaluationGrid = self
            .service
            .grid(
                self.scope.topic_id,
                self.scope.section_id,
                self.scope.bimester_id,
            )
            .await?;
        self.buffer.replace_snapshot(grid.cells());
        self.grid = Some(grid);
        Ok(())
    }

    /// The cell to display: the buffered edit, else the server value.
    #[must_use]
    pub fn get_value(&self, key: &EvaluationKey) -> Option<&GridCell> {
        self.buffer.get_value(key)
    }

    /// Buffers an edit.
    pub fn set_value(&mut self, key: EvaluationKey, cell: GridCell) {
        self.buffer.set_value(key, cell);
    }

    /// Drops the buffered edit of one cell.
    pub fn clear(&mut self, key: &EvaluationKey) -> Option<GridCell> {
        self.buffer.clear(key)
    }

    /// Drops every buffered edit. Returns how many were dropped.
    pub fn discard(&mut self) -> usize {
        self.buffer.clear_all()
    }

    /// Returns whether a student row has buffered edits.
    #[must_use]
    pub fn has_pending(&self, enrollment_id: EnrollmentId) -> bool {
        self.buffer.has_pending(&enrollment_id)
    }

    /// Number of buffered edits.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.buffer.pending_count()
    }

    /// Why the last save refused this cell, if it did.
    #[must_use]
    pub fn failure(&self, key: &EvaluationKey) -> Option<&str> {
        self.buffer.failure(key)
    }

    /// The underlying buffer.
    #[must_use]
    pub const fn buffer(&self) -> &PendingChangeBuffer<EvaluationKey, GridCell> {
        &self.buffer
    }

    /// Buffers the edits of a fill pattern over the loaded grid. Returns
    /// the number of cells edited; nothing happens before a load.
    pub fn apply_pattern(&mut self, pattern: &GridPattern) -> usize {
        let Some(grid) = &self.grid else {
            return 0;
        };
        let keys: Vec<EvaluationKey> = grid.keys();
        apply_pattern(&mut self.buffer, &keys, pattern)
    }

    /// Sends every buffered edit in one request and reconciles the result.
    ///
    /// Saved cells leave the buffer. Refused cells stay with the reason
    /// attached. When the request fails as a whole the buffer is left
    /// untouched. After a response the grid is reloaded.
    pub async fn save(&mut self) -> SaveReport<EvaluationKey> {
        let entries: Vec<(EvaluationKey, GridCell)> = self.buffer.pending_entries();
        if entries.is_empty() {
            return SaveReport::nothing_to_save();
        }
        let batch: Vec<EvaluationKey> = entries.iter().map(|(key, _)| *key).collect();
        let request: GridSaveRequest = GridSaveRequest {
            topic_id: self.scope.topic_id,
            teacher_id: self.scope.teacher_id,
            evaluations: entries
                .into_iter()
                .map(|(key, cell)| GridSaveEntry::from_edit(key, cell))
                .collect(),
        };

        let result: BulkOperationResult<EvaluationKey> = match self.service.save_grid(request).await
        {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Evaluation grid save failed");
                let banner: String = request_failure_banner(&e);
                return SaveReport {
                    result: all_failed(&batch, &e.to_string()),
                    banner: Some(banner),
                    refreshed: false,
                };
            }
        };

        let summary: ReconcileSummary = reconcile(&mut self.buffer, &result);
        debug!(?summary, "Reconciled evaluation grid save");
        let banner: Option<String> = (!result.is_complete_success())
            .then(|| partial_failure_banner(result.failed.len(), result.len()));

        let refreshed: bool = match self.load().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Could not reload the grid after saving");
                false
            }
        };
        info!(
            saved = result.succeeded.len(),
            failed = result.failed.len(),
            "Evaluation grid saved"
        );
        SaveReport {
            result,
            banner,
            refreshed,
        }
    }
}
