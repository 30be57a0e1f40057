// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Evaluation grid endpoints.

use crate::error::ClientError;
use crate::transport::{ApiRequest, Transport, fetch, fetch_write};
use campus::{BulkFailure, BulkOperationResult};
use campus_domain::{
    BimesterId, CategoryId, EnrollmentId, EvaluationGrid, EvaluationKey, GridCell, ScaleCode,
    SectionId, TeacherId, TopicId,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

const GRID_PATH: &str = "/api/erica-evaluations/grid";

/// One cell of a grid save request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSaveEntry {
    /// The student row.
    pub enrollment_id: EnrollmentId,
    /// The category column.
    pub category_id: CategoryId,
    /// The new scale code.
    pub scale_code: ScaleCode,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl GridSaveEntry {
    /// Builds the request entry for a buffered edit.
    #[must_use]
    pub fn from_edit(key: EvaluationKey, cell: GridCell) -> Self {
        Self {
            enrollment_id: key.enrollment_id,
            category_id: key.category_id,
            scale_code: cell.scale_code,
            notes: cell.notes,
        }
    }

    /// The grid cell this entry writes.
    #[must_use]
    pub const fn key(&self) -> EvaluationKey {
        EvaluationKey::new(self.enrollment_id, self.category_id)
    }
}

/// Body of `POST /api/erica-evaluations/grid/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSaveRequest {
    /// The evaluated topic.
    pub topic_id: TopicId,
    /// The teacher recording the evaluations.
    pub teacher_id: TeacherId,
    /// Upserted cells.
    pub evaluations: Vec<GridSaveEntry>,
}

/// A cell the backend refused to save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedEvaluation {
    /// The student row.
    pub enrollment_id: EnrollmentId,
    /// The category column.
    pub category_id: CategoryId,
    /// Why the cell was refused.
    #[serde(alias = "error", alias = "message")]
    pub reason: String,
}

/// Payload of a grid save response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSaveResponse {
    /// Cells the backend persisted.
    #[serde(default)]
    pub saved: Vec<EvaluationKey>,
    /// Cells the backend refused.
    #[serde(default)]
    pub failed: Vec<FailedEvaluation>,
}

impl GridSaveResponse {
    /// Maps the response onto the keys that were sent.
    ///
    /// A response that lists nothing acknowledges the whole batch.
    #[must_use]
    pub fn into_result(self, batch: &[EvaluationKey]) -> BulkOperationResult<EvaluationKey> {
        if self.saved.is_empty() && self.failed.is_empty() {
            return BulkOperationResult {
                succeeded: batch.to_vec(),
                failed: Vec::new(),
            };
        }
        let failed: Vec<BulkFailure<EvaluationKey>> = self
            .failed
            .into_iter()
            .map(|failure| BulkFailure {
                key: EvaluationKey::new(failure.enrollment_id, failure.category_id),
                reason: failure.reason,
            })
            .collect();
        BulkOperationResult::from_reported(batch, &self.saved, failed)
    }
}

/// Access to the evaluation grid endpoints.
#[derive(Debug)]
pub struct EvaluationService<T> {
    transport: Arc<T>,
}

impl<T> Clone for EvaluationService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> EvaluationService<T> {
    /// Creates a service over a shared transport.
    #[must_use]
    pub const fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// The evaluation grid of a topic for one section and bimester.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error.
    pub async fn grid(
        &self,
        topic_id: TopicId,
        section_id: SectionId,
        bimester_id: BimesterId,
    ) -> Result<EvaluationGrid, ClientError> {
        let request: ApiRequest = ApiRequest::get(GRID_PATH)
            .with_query("topicId", topic_id)
            .with_query("sectionId", section_id)
            .with_query("bimesterId", bimester_id);
        fetch(self.transport.as_ref(), request).await
    }

    /// Upserts grid cells in one request.
    ///
    /// # Errors
    ///
    /// Returns an error when the request as a whole fails. Refusals of
    /// individual cells are reported in the result instead.
    pub async fn save_grid(
        &self,
        request: GridSaveRequest,
    ) -> Result<BulkOperationResult<EvaluationKey>, ClientError> {
        let batch: Vec<EvaluationKey> = request.evaluations.iter().map(GridSaveEntry::key).collect();
        if batch.is_empty() {
            return Ok(BulkOperationResult::new());
        }
        debug!(topic = %request.topic_id, cells = batch.len(), "Saving evaluation grid");

        let body: serde_json::Value = serde_json::to_value(&request)?;
        let save: ApiRequest = ApiRequest::post(&format!("{GRID_PATH}/save"), body);
        let response: GridSaveResponse = fetch_write(self.transport.as_ref(), save).await?;
        let result: BulkOperationResult<EvaluationKey> = response.into_result(&batch);
        if !result.is_complete_success() {
            warn!(
                topic = %request.topic_id,
                failed = result.failed.len(),
                "Evaluation grid saved partially"
            );
        }
        Ok(result)
    }
}
