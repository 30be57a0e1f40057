// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance sheet endpoints and the cached lookup lists.

use crate::cache::{GRADES_CACHE_KEY, LookupCache, STATUSES_CACHE_KEY};
use crate::error::ClientError;
use crate::transport::{ApiRequest, Transport, fetch, fetch_write};
use campus::{BulkFailure, BulkOperationResult, PlannedCreate, PlannedDelete, PlannedUpdate};
use campus_domain::{
    AttendanceId, AttendanceKey, AttendanceRecord, AttendanceStatus, AttendanceStatusId, CourseId,
    Grade, SectionId, StudentId, date_format,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use time::Date;
use tracing::{debug, warn};

const ATTENDANCE_PATH: &str = "/api/attendance";

/// The section and day an attendance sheet covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetScope {
    /// The section.
    pub section_id: SectionId,
    /// Restricts the sheet to one course.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<CourseId>,
    /// The day.
    #[serde(with = "date_format")]
    pub date: Date,
}

impl SheetScope {
    /// Creates a scope.
    #[must_use]
    pub const fn new(section_id: SectionId, course_id: Option<CourseId>, date: Date) -> Self {
        Self {
            section_id,
            course_id,
            date,
        }
    }
}

/// A record to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    /// The student.
    pub student_id: StudentId,
    /// The course.
    pub course_id: CourseId,
    /// The status to record.
    pub status_id: AttendanceStatusId,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&PlannedCreate> for NewAttendance {
    fn from(planned: &PlannedCreate) -> Self {
        Self {
            student_id: planned.key.student_id,
            course_id: planned.key.course_id,
            status_id: planned.status_id,
            notes: planned.notes.clone(),
        }
    }
}

/// A change to an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceChange {
    /// The record.
    pub id: AttendanceId,
    /// The student, echoed so the backend can report per cell.
    pub student_id: StudentId,
    /// The course, echoed so the backend can report per cell.
    pub course_id: CourseId,
    /// The new status.
    pub status_id: AttendanceStatusId,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&PlannedUpdate> for AttendanceChange {
    fn from(planned: &PlannedUpdate) -> Self {
        Self {
            id: planned.record_id,
            student_id: planned.key.student_id,
            course_id: planned.key.course_id,
            status_id: planned.status_id,
            notes: planned.notes.clone(),
        }
    }
}

/// A record to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRemoval {
    /// The record.
    pub id: AttendanceId,
    /// The student, echoed so the backend can report per cell.
    pub student_id: StudentId,
    /// The course, echoed so the backend can report per cell.
    pub course_id: CourseId,
}

impl From<&PlannedDelete> for AttendanceRemoval {
    fn from(planned: &PlannedDelete) -> Self {
        Self {
            id: planned.record_id,
            student_id: planned.key.student_id,
            course_id: planned.key.course_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkBody<'a, R: Serialize> {
    #[serde(flatten)]
    scope: &'a SheetScope,
    records: &'a [R],
}

/// A cell the backend refused to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedAttendance {
    /// The student.
    pub student_id: StudentId,
    /// The course.
    pub course_id: CourseId,
    /// Why the cell was refused.
    #[serde(alias = "error", alias = "message")]
    pub reason: String,
}

/// Payload of the bulk create, update, and delete responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkWriteResponse {
    /// Cells the backend wrote.
    #[serde(default)]
    pub succeeded: Vec<AttendanceKey>,
    /// Cells the backend refused.
    #[serde(default)]
    pub failed: Vec<FailedAttendance>,
    /// Records as stored after the write, when the backend returns them.
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
}

/// Outcome of one bulk attendance request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkWriteOutcome {
    /// Per-cell result for the keys that were sent.
    pub result: BulkOperationResult<AttendanceKey>,
    /// Records returned by the backend.
    pub records: Vec<AttendanceRecord>,
}

impl BulkWriteResponse {
    /// Maps the response onto the keys that were sent.
    ///
    /// A response that lists no cells acknowledges the whole batch. Records
    /// returned without a matching `succeeded` entry count as written.
    #[must_use]
    pub fn into_outcome(self, batch: &[AttendanceKey]) -> BulkWriteOutcome {
        let mut succeeded: Vec<AttendanceKey> = self.succeeded;
        succeeded.extend(self.records.iter().map(AttendanceRecord::key));

        let result: BulkOperationResult<AttendanceKey> =
            if succeeded.is_empty() && self.failed.is_empty() {
                BulkOperationResult {
                    succeeded: batch.to_vec(),
                    failed: Vec::new(),
                }
            } else {
                let failed: Vec<BulkFailure<AttendanceKey>> = self
                    .failed
                    .into_iter()
                    .map(|failure| BulkFailure {
                        key: AttendanceKey::new(failure.student_id, failure.course_id),
                        reason: failure.reason,
                    })
                    .collect();
                BulkOperationResult::from_reported(batch, &succeeded, failed)
            };
        BulkWriteOutcome {
            result,
            records: self.records,
        }
    }
}

/// Body of `POST /api/attendance/bulk-apply-status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyStatusRequest {
    /// The section.
    pub section_id: SectionId,
    /// The course.
    pub course_id: CourseId,
    /// The day.
    #[serde(with = "date_format")]
    pub date: Date,
    /// The status given to every student.
    pub status_id: AttendanceStatusId,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplyStatusResponse {
    #[serde(default)]
    affected: u32,
}

/// Access to the attendance endpoints.
pub struct AttendanceService<T> {
    transport: Arc<T>,
    cache: Arc<dyn LookupCache>,
    lookup_ttl: Duration,
}

impl<T> Clone for AttendanceService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cache: Arc::clone(&self.cache),
            lookup_ttl: self.lookup_ttl,
        }
    }
}

impl<T> fmt::Debug for AttendanceService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttendanceService")
            .field("lookup_ttl", &self.lookup_ttl)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> AttendanceService<T> {
    /// Creates a service over a shared transport and lookup cache.
    #[must_use]
    pub fn new(transport: Arc<T>, cache: Arc<dyn LookupCache>, lookup_ttl: Duration) -> Self {
        Self {
            transport,
            cache,
            lookup_ttl,
        }
    }

    /// The recorded attendance of a section for one day.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error.
    pub async fn sheet(&self, scope: &SheetScope) -> Result<Vec<AttendanceRecord>, ClientError> {
        let mut request: ApiRequest =
            ApiRequest::get(ATTENDANCE_PATH).with_query("sectionId", scope.section_id);
        if let Some(course_id) = scope.course_id {
            request = request.with_query("courseId", course_id);
        }
        let request: ApiRequest =
            request.with_query("date", date_format::format_date(scope.date));
        fetch(self.transport.as_ref(), request).await
    }

    /// Creates records.
    ///
    /// # Errors
    ///
    /// Returns an error when the request as a whole fails.
    pub async fn bulk_create(
        &self,
        scope: &SheetScope,
        records: &[NewAttendance],
    ) -> Result<BulkWriteOutcome, ClientError> {
        let batch: Vec<AttendanceKey> = records
            .iter()
            .map(|r| AttendanceKey::new(r.student_id, r.course_id))
            .collect();
        let body: serde_json::Value = serde_json::to_value(BulkBody { scope, records })?;
        self.bulk_write(ApiRequest::post(&bulk_path(), body), &batch)
            .await
    }

    /// Updates records.
    ///
    /// # Errors
    ///
    /// Returns an error when the request as a whole fails.
    pub async fn bulk_update(
        &self,
        scope: &SheetScope,
        records: &[AttendanceChange],
    ) -> Result<BulkWriteOutcome, ClientError> {
        let batch: Vec<AttendanceKey> = records
            .iter()
            .map(|r| AttendanceKey::new(r.student_id, r.course_id))
            .collect();
        let body: serde_json::Value = serde_json::to_value(BulkBody { scope, records })?;
        self.bulk_write(ApiRequest::patch(&bulk_path(), body), &batch)
            .await
    }

    /// Deletes records.
    ///
    /// # Errors
    ///
    /// Returns an error when the request as a whole fails.
    pub async fn bulk_delete(
        &self,
        scope: &SheetScope,
        records: &[AttendanceRemoval],
    ) -> Result<BulkWriteOutcome, ClientError> {
        let batch: Vec<AttendanceKey> = records
            .iter()
            .map(|r| AttendanceKey::new(r.student_id, r.course_id))
            .collect();
        let body: serde_json::Value = serde_json::to_value(BulkBody { scope, records })?;
        self.bulk_write(ApiRequest::delete(&bulk_path(), body), &batch)
            .await
    }

    async fn bulk_write(
        &self,
        request: ApiRequest,
        batch: &[AttendanceKey],
    ) -> Result<BulkWriteOutcome, ClientError> {
        if batch.is_empty() {
            return Ok(BulkWriteOutcome::default());
        }
        let method: &'static str = request.method.as_str();
        debug!(method, cells = batch.len(), "Writing attendance");
        let response: BulkWriteResponse = fetch_write(self.transport.as_ref(), request).await?;
        let outcome: BulkWriteOutcome = response.into_outcome(batch);
        if !outcome.result.is_complete_success() {
            warn!(
                method,
                failed = outcome.result.failed.len(),
                "Attendance written partially"
            );
        }
        Ok(outcome)
    }

    /// Gives every student of a section the same status for one course and
    /// day. Returns the number of records the backend touched.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error.
    pub async fn apply_status(&self, request: &ApplyStatusRequest) -> Result<u32, ClientError> {
        let body: serde_json::Value = serde_json::to_value(request)?;
        let response: ApplyStatusResponse = fetch_write(
            self.transport.as_ref(),
            ApiRequest::post(&format!("{ATTENDANCE_PATH}/bulk-apply-status"), body),
        )
        .await?;
        Ok(response.affected)
    }

    /// The attendance statuses, from the cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error on a cache miss.
    pub async fn statuses(&self) -> Result<Vec<AttendanceStatus>, ClientError> {
        self.cached_lookup(STATUSES_CACHE_KEY, &format!("{ATTENDANCE_PATH}/statuses"))
            .await
    }

    /// The grades offered for attendance, from the cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error on a cache miss.
    pub async fn grades(&self) -> Result<Vec<Grade>, ClientError> {
        self.cached_lookup(GRADES_CACHE_KEY, &format!("{ATTENDANCE_PATH}/grades"))
            .await
    }

    /// Drops both cached lookup lists.
    pub fn invalidate_lookups(&self) {
        self.cache.clear(STATUSES_CACHE_KEY);
        self.cache.clear(GRADES_CACHE_KEY);
    }

    async fn cached_lookup<R>(&self, cache_key: &str, path: &str) -> Result<Vec<R>, ClientError>
    where
        R: Serialize + DeserializeOwned,
    {
        if let Some(cached) = self.cache.get(cache_key) {
            match serde_json::from_value::<Vec<R>>(cached) {
                Ok(items) => {
                    debug!(cache_key, "Lookup served from cache");
                    return Ok(items);
                }
                Err(e) => {
                    debug!(cache_key, error = %e, "Evicting cached lookup of the wrong shape");
                    self.cache.clear(cache_key);
                }
            }
        }

        let items: Vec<R> = fetch(self.transport.as_ref(), ApiRequest::get(path)).await?;
        match serde_json::to_value(&items) {
            Ok(value) => self.cache.set(cache_key, value, self.lookup_ttl),
            Err(e) => debug!(cache_key, error = %e, "Lookup not cached"),
        }
        Ok(items)
    }
}

fn bulk_path() -> String {
    format!("{ATTENDANCE_PATH}/bulk")
}
