// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Filter options and section attendance reports.

use crate::error::ClientError;
use crate::transport::{ApiRequest, Transport, fetch};
use campus_domain::{
    AttendanceStatistics, Bimester, BimesterId, CycleId, Grade, GradeId, ReportParams, Section,
    SectionAttendanceReport, SectionId, Week,
};
use std::sync::Arc;
use tracing::warn;

const REPORTS_PATH: &str = "/api/attendance-reports";

/// Read-only access to the attendance report endpoints.
#[derive(Debug)]
pub struct AttendanceReportService<T> {
    transport: Arc<T>,
}

impl<T> Clone for AttendanceReportService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> AttendanceReportService<T> {
    /// Creates a service over a shared transport.
    #[must_use]
    pub const fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Bimesters of a school cycle.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error.
    pub async fn bimesters(&self, cycle_id: CycleId) -> Result<Vec<Bimester>, ClientError> {
        let request: ApiRequest =
            ApiRequest::get(&format!("{REPORTS_PATH}/bimesters")).with_query("cycleId", cycle_id);
        fetch(self.transport.as_ref(), request).await
    }

    /// Grades with activity in a bimester.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error.
    pub async fn grades(&self, bimester_id: BimesterId) -> Result<Vec<Grade>, ClientError> {
        let request: ApiRequest = ApiRequest::get(&format!("{REPORTS_PATH}/grades"))
            .with_query("bimesterId", bimester_id);
        fetch(self.transport.as_ref(), request).await
    }

    /// Sections of a grade in a bimester.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error.
    pub async fn sections(
        &self,
        grade_id: GradeId,
        bimester_id: BimesterId,
    ) -> Result<Vec<Section>, ClientError> {
        let request: ApiRequest = ApiRequest::get(&format!("{REPORTS_PATH}/sections"))
            .with_query("gradeId", grade_id)
            .with_query("bimesterId", bimester_id);
        fetch(self.transport.as_ref(), request).await
    }

    /// Weeks of a bimester.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error.
    pub async fn weeks(&self, bimester_id: BimesterId) -> Result<Vec<Week>, ClientError> {
        let request: ApiRequest = ApiRequest::get(&format!("{REPORTS_PATH}/weeks"))
            .with_query("bimesterId", bimester_id);
        fetch(self.transport.as_ref(), request).await
    }

    /// The attendance report of a section.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error.
    pub async fn section_report(
        &self,
        section_id: SectionId,
        params: &ReportParams,
    ) -> Result<SectionAttendanceReport, ClientError> {
        let request: ApiRequest =
            with_params(ApiRequest::get(&format!("{REPORTS_PATH}/section/{section_id}")), params);
        fetch(self.transport.as_ref(), request).await
    }

    /// Attendance statistics of a section.
    ///
    /// Backends without the statistics endpoint answer 404; the statistics
    /// are then computed from the section report.
    ///
    /// # Errors
    ///
    /// Returns any transport or decoding error other than a 404 from the
    /// statistics endpoint.
    pub async fn section_statistics(
        &self,
        section_id: SectionId,
        params: &ReportParams,
    ) -> Result<AttendanceStatistics, ClientError> {
        let request: ApiRequest = with_params(
            ApiRequest::get(&format!("{REPORTS_PATH}/section/{section_id}/statistics")),
            params,
        );
        match fetch(self.transport.as_ref(), request).await {
            Err(e) if e.is_not_found() => {
                warn!(
                    section = %section_id,
                    "Statistics endpoint unavailable, computing from the section report"
                );
                let report: SectionAttendanceReport =
                    self.section_report(section_id, params).await?;
                Ok(AttendanceStatistics::from_report(&report))
            }
            other => other,
        }
    }
}

fn with_params(request: ApiRequest, params: &ReportParams) -> ApiRequest {
    params
        .query_pairs()
        .into_iter()
        .fold(request, |request, (name, value)| request.with_query(name, value))
}
