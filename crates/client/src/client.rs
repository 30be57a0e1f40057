// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::attendance::{AttendanceService, SheetScope};
use crate::cache::{LookupCache, MemoryCache};
use crate::config::{ClientConfig, DEFAULT_LOOKUP_TTL};
use crate::error::ClientError;
use crate::evaluations::EvaluationService;
use crate::grid_editor::{EvaluationGridEditor, GridScope};
use crate::http::HttpTransport;
use crate::reports::AttendanceReportService;
use crate::session::FilterSession;
use crate::sheet_editor::AttendanceSheetEditor;
use crate::transport::Transport;
use campus::InitialFilters;
use std::sync::Arc;
use std::time::Duration;

/// Entry point bundling every service over one transport and cache.
pub struct CampusClient<T> {
    reports: AttendanceReportService<T>,
    evaluations: EvaluationService<T>,
    attendance: AttendanceService<T>,
}

impl<T> Clone for CampusClient<T> {
    fn clone(&self) -> Self {
        Self {
            reports: self.reports.clone(),
            evaluations: self.evaluations.clone(),
            attendance: self.attendance.clone(),
        }
    }
}

impl<T> std::fmt::Debug for CampusClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampusClient").finish_non_exhaustive()
    }
}

impl CampusClient<HttpTransport> {
    /// Connects to the configured backend with an in-memory lookup cache.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the configuration is invalid.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let lookup_ttl: Duration = config.lookup_ttl;
        let transport: HttpTransport = HttpTransport::new(config)?;
        Ok(Self::with_transport(
            transport,
            Arc::new(MemoryCache::new()),
            lookup_ttl,
        ))
    }
}

impl<T: Transport> CampusClient<T> {
    /// Builds a client over any transport and cache.
    #[must_use]
    pub fn with_transport(transport: T, cache: Arc<dyn LookupCache>, lookup_ttl: Duration) -> Self {
        let transport: Arc<T> = Arc::new(transport);
        Self {
            reports: AttendanceReportService::new(Arc::clone(&transport)),
            evaluations: EvaluationService::new(Arc::clone(&transport)),
            attendance: AttendanceService::new(transport, cache, lookup_ttl),
        }
    }

    /// Builds a client over a transport with a fresh in-memory cache.
    #[must_use]
    pub fn with_default_cache(transport: T) -> Self {
        Self::with_transport(transport, Arc::new(MemoryCache::new()), DEFAULT_LOOKUP_TTL)
    }

    /// The report and filter option endpoints.
    #[must_use]
    pub const fn reports(&self) -> &AttendanceReportService<T> {
        &self.reports
    }

    /// The evaluation grid endpoints.
    #[must_use]
    pub const fn evaluations(&self) -> &EvaluationService<T> {
        &self.evaluations
    }

    /// The attendance endpoints.
    #[must_use]
    pub const fn attendance(&self) -> &AttendanceService<T> {
        &self.attendance
    }

    /// Starts a filter session. Must be called inside a tokio runtime.
    #[must_use]
    pub fn filter_session(&self, initial: InitialFilters) -> FilterSession {
        FilterSession::new(&self.reports, initial)
    }

    /// Creates an editor for one evaluation grid.
    #[must_use]
    pub fn grid_editor(&self, scope: GridScope) -> EvaluationGridEditor<T> {
        EvaluationGridEditor::new(self.evaluations.clone(), scope)
    }

    /// Creates an editor for one attendance sheet.
    #[must_use]
    pub fn sheet_editor(&self, scope: SheetScope) -> AttendanceSheetEditor<T> {
        AttendanceSheetEditor::new(self.attendance.clone(), scope)
    }
}
