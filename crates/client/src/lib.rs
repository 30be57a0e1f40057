// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! Backend access for the Campus records client.
//!
//! Services map the REST endpoints onto typed requests and responses.
//! Loaders keep option lists and reports in step with the filter cascade,
//! and the editors flush buffered edits through the bulk endpoints.

mod attendance;
mod cache;
mod cancel;
mod client;
mod config;
mod envelope;
mod error;
mod evaluations;
mod grid_editor;
mod http;
mod loader;
mod reports;
mod save;
mod session;
mod sheet_editor;
mod transport;

#[cfg(test)]
mod tests;

pub use attendance::{
    ApplyStatusRequest, AttendanceChange, AttendanceRemoval, AttendanceService,
    BulkWriteOutcome, BulkWriteResponse, FailedAttendance, NewAttendance, SheetScope,
};
pub use cache::{
    CacheEnvelope, Clock, GRADES_CACHE_KEY, LookupCache, ManualClock, MemoryCache,
    STATUSES_CACHE_KEY, SystemClock,
};
pub use cancel::CancellationToken;
pub use client::CampusClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_LOOKUP_TTL};
pub use envelope::ApiEnvelope;
pub use error::ClientError;
pub use evaluations::{
    EvaluationService, FailedEvaluation, GridSaveEntry, GridSaveRequest, GridSaveResponse,
};
pub use grid_editor::{EvaluationGridEditor, GridScope};
pub use http::HttpTransport;
pub use loader::{Loadable, Loader};
pub use reports::AttendanceReportService;
pub use save::SaveReport;
pub use session::{FilterSession, ReportKey, SectionOptionsKey};
pub use sheet_editor::{AttendanceSheetEditor, UNRESOLVED_RECORD_REASON};
pub use transport::{ApiRequest, Method, Transport, fetch, fetch_write};
