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

//! Client-side state for the Campus records application.
//!
//! Everything here is synchronous and free of I/O: the filter cascade, the
//! pending-change buffer, and the logic that folds bulk-save results back
//! into it. The `campus-client` crate wires these to the backend.

mod attendance_plan;
mod error;
mod filter;
mod pattern;
mod pending;
mod reconcile;

#[cfg(test)]
mod tests;

pub use attendance_plan::{AttendancePlan, PlannedCreate, PlannedDelete, PlannedUpdate};
pub use error::CoreError;
pub use filter::{FilterLevel, FilterState, InitialFilters};
pub use pattern::{GridPattern, apply_pattern};
pub use pending::{ChangeKey, PendingChangeBuffer, PendingEntry};
pub use reconcile::{
    BulkFailure, BulkOperationResult, ReconcileSummary, UNACKNOWLEDGED_REASON, reconcile,
};
