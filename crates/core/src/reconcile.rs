// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reconciliation of bulk-save results with the pending-change buffer.

use crate::pending::{ChangeKey, PendingChangeBuffer};
use std::collections::BTreeSet;

/// Reason attached to batch entries the backend did not mention.
pub const UNACKNOWLEDGED_REASON: &str = "No result was reported for this entry";

/// One entry the backend refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure<K> {
    /// The refused entry.
    pub key: K,
    /// Why it was refused.
    pub reason: String,
}

/// Per-entry outcome of one bulk save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOperationResult<K> {
    /// Entries the backend persisted.
    pub succeeded: Vec<K>,
    /// Entries the backend refused.
    pub failed: Vec<BulkFailure<K>>,
}

impl<K: ChangeKey> BulkOperationResult<K> {
    /// Creates an empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Builds a result for `batch` from what the backend reported.
    ///
    /// Every batch entry ends up in exactly one list. A refusal wins over a
    /// success for the same key. Entries the backend did not mention count
    /// as failed, and keys outside the batch are ignored.
    #[must_use]
    pub fn from_reported(batch: &[K], succeeded: &[K], failed: Vec<BulkFailure<K>>) -> Self {
        let in_batch: BTreeSet<&K> = batch.iter().collect();
        let mut result: Self = Self::new();
        let mut failed_keys: BTreeSet<K> = BTreeSet::new();

        for failure in failed {
            if in_batch.contains(&failure.key) && failed_keys.insert(failure.key.clone()) {
                result.failed.push(failure);
            }
        }

        let reported_ok: BTreeSet<&K> = succeeded.iter().collect();
        for key in batch {
            if failed_keys.contains(key) {
                continue;
            }
            if reported_ok.contains(key) {
                result.succeeded.push(key.clone());
            } else {
                result.failed.push(BulkFailure {
                    key: key.clone(),
                    reason: String::from(UNACKNOWLEDGED_REASON),
                });
            }
        }
        result
    }

    /// Appends another result to this one.
    pub fn merge(&mut self, other: Self) {
        self.succeeded.extend(other.succeeded);
        self.failed.extend(other.failed);
    }

    /// Returns whether every entry succeeded.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of entries covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Returns whether no entries are covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: ChangeKey> Default for BulkOperationResult<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts produced by [`reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileSummary {
    /// Edits moved into the snapshot.
    pub committed: usize,
    /// Edits kept in the buffer with a failure annotation.
    pub retained: usize,
    /// Result keys that had no buffered edit.
    pub unknown: usize,
}

/// Applies a bulk result to the buffer.
///
/// Succeeded keys leave the buffer and their values enter the snapshot.
/// Failed keys stay buffered with the failure reason attached.
pub fn reconcile<K: ChangeKey, V: Clone>(
    buffer: &mut PendingChangeBuffer<K, V>,
    result: &BulkOperationResult<K>,
) -> ReconcileSummary {
    let mut summary: ReconcileSummary = ReconcileSummary::default();
    for key in &result.succeeded {
        if buffer.commit(key) {
            summary.committed += 1;
        } else {
            summary.unknown += 1;
        }
    }
    for failure in &result.failed {
        if buffer.mark_failed(&failure.key, &failure.reason) {
            summary.retained += 1;
        } else {
            summary.unknown += 1;
        }
    }
    summary
}
