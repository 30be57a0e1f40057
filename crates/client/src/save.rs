// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ClientError;
use campus::{BulkFailure, BulkOperationResult, ChangeKey};

/// What a save of buffered edits did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport<K> {
    /// Per-entry outcome. Entries of a request that failed as a whole are
    /// listed as failed here but left unannotated in the buffer.
    pub result: BulkOperationResult<K>,
    /// A single message for the user when anything went wrong.
    pub banner: Option<String>,
    /// Whether the snapshot was reloaded from the backend afterwards.
    pub refreshed: bool,
}

impl<K: ChangeKey> SaveReport<K> {
    /// A save with nothing to send.
    #[must_use]
    pub const fn nothing_to_save() -> Self {
        Self {
            result: BulkOperationResult::new(),
            banner: None,
            refreshed: false,
        }
    }

    /// Returns whether every entry was saved.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.banner.is_none() && self.result.is_complete_success()
    }
}

/// Banner shown when some entries were refused.
pub(crate) fn partial_failure_banner(failed: usize, total: usize) -> String {
    format!("{failed} of {total} changes could not be saved")
}

/// Banner shown when a request failed as a whole.
pub(crate) fn request_failure_banner(err: &ClientError) -> String {
    format!("Could not save changes: {err}")
}

/// Lists every key of a batch as failed with the same reason.
pub(crate) fn all_failed<K: ChangeKey>(batch: &[K], reason: &str) -> BulkOperationResult<K> {
    BulkOperationResult {
        succeeded: Vec::new(),
        failed: batch
            .iter()
            .map(|key| BulkFailure {
                key: key.clone(),
                reason: reason.to_string(),
            })
            .collect(),
    }
}
