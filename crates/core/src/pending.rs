// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The pending-change buffer.
//!
//! Edits accumulate here, overlaid on the last server snapshot, until a bulk
//! save confirms them. The snapshot itself is never edited in place: it is
//! either replaced wholesale after a load, or receives values the backend
//! has confirmed.

use campus_domain::{AttendanceKey, EnrollmentId, EvaluationKey, StudentId};
use std::collections::BTreeMap;

/// A composite key identifying one editable cell.
pub trait ChangeKey: Ord + Clone + std::fmt::Display {
    /// The grouping a key belongs to for "has unsaved changes" indicators.
    type Scope: PartialEq;

    /// Returns the scope of this key.
    fn scope(&self) -> Self::Scope;
}

impl ChangeKey for EvaluationKey {
    type Scope = EnrollmentId;

    fn scope(&self) -> Self::Scope {
        self.enrollment_id
    }
}

impl ChangeKey for AttendanceKey {
    type Scope = StudentId;

    fn scope(&self) -> Self::Scope {
        self.student_id
    }
}

/// A buffered edit and the reason its last save failed, if it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry<V> {
    value: V,
    failure: Option<String>,
}

impl<V> PendingEntry<V> {
    /// The edited value.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Why the last save of this entry failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

/// Uncommitted edits overlaid on a server snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChangeBuffer<K: ChangeKey, V> {
    snapshot: BTreeMap<K, V>,
    pending: BTreeMap<K, PendingEntry<V>>,
}

impl<K: ChangeKey, V: Clone> PendingChangeBuffer<K, V> {
    /// Creates an empty buffer with an empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            snapshot: BTreeMap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Creates a buffer over an existing snapshot.
    #[must_use]
    pub const fn with_snapshot(snapshot: BTreeMap<K, V>) -> Self {
        Self {
            snapshot,
            pending: BTreeMap::new(),
        }
    }

    /// Replaces the server snapshot wholesale. Pending edits are kept.
    pub fn replace_snapshot(&mut self, snapshot: BTreeMap<K, V>) {
        self.snapshot = snapshot;
    }

    /// The server snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &BTreeMap<K, V> {
        &self.snapshot
    }

    /// The server value for a key, ignoring pending edits.
    #[must_use]
    pub fn server_value(&self, key: &K) -> Option<&V> {
        self.snapshot.get(key)
    }

    /// The value to display for a key: the pending edit if there is one,
    /// otherwise the server value.
    #[must_use]
    pub fn get_value(&self, key: &K) -> Option<&V> {
        self.pending
            .get(key)
            .map(PendingEntry::value)
            .or_else(|| self.snapshot.get(key))
    }

    /// Buffers an edit, replacing any earlier edit of the same key and
    /// clearing its failure annotation.
    pub fn set_value(&mut self, key: K, value: V) {
        self.pending.insert(
            key,
            PendingEntry {
                value,
                failure: None,
            },
        );
    }

    /// Discards the edit of one key. Returns the discarded value.
    pub fn clear(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key).map(|entry| entry.value)
    }

    /// Discards every edit. Returns how many were discarded.
    pub fn clear_all(&mut self) -> usize {
        let count: usize = self.pending.len();
        self.pending.clear();
        count
    }

    /// Returns whether a key has an unsaved edit.
    #[must_use]
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Returns whether any key in `scope` has an unsaved edit.
    #[must_use]
    pub fn has_pending(&self, scope: &K::Scope) -> bool {
        self.pending.keys().any(|key| key.scope() == *scope)
    }

    /// Returns whether any edit is buffered.
    #[must_use]
    pub fn has_any_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of buffered edits.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The buffered entry for a key.
    #[must_use]
    pub fn pending_entry(&self, key: &K) -> Option<&PendingEntry<V>> {
        self.pending.get(key)
    }

    /// Every buffered edit, in key order.
    #[must_use]
    pub fn pending_entries(&self) -> Vec<(K, V)> {
        self.pending
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    /// The failure annotation of a key.
    #[must_use]
    pub fn failure(&self, key: &K) -> Option<&str> {
        self.pending.get(key).and_then(PendingEntry::failure)
    }

    /// Attaches a failure reason to a buffered edit. Returns `false` when
    /// the key has no buffered edit.
    pub fn mark_failed(&mut self, key: &K, reason: &str) -> bool {
        match self.pending.get_mut(key) {
            Some(entry) => {
                entry.failure = Some(reason.to_string());
                true
            }
            None => false,
        }
    }

    /// Moves a buffered edit into the snapshot once the backend has
    /// confirmed it. Returns `false` when the key has no buffered edit.
    pub fn commit(&mut self, key: &K) -> bool {
        match self.pending.remove(key) {
            Some(entry) => {
                self.snapshot.insert(key.clone(), entry.value);
                true
            }
            None => false,
        }
    }

    /// Drops a buffered edit and records the value the backend confirmed.
    /// `None` removes the key from the snapshot.
    pub fn commit_confirmed(&mut self, key: &K, confirmed: Option<V>) {
        self.pending.remove(key);
        match confirmed {
            Some(value) => {
                self.snapshot.insert(key.clone(), value);
            }
            None => {
                self.snapshot.remove(key);
            }
        }
    }
}

impl<K: ChangeKey, V: Clone> Default for PendingChangeBuffer<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
