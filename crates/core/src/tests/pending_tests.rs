// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::PendingChangeBuffer;
use crate::tests::helpers::{cell, eval_key};
use campus_domain::{EnrollmentId, EvaluationKey, GridCell};
use std::collections::BTreeMap;

fn buffer_with_server_cell() -> PendingChangeBuffer<EvaluationKey, GridCell> {
    let mut snapshot: BTreeMap<EvaluationKey, GridCell> = BTreeMap::new();
    snapshot.insert(eval_key(5, 1), cell("P"));
    PendingChangeBuffer::with_snapshot(snapshot)
}

#[test]
fn test_get_value_prefers_pending_then_server_then_none() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = buffer_with_server_cell();

    assert_eq!(buffer.get_value(&eval_key(5, 1)), Some(&cell("P")));
    assert_eq!(buffer.get_value(&eval_key(5, 2)), None);

    buffer.set_value(eval_key(5, 1), cell("E"));
    buffer.set_value(eval_key(5, 2), cell("L"));

    assert_eq!(buffer.get_value(&eval_key(5, 1)), Some(&cell("E")));
    assert_eq!(buffer.get_value(&eval_key(5, 2)), Some(&cell("L")));
    assert_eq!(buffer.get_value(&eval_key(6, 1)), None);
}

#[test]
fn test_pending_override_never_touches_snapshot() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = buffer_with_server_cell();
    buffer.set_value(eval_key(5, 1), cell("E"));

    assert_eq!(buffer.server_value(&eval_key(5, 1)), Some(&cell("P")));
    assert_eq!(buffer.snapshot().len(), 1);
}

#[test]
fn test_re_edit_overwrites_and_clears_failure() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = PendingChangeBuffer::new();
    buffer.set_value(eval_key(5, 1), cell("E"));
    assert!(buffer.mark_failed(&eval_key(5, 1), "locked"));
    assert_eq!(buffer.failure(&eval_key(5, 1)), Some("locked"));

    buffer.set_value(eval_key(5, 1), cell("P"));
    assert_eq!(buffer.get_value(&eval_key(5, 1)), Some(&cell("P")));
    assert_eq!(buffer.failure(&eval_key(5, 1)), None);
    assert_eq!(buffer.pending_count(), 1);
}

#[test]
fn test_clear_restores_server_value() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = buffer_with_server_cell();
    buffer.set_value(eval_key(5, 1), cell("E"));

    assert_eq!(buffer.clear(&eval_key(5, 1)), Some(cell("E")));
    assert_eq!(buffer.get_value(&eval_key(5, 1)), Some(&cell("P")));
    assert_eq!(buffer.clear(&eval_key(5, 1)), None);
}

#[test]
fn test_clear_all_discards_every_edit() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = buffer_with_server_cell();
    buffer.set_value(eval_key(5, 1), cell("E"));
    buffer.set_value(eval_key(6, 1), cell("E"));

    assert_eq!(buffer.clear_all(), 2);
    assert!(!buffer.has_any_pending());
    assert_eq!(buffer.snapshot().len(), 1);
}

#[test]
fn test_has_pending_is_scoped_to_student() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = PendingChangeBuffer::new();
    buffer.set_value(eval_key(5, 2), cell("E"));

    assert!(buffer.has_pending(&EnrollmentId::new(5).unwrap()));
    assert!(!buffer.has_pending(&EnrollmentId::new(6).unwrap()));
}

#[test]
fn test_replace_snapshot_keeps_pending_edits() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = buffer_with_server_cell();
    buffer.set_value(eval_key(5, 1), cell("E"));

    let mut fresh: BTreeMap<EvaluationKey, GridCell> = BTreeMap::new();
    fresh.insert(eval_key(5, 1), cell("L"));
    buffer.replace_snapshot(fresh);

    assert_eq!(buffer.server_value(&eval_key(5, 1)), Some(&cell("L")));
    assert_eq!(buffer.get_value(&eval_key(5, 1)), Some(&cell("E")));
}

#[test]
fn test_commit_moves_edit_into_snapshot() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = PendingChangeBuffer::new();
    buffer.set_value(eval_key(5, 2), cell("E"));

    assert!(buffer.commit(&eval_key(5, 2)));
    assert!(!buffer.is_pending(&eval_key(5, 2)));
    assert_eq!(buffer.server_value(&eval_key(5, 2)), Some(&cell("E")));
    assert!(!buffer.commit(&eval_key(5, 2)));
}

#[test]
fn test_commit_confirmed_none_removes_server_value() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = buffer_with_server_cell();
    buffer.set_value(eval_key(5, 1), cell("E"));

    buffer.commit_confirmed(&eval_key(5, 1), None);
    assert_eq!(buffer.get_value(&eval_key(5, 1)), None);
}

#[test]
fn test_mark_failed_without_edit_is_ignored() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = PendingChangeBuffer::new();
    assert!(!buffer.mark_failed(&eval_key(1, 1), "nope"));
    assert_eq!(buffer.failure(&eval_key(1, 1)), None);
}

#[test]
fn test_pending_entries_are_in_key_order() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = PendingChangeBuffer::new();
    buffer.set_value(eval_key(6, 1), cell("P"));
    buffer.set_value(eval_key(5, 2), cell("E"));
    buffer.set_value(eval_key(5, 1), cell("L"));

    let keys: Vec<String> = buffer
        .pending_entries()
        .into_iter()
        .map(|(key, _)| key.to_string())
        .collect();
    assert_eq!(keys, vec!["5-1", "5-2", "6-1"]);
}
