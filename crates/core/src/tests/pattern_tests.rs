// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{cell, eval_key};
use crate::{GridPattern, PendingChangeBuffer, apply_pattern};
use campus_domain::{CategoryId, EnrollmentId, EvaluationKey, GridCell, ScaleCode};
use std::collections::BTreeMap;

fn grid_keys() -> Vec<EvaluationKey> {
    vec![
        eval_key(5, 1),
        eval_key(5, 2),
        eval_key(6, 1),
        eval_key(6, 2),
    ]
}

fn buffer() -> PendingChangeBuffer<EvaluationKey, GridCell> {
    let mut snapshot: BTreeMap<EvaluationKey, GridCell> = BTreeMap::new();
    snapshot.insert(
        eval_key(5, 1),
        GridCell {
            scale_code: ScaleCode::new("P").unwrap(),
            notes: Some(String::from("mejorar lectura")),
        },
    );
    snapshot.insert(eval_key(6, 1), cell("E"));
    PendingChangeBuffer::with_snapshot(snapshot)
}

#[test]
fn test_column_pattern_fills_one_category() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = buffer();
    let pattern: GridPattern = GridPattern::Column {
        category_id: CategoryId::new(1).unwrap(),
        scale_code: ScaleCode::new("E").unwrap(),
    };

    let changed: usize = apply_pattern(&mut buffer, &grid_keys(), &pattern);

    // 6-1 already shows E.
    assert_eq!(changed, 1);
    let edited: &GridCell = buffer.get_value(&eval_key(5, 1)).unwrap();
    assert_eq!(edited.scale_code.as_str(), "E");
    assert_eq!(edited.notes.as_deref(), Some("mejorar lectura"));
    assert!(!buffer.is_pending(&eval_key(6, 1)));
    assert!(!buffer.is_pending(&eval_key(5, 2)));
}

#[test]
fn test_row_pattern_fills_one_student() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = buffer();
    let pattern: GridPattern = GridPattern::Row {
        enrollment_id: EnrollmentId::new(6).unwrap(),
        scale_code: ScaleCode::new("L").unwrap(),
    };

    assert_eq!(apply_pattern(&mut buffer, &grid_keys(), &pattern), 2);
    assert!(buffer.has_pending(&EnrollmentId::new(6).unwrap()));
    assert!(!buffer.has_pending(&EnrollmentId::new(5).unwrap()));
}

#[test]
fn test_fill_empty_only_touches_blank_cells() {
    let mut buffer: PendingChangeBuffer<EvaluationKey, GridCell> = buffer();
    buffer.set_value(eval_key(6, 2), cell("P"));
    let pattern: GridPattern = GridPattern::FillEmpty {
        scale_code: ScaleCode::new("A").unwrap(),
    };

    assert_eq!(apply_pattern(&mut buffer, &grid_keys(), &pattern), 1);
    assert_eq!(buffer.get_value(&eval_key(5, 2)), Some(&cell("A")));
    assert_eq!(buffer.get_value(&eval_key(6, 2)), Some(&cell("P")));
}
