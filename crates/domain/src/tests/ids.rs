// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CycleId, DomainError, GradeId, SectionId};

#[test]
fn test_positive_id_is_accepted() {
    let id: SectionId = SectionId::new(42).unwrap();
    assert_eq!(id.value(), 42);
    assert_eq!(id.to_string(), "42");
}

#[test]
fn test_zero_and_negative_ids_are_rejected() {
    assert_eq!(
        GradeId::new(0),
        Err(DomainError::InvalidId {
            entity: "grade",
            value: 0
        })
    );
    assert!(GradeId::new(-3).is_err());
}

#[test]
fn test_id_parses_from_string() {
    let id: CycleId = " 7 ".parse().unwrap();
    assert_eq!(id, CycleId::new(7).unwrap());
    assert!("seven".parse::<CycleId>().is_err());
}

#[test]
fn test_id_deserialization_validates() {
    let id: SectionId = serde_json::from_str("12").unwrap();
    assert_eq!(id.value(), 12);

    let result: Result<SectionId, serde_json::Error> = serde_json::from_str("0");
    assert!(result.is_err());
}

#[test]
fn test_id_serializes_as_plain_number() {
    let json: String = serde_json::to_string(&CycleId::new(3).unwrap()).unwrap();
    assert_eq!(json, "3");
}
