// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;
use time::macros::date;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidId {
        entity: "section",
        value: 0,
    };
    assert_eq!(format!("{err}"), "Invalid section id: 0. Must be greater than 0");

    let err: DomainError = DomainError::InvalidScaleCode(String::from("ABCD"));
    assert_eq!(format!("{err}"), "Invalid scale code: 'ABCD'");

    let err: DomainError = DomainError::InvalidDateRange {
        start: date!(2026 - 03 - 10),
        end: date!(2026 - 03 - 02),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid date range: 2026-03-02 is before 2026-03-10"
    );

    let err: DomainError = DomainError::InvalidChangeKey(String::from("5"));
    assert_eq!(format!("{err}"), "Invalid change key: '5'");
}
