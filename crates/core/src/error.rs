// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::filter::FilterLevel;
use campus_domain::DomainError;

/// Errors raised by filter and buffer transitions.
///
/// A transition that returns an error has not touched its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A filter level was selected while a level above it was unset.
    MissingAncestor {
        /// The level being selected.
        level: FilterLevel,
        /// The root-most unset level above it.
        missing: FilterLevel,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::MissingAncestor { level, missing } => {
                write!(f, "Cannot select a {level} before a {missing} is selected")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
