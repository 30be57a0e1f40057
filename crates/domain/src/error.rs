// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An entity identifier was zero or negative.
    InvalidId {
        /// The kind of entity the identifier belongs to.
        entity: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// An evaluation scale code was empty, too long, or not alphanumeric.
    InvalidScaleCode(String),
    /// A date range ends before it starts.
    InvalidDateRange {
        /// The start of the range.
        start: Date,
        /// The end of the range.
        end: Date,
    },
    /// A date string could not be parsed.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A composite change key could not be parsed.
    InvalidChangeKey(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId { entity, value } => {
                write!(f, "Invalid {entity} id: {value}. Must be greater than 0")
            }
            Self::InvalidScaleCode(code) => write!(f, "Invalid scale code: '{code}'"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "Invalid date range: {end} is before {start}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidChangeKey(key) => write!(f, "Invalid change key: '{key}'"),
        }
    }
}

impl std::error::Error for DomainError {}
