// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `YYYY-MM-DD` serde representation for `time::Date`.
//!
//! Use with `#[serde(with = "campus_domain::date_format")]`, or the
//! `option` submodule for `Option<Date>` fields.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serializer};
use time::Date;
use time::macros::format_description;

/// Parses a `YYYY-MM-DD` date string.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    // The format has no fallible components for in-range dates.
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// Serializes a date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}

/// Deserializes a `YYYY-MM-DD` date, also accepting a full ISO 8601
/// timestamp and keeping only its date part.
///
/// # Errors
///
/// Returns a serde error if the value is not a valid date.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let raw: String = String::deserialize(deserializer)?;
    let date_part: &str = raw.split('T').next().unwrap_or(&raw);
    parse_date(date_part).map_err(serde::de::Error::custom)
}

/// `Option<Date>` variant.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    /// Serializes an optional date, `None` as `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&super::format_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional date; `null` and empty strings become `None`.
    ///
    /// # Errors
    ///
    /// Returns a serde error if a present value is not a valid date.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Date>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => {
                let date_part: &str = value.split('T').next().unwrap_or(value);
                super::parse_date(date_part)
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}
