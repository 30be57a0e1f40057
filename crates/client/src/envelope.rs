// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The `{success, data, message, meta}` wrapper every endpoint answers with.

use crate::error::ClientError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Message used when the backend reports failure without saying why.
const UNSPECIFIED_FAILURE: &str = "The request was not successful";

/// Response envelope shared by all endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The payload.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Human-readable message, mostly set on failure.
    #[serde(default)]
    pub message: Option<String>,
    /// Pagination or other metadata.
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    /// Decodes an envelope from a raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Decode` if the body is not an envelope or the
    /// payload does not match `T`.
    pub fn from_value(body: serde_json::Value) -> Result<Self, ClientError> {
        serde_json::from_value(body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Unwraps the payload.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` when `success` is false, and
    /// `ClientError::Decode` when a successful envelope carries no data.
    pub fn into_data(self) -> Result<T, ClientError> {
        if !self.success {
            return Err(ClientError::Api {
                message: self
                    .message
                    .unwrap_or_else(|| String::from(UNSPECIFIED_FAILURE)),
            });
        }
        self.data
            .ok_or_else(|| ClientError::Decode(String::from("response carried no data")))
    }
}

impl<T: DeserializeOwned + Default> ApiEnvelope<T> {
    /// Unwraps the payload of a write endpoint. A successful envelope
    /// without data yields `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` when `success` is false.
    pub fn into_data_or_default(self) -> Result<T, ClientError> {
        if self.data.is_none() && self.success {
            return Ok(T::default());
        }
        self.into_data()
    }
}

impl<T> ApiEnvelope<T> {
    /// Creates a successful envelope.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: None,
        }
    }

    /// Creates a failed envelope.
    #[must_use]
    pub const fn failure(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            meta: None,
        }
    }
}

/// Extracts the `message` of an error body, if it is an envelope.
#[must_use]
pub fn error_message(body: &serde_json::Value) -> Option<String> {
    body.get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}
