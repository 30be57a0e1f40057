// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the client layer.

use campus::CoreError;
use campus_domain::DomainError;
use thiserror::Error;

/// Errors raised while talking to the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// The backend's message, or the status reason.
        message: String,
    },

    /// The backend answered `success: false`.
    #[error("{message}")]
    Api {
        /// The backend's message.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The request was superseded before it completed.
    #[error("Request cancelled")]
    Cancelled,

    /// The client was configured with unusable settings.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A domain rule was violated by a request or a response.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A filter or buffer transition was refused.
    #[error(transparent)]
    State(CoreError),
}

impl ClientError {
    /// Returns whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Returns whether the request was abandoned.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(domain) => Self::Domain(domain),
            other @ CoreError::MissingAncestor { .. } => Self::State(other),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::Http {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        Self::Network(err.to_string())
    }
}
