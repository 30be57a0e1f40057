// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ClientError;
use std::time::Duration;

/// Default backend location for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// How long cached lookup lists stay fresh by default.
pub const DEFAULT_LOOKUP_TTL: Duration = Duration::from_secs(5 * 60);

/// Configuration for the backend connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend, without the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Bearer token sent with every request.
    pub bearer_token: Option<String>,
    /// Freshness window of cached lookup lists.
    pub lookup_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: Duration::from_secs(30),
            bearer_token: None,
            lookup_ttl: DEFAULT_LOOKUP_TTL,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for a backend URL with default settings.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Checks that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the base URL is not an `http` or
    /// `https` URL, or if the timeout is zero.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url: &str = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got '{url}'"
            )));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Config(String::from(
                "timeout must be greater than zero",
            )));
        }
        Ok(())
    }

    /// Joins the base URL and an absolute path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim().trim_end_matches('/'), path)
    }
}
