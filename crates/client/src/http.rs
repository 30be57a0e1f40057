// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `reqwest`-backed transport.

use crate::config::ClientConfig;
use crate::envelope::error_message;
use crate::error::ClientError;
use crate::transport::{ApiRequest, Method, Transport};
use tracing::{debug, warn};

/// Transport that talks to the backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Creates a transport for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let client: reqwest::Client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// The configuration this transport was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    const fn reqwest_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<serde_json::Value, ClientError> {
        let url: String = self.config.url_for(&request.path);
        let mut builder: reqwest::RequestBuilder = self
            .client
            .request(Self::reqwest_method(request.method), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = &self.config.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response: reqwest::Response = builder.send().await?;
        let status: reqwest::StatusCode = response.status();
        let text: String = response.text().await?;
        debug!(%url, status = status.as_u16(), bytes = text.len(), "Received response");

        let body: Option<serde_json::Value> = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        if !status.is_success() {
            let message: String = body
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unexpected status")
                        .to_string()
                });
            warn!(%url, status = status.as_u16(), %message, "Request rejected");
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        body.ok_or_else(|| ClientError::Decode(format!("response from {url} is not JSON")))
    }
}
