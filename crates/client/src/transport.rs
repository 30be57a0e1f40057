// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The seam between services and the network.

use crate::envelope::ApiEnvelope;
use crate::error::ClientError;
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::debug;

/// HTTP methods used by the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A request to the backend, independent of the HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// The method.
    pub method: Method,
    /// Absolute path, starting with `/api/`.
    pub path: String,
    /// Query parameters, in the order they are sent.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    fn new(method: Method, path: &str, body: Option<serde_json::Value>) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body,
        }
    }

    /// Creates a `GET` request.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path, None)
    }

    /// Creates a `POST` request with a JSON body.
    #[must_use]
    pub fn post(path: &str, body: serde_json::Value) -> Self {
        Self::new(Method::Post, path, Some(body))
    }

    /// Creates a `PATCH` request with a JSON body.
    #[must_use]
    pub fn patch(path: &str, body: serde_json::Value) -> Self {
        Self::new(Method::Patch, path, Some(body))
    }

    /// Creates a `DELETE` request with a JSON body.
    #[must_use]
    pub fn delete(path: &str, body: serde_json::Value) -> Self {
        Self::new(Method::Delete, path, Some(body))
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: &str, value: impl std::fmt::Display) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Returns `"METHOD /path?name=value&..."`, used in logs and to match
    /// scripted replies in tests.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.query.is_empty() {
            return format!("{} {}", self.method.as_str(), self.path);
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("{} {}?{}", self.method.as_str(), self.path, query.join("&"))
    }
}

/// Executes requests and returns the raw JSON body of successful responses.
///
/// Implementations map non-success statuses to `ClientError::Http`.
pub trait Transport: Send + Sync + 'static {
    /// Sends one request.
    fn execute(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<serde_json::Value, ClientError>> + Send;
}

/// Sends a request and unwraps the response envelope into `R`.
///
/// # Errors
///
/// Propagates transport errors, and returns `ClientError::Api` or
/// `ClientError::Decode` for unsuccessful or malformed envelopes.
pub async fn fetch<T: Transport, R: DeserializeOwned>(
    transport: &T,
    request: ApiRequest,
) -> Result<R, ClientError> {
    let described: String = request.describe();
    debug!(request = %described, "Dispatching request");
    let body: serde_json::Value = transport.execute(request).await?;
    ApiEnvelope::<R>::from_value(body)?.into_data()
}

/// Like [`fetch`], for write endpoints that may acknowledge with a bare
/// `{success: true}`. A missing payload becomes `R::default()`.
///
/// # Errors
///
/// Propagates transport errors, and returns `ClientError::Api` or
/// `ClientError::Decode` for unsuccessful or malformed envelopes.
pub async fn fetch_write<T: Transport, R: DeserializeOwned + Default>(
    transport: &T,
    request: ApiRequest,
) -> Result<R, ClientError> {
    let described: String = request.describe();
    debug!(request = %described, "Dispatching write");
    let body: serde_json::Value = transport.execute(request).await?;
    ApiEnvelope::<R>::from_value(body)?.into_data_or_default()
}
