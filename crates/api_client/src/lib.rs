//! REST client wrappers over the lab API.
//!
//! Every wrapper is a plain function that builds an [`ApiRequest`]: method,
//! templated path, query and JSON body. Nothing is sent until the request is
//! handed to a [`Transport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod account;
pub mod analyses;
pub mod caches;
pub mod files;
pub mod groups;
pub mod hmms;
pub mod indexes;
pub mod jobs;
pub mod labels;
pub mod otus;
pub mod references;
pub mod routes;
pub mod samples;
pub mod settings;
pub mod subtraction;
pub mod tasks;
pub mod users;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Raw path segments under the API base. The transport percent-encodes
    /// each one, so an id or accession can never add segments or a query.
    pub segments: Vec<String>,
    /// Unencoded `/a/b` rendering of `segments`, for logs and matching.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, segments: &[&str]) -> Self {
        let segments: Vec<String> = segments.iter().map(|segment| segment.to_string()).collect();
        let path = format!("/{}", segments.join("/"));
        Self {
            method,
            segments,
            path,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(segments: &[&str]) -> Self {
        Self::new(Method::GET, segments)
    }

    pub fn post(segments: &[&str]) -> Self {
        Self::new(Method::POST, segments)
    }

    pub fn put(segments: &[&str]) -> Self {
        Self::new(Method::PUT, segments)
    }

    pub fn patch(segments: &[&str]) -> Self {
        Self::new(Method::PATCH, segments)
    }

    pub fn delete(segments: &[&str]) -> Self {
        Self::new(Method::DELETE, segments)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds `key` only when `value` is set.
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Adds `key=value` once per item (`?state=running&state=waiting`).
    pub fn query_each<I, T>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        for value in values {
            self = self.query(key, value);
        }
        self
    }

    pub fn send(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Search terms are sent only when non-empty.
pub(crate) fn term(term: &str) -> Option<&str> {
    let term = term.trim();
    (!term.is_empty()).then_some(term)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn reason(&self) -> &'static str {
        reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Request failed")
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("API base url cannot carry a path: {0}")]
    NotABaseUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("failed to reach API server: {0}")]
    Network(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// `reqwest`-backed transport. Keeps a cookie jar so the session established
/// by `LOGIN` is reused by later calls.
pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::NotABaseUrl(base_url.to_string()));
        }
        let http = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends the request's segments to the base path, encoding each.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::NotABaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request)?;
        debug!(method = %request.method, url = %url, "http: sending request");
        let mut builder = self
            .http
            .request(request.method, url.clone())
            .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        debug!(status, url = %url, "http: response received");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
