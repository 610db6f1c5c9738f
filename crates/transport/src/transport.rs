//! Wire transport seam.
//!
//! The client only needs "execute this request, give me status + body or a
//! failure code". Production uses reqwest; tests plug in stubs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::error::codes;
use crate::path::is_absolute_url;
use crate::request::{HttpRequest, HttpResponse, Method};

/// Failure to obtain any HTTP response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct TransportFailure {
    pub code: String,
    pub message: String,
}

impl TransportFailure {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(codes::NETWORK, message)
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(codes::ABORTED, message)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a request. Any HTTP status (including 4xx/5xx) is `Ok`.
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
        (**self).execute(request).await
    }
}

/// reqwest-backed transport.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

/// Absolute URL a request should be sent to.
///
/// Relative URLs are appended to the base (`/api` + `tickets` → `/api/tickets`).
pub fn target_url(request: &HttpRequest) -> Result<Url, TransportFailure> {
    let raw = if is_absolute_url(&request.url) {
        request.url.clone()
    } else {
        let base = request
            .base_url
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| {
                TransportFailure::new(codes::INVALID_URL, format!("relative url '{}' without base url", request.url))
            })?;
        if request.url.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base.trim_end_matches('/'), request.url.trim_start_matches('/'))
        }
    };

    Url::parse(&raw).map_err(|e| TransportFailure::new(codes::INVALID_URL, format!("{raw}: {e}")))
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::aborted(err.to_string())
    } else {
        TransportFailure::network(err.to_string())
    }
}

/// Decode a body leniently: empty → `Null`, non-JSON → JSON string.
pub fn decode_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let url = target_url(request)?;

        let mut builder = self.client.request(reqwest_method(request.method), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let raw = response.text().await.map_err(map_reqwest_error)?;

        Ok(HttpResponse::new(status, decode_body(&raw)))
    }
}
