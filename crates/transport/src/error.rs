use serde_json::Value;
use thiserror::Error;

use crate::request::RequestDescriptor;

/// Machine-readable failure codes surfaced to views.
pub mod codes {
    /// No response was received (connection refused, DNS, reset...).
    pub const NETWORK: &str = "ERR_NETWORK";
    /// The request was aborted, typically by a timeout.
    pub const ABORTED: &str = "ECONNABORTED";
    /// The server answered with a 4xx status.
    pub const BAD_REQUEST: &str = "ERR_BAD_REQUEST";
    /// The server answered with a 5xx (or otherwise unexpected) status.
    pub const BAD_RESPONSE: &str = "ERR_BAD_RESPONSE";
    /// The response body did not have the expected shape.
    pub const DECODE: &str = "ERR_DECODE";
    /// The request URL could not be built.
    pub const INVALID_URL: &str = "ERR_INVALID_URL";
}

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{} {} failed with status {status}", .request.method, .request.url)]
    Status {
        status: u16,
        body: Value,
        request: RequestDescriptor,
    },

    /// No usable response (network failure, timeout, bad URL).
    #[error("{} {} failed: {code}: {message}", .request.method, .request.url)]
    Transport {
        code: String,
        message: String,
        request: RequestDescriptor,
    },

    /// The response arrived but its body could not be decoded.
    #[error("failed to decode response from {}: {message}", .request.url)]
    Decode {
        message: String,
        request: RequestDescriptor,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn request(&self) -> &RequestDescriptor {
        match self {
            ApiError::Status { request, .. }
            | ApiError::Transport { request, .. }
            | ApiError::Decode { request, .. } => request,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn code(&self) -> String {
        match self {
            ApiError::Status { status, .. } if (400..500).contains(status) => codes::BAD_REQUEST.to_string(),
            ApiError::Status { .. } => codes::BAD_RESPONSE.to_string(),
            ApiError::Transport { code, .. } => code.clone(),
            ApiError::Decode { .. } => codes::DECODE.to_string(),
        }
    }

    /// Server-provided `message` field, when the error body carries one.
    pub fn server_message(&self) -> Option<&str> {
        self.body()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
    }
}
