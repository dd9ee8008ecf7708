//! REST access to the clinic backend.
//!
//! [`Transport`] moves one request over the wire. [`ApiClient`] adds the
//! bearer token and maps statuses to [`ApiError`]. [`ResourceService`] gives
//! each backend entity its typed CRUD calls.

mod accounts;
mod attendance;
mod branches;
mod client;
mod employees;
mod http;
mod inventory;
mod patients;
mod resource;
mod scripted;
mod services;
mod visits;

pub use accounts::*;
pub use attendance::*;
pub use client::*;
pub use http::*;
pub use resource::*;
pub use scripted::*;
pub use visits::*;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Message shown when the backend cannot be reached.
pub const NETWORK_MESSAGE: &str = "Unable to connect to the server.";

/// Message shown when the backend fails without saying why.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// API errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("API error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl ApiError {
    /// Text to show the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
            ApiError::Unauthorized => "Your session has ended. Please log in again.".to_string(),
            ApiError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Api { message: None, .. } | ApiError::Decode(_) => GENERIC_MESSAGE.to_string(),
            ApiError::InvalidRequest(message) => message.clone(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP verbs the backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        })
    }
}

/// One outgoing request, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path starting with `/`, without query string
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Query value for `key`, if present.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status and body text.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body. An empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let text = self.body.trim();
        let text = if text.is_empty() { "null" } else { text };
        serde_json::from_str(text).map_err(Into::into)
    }

    /// Body as JSON, or `None` when it is plain text.
    pub fn value(&self) -> Option<Value> {
        serde_json::from_str(self.body.trim()).ok()
    }
}

/// Moves requests over the wire.
///
/// Implementations return `Err(ApiError::Network)` only when no response was
/// received. Any HTTP status, including errors, comes back as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> ApiResult<ApiResponse>;
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": ..}`, `{"error": ..}`, a JSON string, or plain text.
pub fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["message", "error"]
            .iter()
            .filter_map(|key| map.get(*key))
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map(String::from),
        Ok(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(_) => None,
        Err(_) if body.starts_with('<') => None,
        Err(_) => Some(body.to_string()),
    }
}
