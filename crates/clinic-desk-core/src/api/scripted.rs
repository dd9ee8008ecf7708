//! In-memory transport with canned replies.
//!
//! Used by tests and offline demos. Every request is recorded so callers can
//! assert on exactly what would have gone over the wire.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiError, ApiRequest, ApiResponse, ApiResult, Method, Transport};

#[derive(Debug, Clone)]
enum Reply {
    Respond(ApiResponse),
    Offline,
}

#[derive(Debug, Clone)]
struct ScriptedRoute {
    method: Method,
    path: String,
    reply: Reply,
}

/// Transport answering from a script of routes.
///
/// The latest registration for a method and path wins. Unscripted requests
/// get a 404 with an empty body.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<ScriptedRoute>>,
    calls: Mutex<Vec<ApiRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        lock(&self.routes).push(ScriptedRoute {
            method,
            path: path.to_string(),
            reply,
        });
        self
    }

    /// Answer `method path` with a JSON body.
    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, Reply::Respond(ApiResponse::new(status, body.to_string())))
    }

    /// Answer `method path` with a plain text body.
    pub fn on_text(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, Reply::Respond(ApiResponse::new(status, body)))
    }

    /// Fail `method path` as if the backend were unreachable.
    pub fn offline(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, Reply::Offline)
    }

    /// Every request received, in order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        lock(&self.calls).clone()
    }

    /// Requests received for `method path`.
    pub fn calls_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        lock(&self.calls).push(request.clone());

        let reply = lock(&self.routes)
            .iter()
            .rev()
            .find(|route| route.method == request.method && route.path == request.path)
            .map(|route| route.reply.clone());

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Offline) => Err(ApiError::Network(format!(
                "{} {} unreachable",
                request.method, request.path
            ))),
            None => Ok(ApiResponse::new(404, "")),
        }
    }
}
