//! Authenticated request execution.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::{extract_message, ApiError, ApiRequest, ApiResponse, ApiResult, Transport};
use crate::session::Session;

/// Shared client: one transport, one session. Clones are cheap.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Session,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send a request with the session token attached.
    ///
    /// Non-2xx statuses become errors. A 401 also ends the session.
    pub async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let request = match self.session.token() {
            Some(token) => request.bearer(token),
            None => request,
        };

        tracing::debug!(method = %request.method, path = %request.path, "Sending request");

        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(method = %request.method, path = %request.path, "Request failed: {}", e);
                return Err(e);
            }
        };

        if response.is_success() {
            return Ok(response);
        }

        if response.status == 401 {
            tracing::warn!(path = %request.path, "Unauthorized response, ending session");
            if let Err(e) = self.session.invalidate() {
                tracing::warn!("Failed to clear stored session: {}", e);
            }
            return Err(ApiError::Unauthorized);
        }

        let error = ApiError::Api {
            status: response.status,
            message: extract_message(&response.body),
        };
        tracing::warn!(method = %request.method, path = %request.path, "{}", error);
        Err(error)
    }

    /// Send and decode the body.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        self.execute(request).await?.json()
    }

    /// Send a collection request. A 404 means the collection is empty.
    pub async fn fetch_list<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<Vec<T>> {
        match self.execute(request).await {
            Ok(response) => Ok(response.json::<Option<Vec<T>>>()?.unwrap_or_default()),
            Err(ApiError::Api { status: 404, .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Send and discard the body.
    pub async fn send(&self, request: ApiRequest) -> ApiResult<()> {
        self.execute(request).await.map(|_| ())
    }
}
