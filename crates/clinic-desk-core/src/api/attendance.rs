//! Clock-in/clock-out endpoints.

use serde_json::Value;

use super::{ApiClient, ApiRequest, ApiResult};
use crate::models::{ClockKind, ClockRecord, ClockRequest, RecordId};

#[derive(Clone)]
pub struct AttendanceApi {
    client: ApiClient,
}

impl AttendanceApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn history(&self, kind: ClockKind) -> ApiResult<Vec<ClockRecord>> {
        self.client.fetch_list(ApiRequest::get(kind.path())).await
    }

    /// Post a clock event. Returns the new record id when the backend sends one.
    pub async fn clock(&self, kind: ClockKind, request: &ClockRequest) -> ApiResult<Option<RecordId>> {
        let body = serde_json::to_value(request)?;
        let response = self
            .client
            .execute(ApiRequest::post(kind.path()).json(body))
            .await?;

        Ok(match response.value() {
            Some(Value::Object(map)) => map.get("id").and_then(Value::as_i64),
            Some(Value::Number(n)) => n.as_i64(),
            _ => None,
        })
    }
}
