//! Patient visit log endpoint.

use super::{ApiClient, ApiRequest, ApiResult};
use crate::models::VisitLog;

#[derive(Clone)]
pub struct VisitsApi {
    client: ApiClient,
}

impl VisitsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log a visit. Parameters travel in the query string, with no body.
    pub async fn log(&self, visit: &VisitLog) -> ApiResult<()> {
        self.client
            .send(
                ApiRequest::post("/addPatientLog")
                    .query("patientId", visit.patient_id.to_string())
                    .query("purpose", visit.purpose.clone()),
            )
            .await
    }
}
