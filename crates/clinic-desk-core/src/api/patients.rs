//! Patient endpoints.

use super::{ApiError, ApiRequest, ApiResult, Endpoint, Method, Resource, ResourceEndpoints, ResourceService};
use crate::models::{Patient, RecordId};

impl Resource for Patient {
    const ENDPOINTS: ResourceEndpoints = ResourceEndpoints {
        list: Endpoint::new(Method::Get, "/getPatient"),
        search: Some(Endpoint::new(Method::Get, "/searchPatients")),
        create: Endpoint::new(Method::Post, "/addPatient"),
        update: Endpoint::new(Method::Patch, "/updatePatient/{id}"),
        delete: Endpoint::new(Method::Delete, "/deletePatient/{id}"),
        delete_many: None,
    };
}

impl ResourceService<Patient> {
    pub async fn get(&self, id: RecordId) -> ApiResult<Patient> {
        self.client()
            .fetch(ApiRequest::get(format!("/getPatient/{}", id)))
            .await
    }

    pub async fn archive(&self, id: RecordId) -> ApiResult<()> {
        self.client()
            .send(ApiRequest::new(Method::Patch, format!("/archivePatient/{}", id)))
            .await
    }

    pub async fn unarchive(&self, id: RecordId) -> ApiResult<()> {
        self.client()
            .send(ApiRequest::new(Method::Patch, format!("/unarchivePatient/{}", id)))
            .await
    }

    /// Look up the patient behind a scanned QR code.
    ///
    /// Numeric codes are record ids; anything else is matched exactly
    /// (ignoring case) against patient codes.
    pub async fn find_by_code(&self, scanned: &str) -> ApiResult<Option<Patient>> {
        let code = scanned.trim();
        if code.is_empty() {
            return Ok(None);
        }

        if let Ok(id) = code.parse::<RecordId>() {
            return match self.get(id).await {
                Ok(patient) => Ok(Some(patient)),
                Err(ApiError::Api { status: 404, .. }) => Ok(None),
                Err(e) => Err(e),
            };
        }

        let candidates = self.list(Some(code)).await?;
        Ok(candidates
            .into_iter()
            .find(|p| p.patient_code.eq_ignore_ascii_case(code)))
    }
}
