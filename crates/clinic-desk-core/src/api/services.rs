//! Clinic service and billing endpoints.

use super::{ApiError, ApiRequest, ApiResult, Endpoint, Method, Resource, ResourceEndpoints, ResourceService};
use crate::models::{RenderServiceRequest, Service};

impl Resource for Service {
    const ENDPOINTS: ResourceEndpoints = ResourceEndpoints {
        list: Endpoint::new(Method::Get, "/service/getServices"),
        search: None,
        create: Endpoint::new(Method::Post, "/service/addService"),
        update: Endpoint::new(Method::Put, "/service/updateService"),
        delete: Endpoint::new(Method::Delete, "/service/deleteService/{id}"),
        delete_many: None,
    };
}

impl ResourceService<Service> {
    /// Bill services and items to a patient.
    pub async fn render(&self, request: &RenderServiceRequest) -> ApiResult<()> {
        let body = serde_json::to_value(request)?;
        self.client()
            .send(ApiRequest::post("/service/renderService").json(body))
            .await
    }

    /// Rendered-service history as raw JSON, for report aggregation.
    pub async fn rendered_services_json(&self) -> ApiResult<String> {
        match self
            .client()
            .execute(ApiRequest::get("/service/getRenderedServices"))
            .await
        {
            Ok(response) if response.body.trim().is_empty() => Ok("[]".to_string()),
            Ok(response) => Ok(response.body),
            Err(ApiError::Api { status: 404, .. }) => Ok("[]".to_string()),
            Err(e) => Err(e),
        }
    }
}
