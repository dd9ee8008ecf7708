//! Inventory item endpoints.

use super::{ApiRequest, ApiResult, Endpoint, Method, Resource, ResourceEndpoints, ResourceService};
use crate::models::{InventoryItem, RecordId};

impl Resource for InventoryItem {
    const ENDPOINTS: ResourceEndpoints = ResourceEndpoints {
        list: Endpoint::new(Method::Get, "/items"),
        search: None,
        create: Endpoint::new(Method::Post, "/addItem"),
        update: Endpoint::new(Method::Post, "/updateItems/{id}"),
        delete: Endpoint::new(Method::Delete, "/deleteItems/{id}"),
        delete_many: Some(Endpoint::new(Method::Delete, "/deleteItems")),
    };
}

impl ResourceService<InventoryItem> {
    pub async fn get(&self, id: RecordId) -> ApiResult<InventoryItem> {
        self.client()
            .fetch(ApiRequest::get(format!("/items/{}", id)))
            .await
    }
}
