//! Branch endpoints.

use super::{Endpoint, Method, Resource, ResourceEndpoints};
use crate::models::Branch;

impl Resource for Branch {
    const ENDPOINTS: ResourceEndpoints = ResourceEndpoints {
        list: Endpoint::new(Method::Get, "/branches"),
        search: None,
        create: Endpoint::new(Method::Post, "/addBranch"),
        update: Endpoint::new(Method::Put, "/updateBranch/{id}"),
        delete: Endpoint::new(Method::Delete, "/deleteBranch/{id}"),
        delete_many: None,
    };
}
