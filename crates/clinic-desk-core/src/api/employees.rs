//! Employee endpoints.

use super::{Endpoint, Method, Resource, ResourceEndpoints};
use crate::models::Employee;

impl Resource for Employee {
    const ENDPOINTS: ResourceEndpoints = ResourceEndpoints {
        list: Endpoint::new(Method::Get, "/employees"),
        search: None,
        create: Endpoint::new(Method::Post, "/addEmployee"),
        update: Endpoint::new(Method::Put, "/updateEmployee/{id}"),
        delete: Endpoint::new(Method::Delete, "/deleteEmployee/{id}"),
        delete_many: None,
    };
}
