//! Billable clinic services.

use serde::{Deserialize, Serialize};

use super::{lenient, Record, RecordId};

/// A service offered by the clinic (e.g. prenatal checkup).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Service {
    #[serde(rename = "serviceID", alias = "serviceId", alias = "id", default)]
    pub service_id: Option<RecordId>,
    #[serde(alias = "serviceName", default)]
    pub service_name: String,
    #[serde(alias = "serviceDescription", default)]
    pub service_description: Option<String>,
    /// Price; the backend sends numbers or numeric strings
    #[serde(alias = "servicePrice", default, with = "lenient::number")]
    pub service_price: f64,
}

impl Service {
    pub fn new(service_name: String, service_price: f64) -> Self {
        Self {
            service_name,
            service_price,
            ..Default::default()
        }
    }
}

impl Record for Service {
    const NOUN: &'static str = "Service";

    fn id(&self) -> Option<RecordId> {
        self.service_id
    }

    fn set_id(&mut self, id: RecordId) {
        self.service_id = Some(id);
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.service_name.clone(),
            self.service_description.clone().unwrap_or_default(),
        ]
    }
}
