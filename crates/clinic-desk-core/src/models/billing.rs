//! Rendered-service (billing) payloads and visit logs.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Patient reference inside a render request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRef {
    #[serde(rename = "clientID")]
    pub client_id: RecordId,
    #[serde(rename = "patientID", skip_serializing_if = "Option::is_none", default)]
    pub patient_code: Option<String>,
}

/// Service reference inside a render request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRef {
    #[serde(rename = "serviceID")]
    pub service_id: RecordId,
}

/// Sold item line inside a render request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemLine {
    #[serde(rename = "itemID")]
    pub item_id: RecordId,
    #[serde(rename = "itemQuantity")]
    pub item_quantity: i64,
}

/// Body posted to `/service/renderService`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderServiceRequest {
    pub patient: PatientRef,
    pub services: Vec<ServiceRef>,
    pub items: Vec<ItemLine>,
    pub total_cost: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A patient visit, logged with its purpose.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitLog {
    pub patient_id: RecordId,
    pub purpose: String,
}
