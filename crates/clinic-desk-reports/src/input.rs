//! Report inputs as the backend emits them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Report errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// One billing event: the services rendered to a patient and the items sold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedServiceRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub services: Vec<ServiceLine>,
    #[serde(default)]
    pub items: Vec<SoldItemLine>,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A service line inside a rendered service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceLine {
    #[serde(rename = "serviceID", default)]
    pub service_id: Option<i64>,
    #[serde(rename = "serviceName", alias = "service_name")]
    pub service_name: String,
    #[serde(rename = "servicePrice", alias = "service_price", default)]
    pub service_price: f64,
}

/// A sold item line inside a rendered service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoldItemLine {
    #[serde(rename = "itemID", default)]
    pub item_id: Option<i64>,
    #[serde(rename = "itemName", alias = "item_name")]
    pub item_name: String,
    #[serde(rename = "itemQuantity", alias = "item_quantity", default)]
    pub item_quantity: i64,
    #[serde(rename = "itemPrice", alias = "item_price", default)]
    pub item_price: f64,
}

/// Current stock of one inventory item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockRecord {
    #[serde(rename = "itemName", alias = "item_name")]
    pub item_name: String,
    #[serde(rename = "itemQuantity", alias = "item_quantity", default)]
    pub item_quantity: i64,
}

/// Parse the rendered services listing.
pub fn parse_rendered_services(json: &str) -> ReportResult<Vec<RenderedServiceRecord>> {
    parse_array(json)
}

/// Parse the inventory listing down to the stock fields.
pub fn parse_stock(json: &str) -> ReportResult<Vec<StockRecord>> {
    parse_array(json)
}

fn parse_array<T: serde::de::DeserializeOwned>(json: &str) -> ReportResult<Vec<T>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(ReportError::InvalidFormat(
            "Expected a JSON array of records".into(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}
