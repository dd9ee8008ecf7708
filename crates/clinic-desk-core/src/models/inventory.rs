//! Inventory and branch models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{lenient, Record, RecordId};

/// A clinic branch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(rename = "branchID", alias = "branchId", alias = "id", default)]
    pub branch_id: Option<RecordId>,
    #[serde(alias = "branch_name", alias = "name", default)]
    pub branch_name: String,
    #[serde(alias = "branch_address", alias = "address", default)]
    pub branch_address: Option<String>,
    #[serde(alias = "branch_contact", alias = "contact", default)]
    pub branch_contact: Option<String>,
}

impl Branch {
    pub fn new(branch_name: String) -> Self {
        Self {
            branch_name,
            ..Default::default()
        }
    }
}

impl Record for Branch {
    const NOUN: &'static str = "Branch";

    fn id(&self) -> Option<RecordId> {
        self.branch_id
    }

    fn set_id(&mut self, id: RecordId) {
        self.branch_id = Some(id);
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.branch_name.clone(),
            self.branch_address.clone().unwrap_or_default(),
        ]
    }
}

/// A stocked medicine or supply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(rename = "itemID", alias = "itemId", alias = "id", default)]
    pub item_id: Option<RecordId>,
    #[serde(alias = "item_name", default)]
    pub item_name: String,
    #[serde(alias = "item_description", default)]
    pub item_description: Option<String>,
    /// Units on hand
    #[serde(alias = "item_quantity", default)]
    pub item_quantity: i64,
    /// Unit price
    #[serde(alias = "item_price", default, with = "lenient::number")]
    pub item_price: f64,
    #[serde(
        alias = "manufacturedDate",
        alias = "manufacture_date",
        default,
        with = "lenient::date"
    )]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(alias = "expirationDate", alias = "exp_date", default, with = "lenient::date")]
    pub exp_date: Option<NaiveDate>,
    /// Branch holding the stock
    #[serde(default)]
    pub branch: Option<Branch>,
}

/// Display status derived from quantity and expiry. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StockStatus {
    InStock,
    LowStock,
    Expiring,
    OutOfStock,
    Expired,
}

impl StockStatus {
    pub const ALL: [StockStatus; 5] = [
        StockStatus::InStock,
        StockStatus::LowStock,
        StockStatus::Expiring,
        StockStatus::OutOfStock,
        StockStatus::Expired,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::Expiring => "Expiring",
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::Expired => "Expired",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            StockStatus::InStock => "green",
            StockStatus::LowStock => "yellow",
            StockStatus::Expiring => "orange",
            StockStatus::OutOfStock => "red",
            StockStatus::Expired => "black",
        }
    }

    /// Parse a display label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
    }
}

/// Limits used when deriving [`StockStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockThresholds {
    /// Quantity at or below which an item is low
    pub low_stock: i64,
    /// Days ahead counted as expiring
    pub expiring_within_days: i64,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            low_stock: 5,
            expiring_within_days: 30,
        }
    }
}

impl InventoryItem {
    pub fn new(item_name: String, item_quantity: i64, item_price: f64) -> Self {
        Self {
            item_name,
            item_quantity,
            item_price,
            ..Default::default()
        }
    }

    /// Status on `today`: expired, out of stock, expiring, low, in stock.
    pub fn status_on(&self, today: NaiveDate, thresholds: StockThresholds) -> StockStatus {
        let days_left = self.exp_date.map(|exp| (exp - today).num_days());

        match days_left {
            Some(days) if days < 0 => StockStatus::Expired,
            _ if self.item_quantity <= 0 => StockStatus::OutOfStock,
            Some(days) if days <= thresholds.expiring_within_days => StockStatus::Expiring,
            _ if self.item_quantity <= thresholds.low_stock => StockStatus::LowStock,
            _ => StockStatus::InStock,
        }
    }

    pub fn branch_id(&self) -> Option<RecordId> {
        self.branch.as_ref().and_then(|b| b.branch_id)
    }

    pub fn branch_name(&self) -> Option<&str> {
        self.branch.as_ref().map(|b| b.branch_name.as_str())
    }
}

impl Record for InventoryItem {
    const NOUN: &'static str = "Item";

    fn id(&self) -> Option<RecordId> {
        self.item_id
    }

    fn set_id(&mut self, id: RecordId) {
        self.item_id = Some(id);
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.item_name.clone(),
            self.item_description.clone().unwrap_or_default(),
        ]
    }
}
