//! Domain models mirrored from backend responses.

mod account;
mod attendance;
mod billing;
mod inventory;
mod patient;
mod service;

pub mod lenient;

pub use account::*;
pub use attendance::*;
pub use billing::*;
pub use inventory::*;
pub use patient::*;
pub use service::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Numeric primary key as issued by the backend.
pub type RecordId = i64;

/// A record the desk lists, edits and persists.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Display noun used in banners ("Patient", "Service")
    const NOUN: &'static str;

    /// Backend id, absent before the first save.
    fn id(&self) -> Option<RecordId>;

    /// Attach the id the backend assigned.
    fn set_id(&mut self, id: RecordId);

    /// Display fields matched by free-text search.
    fn search_fields(&self) -> Vec<String>;

    /// Case-insensitive substring match against any search field.
    ///
    /// An empty (or all-whitespace) query matches everything.
    fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Lifecycle of records that are archived instead of deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    #[serde(alias = "Active", alias = "ACTIVE")]
    Active,
    #[serde(alias = "Archived", alias = "ARCHIVED", alias = "inactive", alias = "Inactive")]
    Archived,
}

impl Lifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }
}
