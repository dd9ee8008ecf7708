//! Declarative create/edit forms.
//!
//! A [`FormSchema`] lists fields with their kind, whether they are required
//! and extra validators. [`ModalForm`] holds the text the user typed, checks
//! it on submit and builds the full record to save.

mod modal;
mod schema;
mod schemas;
mod values;

pub use modal::*;
pub use schema::*;
pub use schemas::*;
pub use values::*;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::Record;

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message. The first message for a field is kept.
    pub fn insert(&mut self, field: &str, message: String) {
        self.0.entry(field.to_string()).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Form errors.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Record has no id to update")]
    MissingId,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FormResult<T> = Result<T, FormError>;

/// A record editable through a modal form.
pub trait FormRecord: Record + Default {
    fn schema() -> FormSchema;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("itemName", "Item Name is required.".into());
        errors.insert("itemName", "Item Name is too long.".into());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("itemName"), Some("Item Name is required."));
    }
}
