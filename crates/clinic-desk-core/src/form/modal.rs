//! Modal create/edit form state.

use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use super::{display_value, get_path, set_path, FieldErrors, FormError, FormRecord, FormResult, FormSchema};
use crate::models::RecordId;

/// What the modal was opened for.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalIntent<R> {
    Create,
    Edit(R),
}

/// A validated submit, ready for the resource service.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<R> {
    Create(R),
    Update { id: RecordId, record: R },
}

/// One field as a UI shell should draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: String,
    pub options: Vec<String>,
    pub required: bool,
    pub value: String,
    pub error: Option<String>,
}

/// Render model shared by both intents.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub title: String,
    pub submit_label: String,
    pub fields: Vec<FieldView>,
}

/// Open modal form for record type `R`.
#[derive(Debug, Clone)]
pub struct ModalForm<R: FormRecord> {
    intent: ModalIntent<R>,
    schema: FormSchema,
    values: BTreeMap<String, String>,
    errors: FieldErrors,
    draft_key: Uuid,
}

impl<R: FormRecord> ModalForm<R> {
    /// Open for `intent`. Edit pre-fills every field from the record.
    pub fn open(intent: ModalIntent<R>) -> FormResult<Self> {
        let schema = R::schema();
        let base = match &intent {
            ModalIntent::Create => serde_json::to_value(R::default())?,
            ModalIntent::Edit(record) => serde_json::to_value(record)?,
        };

        let values = schema
            .fields()
            .iter()
            .map(|field| {
                let text = match &intent {
                    ModalIntent::Create => String::new(),
                    ModalIntent::Edit(_) => get_path(&base, field.name)
                        .map(display_value)
                        .unwrap_or_default(),
                };
                (field.name.to_string(), text)
            })
            .collect();

        Ok(Self {
            intent,
            schema,
            values,
            errors: FieldErrors::new(),
            draft_key: Uuid::new_v4(),
        })
    }

    pub fn create() -> Self {
        Self {
            values: R::schema()
                .fields()
                .iter()
                .map(|field| (field.name.to_string(), String::new()))
                .collect(),
            schema: R::schema(),
            intent: ModalIntent::Create,
            errors: FieldErrors::new(),
            draft_key: Uuid::new_v4(),
        }
    }

    pub fn edit(record: R) -> FormResult<Self> {
        Self::open(ModalIntent::Edit(record))
    }

    pub fn intent(&self) -> &ModalIntent<R> {
        &self.intent
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.intent, ModalIntent::Edit(_))
    }

    /// Key identifying this open form, stable until it closes.
    pub fn draft_key(&self) -> Uuid {
        self.draft_key
    }

    /// Set a field's text. Errors stay until the next submit.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> FormResult<()> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(FormError::UnknownField(name.to_string())),
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validate and build the full record.
    ///
    /// Coerced values are laid over the record being edited (or a default
    /// one), so fields outside the schema keep their values.
    pub fn submit(&mut self) -> FormResult<Submission<R>> {
        let coerced = match self.schema.validate(&self.values) {
            Ok(coerced) => coerced,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(FormError::Invalid(errors));
            }
        };
        self.errors.clear();

        let mut document: Value = match &self.intent {
            ModalIntent::Create => serde_json::to_value(R::default())?,
            ModalIntent::Edit(record) => serde_json::to_value(record)?,
        };
        for (name, value) in coerced {
            // Blank nested values do not conjure up an absent parent object
            if is_blank(&value) && !parent_is_object(&document, &name) {
                continue;
            }
            set_path(&mut document, &name, value);
        }
        let record: R = serde_json::from_value(document)?;

        match &self.intent {
            ModalIntent::Create => Ok(Submission::Create(record)),
            ModalIntent::Edit(original) => {
                let id = original.id().ok_or(FormError::MissingId)?;
                Ok(Submission::Update { id, record })
            }
        }
    }

    pub fn view(&self) -> FormView {
        let (title, submit_label) = match self.intent {
            ModalIntent::Create => (format!("Add {}", R::NOUN), "Save"),
            ModalIntent::Edit(_) => (format!("Edit {}", R::NOUN), "Update"),
        };

        let fields = self
            .schema
            .fields()
            .iter()
            .map(|field| FieldView {
                name: field.name.to_string(),
                label: field.label.to_string(),
                kind: field.kind.name().to_string(),
                options: match field.kind {
                    super::FieldKind::Choice(options) => {
                        options.iter().map(|o| o.to_string()).collect()
                    }
                    _ => Vec::new(),
                },
                required: field.required,
                value: self.value(field.name).unwrap_or_default().to_string(),
                error: self.errors.get(field.name).map(String::from),
            })
            .collect();

        FormView {
            title,
            submit_label: submit_label.to_string(),
            fields,
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Bool(b) => !b,
        _ => false,
    }
}

fn parent_is_object(document: &Value, path: &str) -> bool {
    match path.rsplit_once('.') {
        Some((parent, _)) => get_path(document, parent).is_some_and(Value::is_object),
        None => true,
    }
}
