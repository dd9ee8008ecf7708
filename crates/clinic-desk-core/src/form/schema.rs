//! Field specifications and value coercion.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::FieldErrors;
use crate::models::lenient;

/// Input kind of a field, deciding how its text is coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    Integer,
    /// `YYYY-MM-DD`
    Date,
    Bool,
    Choice(&'static [&'static str]),
}

impl FieldKind {
    /// Short name a UI shell can switch on.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Date => "date",
            FieldKind::Bool => "bool",
            FieldKind::Choice(_) => "choice",
        }
    }
}

/// Extra checks applied to non-empty values.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Email,
}

impl Validator {
    fn check(&self, label: &str, raw: &str, coerced: &Value) -> Option<String> {
        let length = raw.chars().count();
        match self {
            Validator::MinLength(min) if length < *min => {
                Some(format!("{} must be at least {} characters long.", label, min))
            }
            Validator::MaxLength(max) if length > *max => {
                Some(format!("{} must be at most {} characters long.", label, max))
            }
            Validator::Min(min) => coerced
                .as_f64()
                .filter(|n| n < min)
                .map(|_| format!("{} must be at least {}.", label, min)),
            Validator::Max(max) => coerced
                .as_f64()
                .filter(|n| n > max)
                .map(|_| format!("{} must be at most {}.", label, max)),
            Validator::Email if !looks_like_email(raw) => {
                Some(format!("{} must be a valid email address.", label))
            }
            _ => None,
        }
    }
}

fn looks_like_email(raw: &str) -> bool {
    let raw = raw.trim();
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !raw.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// One form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Dotted JSON path of the value
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub validators: Vec<Validator>,
}

impl FieldSpec {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            validators: Vec::new(),
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn integer(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    /// Non-negative integer that fits the `u32` counts on the records.
    pub fn count(name: &'static str, label: &'static str) -> Self {
        Self::integer(name, label)
            .with(Validator::Min(0.0))
            .with(Validator::Max(f64::from(u32::MAX)))
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn boolean(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Bool)
    }

    pub fn choice(name: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self::new(name, label, FieldKind::Choice(options))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Coerce typed text into JSON, or explain why it cannot be.
    ///
    /// Blank text is `""` for text fields, `false` for booleans, and `null`
    /// otherwise. The required check happens before coercion.
    pub fn coerce(&self, raw: &str) -> Result<Value, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(match self.kind {
                FieldKind::Text => Value::String(raw.to_string()),
                FieldKind::Bool => Value::Bool(false),
                _ => Value::Null,
            });
        }

        match &self.kind {
            FieldKind::Text => Ok(Value::String(raw.to_string())),
            FieldKind::Number => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("{} must be a number.", self.label)),
            FieldKind::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| format!("{} must be a whole number.", self.label)),
            FieldKind::Date => match lenient::parse_date(trimmed) {
                Ok(Some(date)) => Ok(Value::String(date.format("%Y-%m-%d").to_string())),
                _ => Err(format!("{} must be a valid date (YYYY-MM-DD).", self.label)),
            },
            FieldKind::Bool => match trimmed.to_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Ok(Value::Bool(true)),
                "false" | "off" | "no" | "0" => Ok(Value::Bool(false)),
                _ => Err(format!("{} must be yes or no.", self.label)),
            },
            FieldKind::Choice(options) => options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(trimmed))
                .map(|option| Value::String(option.to_string()))
                .ok_or_else(|| format!("{} must be one of: {}.", self.label, options.join(", "))),
        }
    }
}

/// Ordered set of fields for one form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check every field, returning coerced values keyed by field name.
    ///
    /// Missing fields count as blank. All errors are collected, not just
    /// the first.
    pub fn validate(&self, values: &BTreeMap<String, String>) -> Result<Map<String, Value>, FieldErrors> {
        let mut coerced = Map::new();
        let mut errors = FieldErrors::new();

        for field in &self.fields {
            let raw = values.get(field.name).map(String::as_str).unwrap_or("");

            if field.required && field.kind != FieldKind::Bool && raw.trim().is_empty() {
                errors.insert(field.name, format!("{} is required.", field.label));
                continue;
            }

            let value = match field.coerce(raw) {
                Ok(value) => value,
                Err(message) => {
                    errors.insert(field.name, message);
                    continue;
                }
            };

            if !raw.trim().is_empty() {
                if let Some(message) = field
                    .validators
                    .iter()
                    .find_map(|v| v.check(field.label, raw, &value))
                {
                    errors.insert(field.name, message);
                    continue;
                }
            }

            coerced.insert(field.name.to_string(), value);
        }

        if errors.is_empty() {
            Ok(coerced)
        } else {
            Err(errors)
        }
    }
}
