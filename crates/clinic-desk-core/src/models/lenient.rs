//! Serde adapters for fields the backend encodes inconsistently.
//!
//! Prices arrive as numbers or numeric strings. Dates arrive as `YYYY-MM-DD`,
//! as full timestamps, or as epoch milliseconds. Both are written back in
//! their canonical form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Numbers that may be sent as strings. Null and empty strings read as zero.
pub mod number {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(0.0),
            Some(NumberOrString::Number(n)) => Ok(n),
            Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(0.0),
            Some(NumberOrString::Text(s)) => s
                .trim()
                .parse()
                .map_err(|_| de::Error::custom(format!("invalid number: {}", s))),
        }
    }
}

/// Optional calendar dates.
pub mod date {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<NumberOrString> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(NumberOrString::Number(millis)) => DateTime::<Utc>::from_timestamp_millis(millis as i64)
                .map(|dt| Some(dt.date_naive()))
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", millis))),
            Some(NumberOrString::Text(text)) => parse_date(&text)
                .map_err(|_| de::Error::custom(format!("invalid date: {}", text))),
        }
    }
}

/// Parse the date forms the backend emits. Blank text is no date.
pub fn parse_date(text: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Some(dt.date_naive()));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(dt.date()));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map(Some)
}
