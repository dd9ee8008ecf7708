//! Clock-in/clock-out records.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// One clock-in or clock-out event. Append-only from the desk's side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClockRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    /// Username of the employee who clocked
    pub employee_id: String,
    pub branch_id: RecordId,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl ClockRecord {
    /// Record stamped now, for local echo of a successful clock.
    pub fn now(id: Option<RecordId>, employee_id: String, branch_id: RecordId) -> Self {
        Self {
            id,
            employee_id,
            branch_id,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Body posted to `/clock-in` and `/clock-out`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClockRequest {
    pub branch_id: RecordId,
    pub employee_id: String,
}

/// Clock direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    In,
    Out,
}

impl ClockKind {
    pub fn path(&self) -> &'static str {
        match self {
            ClockKind::In => "/clock-in",
            ClockKind::Out => "/clock-out",
        }
    }
}

/// Drop records whose id was already seen, keeping the first. Records
/// without an id are always kept.
pub fn dedupe_by_id(records: Vec<ClockRecord>) -> Vec<ClockRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| match record.id {
            Some(id) => seen.insert(id),
            None => true,
        })
        .collect()
}
