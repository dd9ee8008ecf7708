//! Accounts, employees and roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Lifecycle, Record, RecordId};

/// Role of a signed-in user. Drives navigation visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts `admin`, `ADMIN`, `ROLE_ADMIN` and the same for employee.
    /// The backend's historical `OWNER` authority maps to admin.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "ADMIN" | "OWNER" => Ok(Role::Admin),
            "EMPLOYEE" => Ok(Role::Employee),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Optional role; unknown role names read as no role.
fn optional_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Role>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.parse().ok()))
}

/// A login account (`Users` on the backend).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub username: String,
    #[serde(default, deserialize_with = "optional_role")]
    pub role: Option<Role>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Partial account update. `username` is always sent.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// An employee profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "employeeID", alias = "employeeId", alias = "id", default)]
    pub employee_id: Option<RecordId>,
    #[serde(alias = "first_name", default)]
    pub first_name: String,
    #[serde(alias = "last_name", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(alias = "contact_number", default)]
    pub contact_number: Option<String>,
    #[serde(default, deserialize_with = "optional_role")]
    pub role: Option<Role>,
    #[serde(rename = "branchID", alias = "branchId", default)]
    pub branch_id: Option<RecordId>,
    #[serde(default)]
    pub status: Lifecycle,
}

impl Employee {
    pub fn new(first_name: String, last_name: String) -> Self {
        Self {
            first_name,
            last_name,
            ..Default::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

impl Record for Employee {
    const NOUN: &'static str = "Employee";

    fn id(&self) -> Option<RecordId> {
        self.employee_id
    }

    fn set_id(&mut self, id: RecordId) {
        self.employee_id = Some(id);
    }

    fn search_fields(&self) -> Vec<String> {
        vec![self.full_name(), self.email.clone().unwrap_or_default()]
    }
}
