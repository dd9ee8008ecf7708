//! Persisted local state for the desk.
//!
//! A single key/value table standing in for browser local storage. Values are
//! plain strings or JSON documents; every write overwrites.

mod schema;

pub use schema::*;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

const UPSERT: &str = r#"
    INSERT INTO local_storage (key, value, updated_at)
    VALUES (?1, ?2, datetime('now'))
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

/// Keys the desk persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Token,
    UserRole,
    Username,
    HasClockedIn,
    ClockIns,
    ClockOuts,
}

impl StorageKey {
    /// Session-related keys, cleared together on logout.
    pub const SESSION: [StorageKey; 3] = [StorageKey::Token, StorageKey::UserRole, StorageKey::Username];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::UserRole => "userRole",
            StorageKey::Username => "username",
            StorageKey::HasClockedIn => "hasClockedIn",
            StorageKey::ClockIns => "clockIns",
            StorageKey::ClockOuts => "clockOuts",
        }
    }
}

/// Handle to the local store. Clones share one connection.
#[derive(Clone)]
pub struct LocalStore {
    conn: Arc<Mutex<Connection>>,
}

impl LocalStore {
    /// Open store at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Create in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Read a raw value.
    pub fn get(&self, key: StorageKey) -> StoreResult<Option<String>> {
        self.lock()?
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Write a raw value, replacing any previous one.
    pub fn set(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        self.lock()?
            .execute(UPSERT, params![key.as_str(), value])?;
        Ok(())
    }

    /// Write several values in one transaction. Either all land or none do.
    pub fn set_many(&self, entries: &[(StorageKey, &str)]) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT)?;
            for (key, value) in entries {
                stmt.execute(params![key.as_str(), *value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Remove a value. Returns whether it existed.
    pub fn remove(&self, key: StorageKey) -> StoreResult<bool> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM local_storage WHERE key = ?", [key.as_str()])?;
        Ok(rows_affected > 0)
    }

    /// Read and decode a JSON value.
    ///
    /// A value that no longer decodes is treated as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: StorageKey) -> StoreResult<Option<T>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Discarding undecodable {} value: {}", key.as_str(), e);
                Ok(None)
            }
        }
    }

    /// Encode and write a JSON value.
    pub fn set_json<T: Serialize>(&self, key: StorageKey, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }

    /// Remove the session keys.
    pub fn clear_session(&self) -> StoreResult<()> {
        for key in StorageKey::SESSION {
            self.remove(key)?;
        }
        Ok(())
    }
}
