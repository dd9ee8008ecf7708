//! The signed-in user's session.
//!
//! [`Session`] is the single source of truth for role, token and username.
//! The local store holds a copy that is read once at start-up.

mod login;

pub use login::*;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::Role;
use crate::nav::Route;
use crate::store::{LocalStore, StorageKey, StoreResult};

/// Point-in-time view of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub role: Option<Role>,
    pub token: Option<String>,
    pub username: Option<String>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared session handle. Clones see the same state.
#[derive(Clone)]
pub struct Session {
    state: Arc<RwLock<SessionSnapshot>>,
    store: LocalStore,
}

impl Session {
    /// Signed-out session backed by `store`.
    pub fn new(store: LocalStore) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionSnapshot::default())),
            store,
        }
    }

    /// Session restored from the stored keys.
    ///
    /// Without a token nothing is restored. An unreadable role is dropped.
    pub fn restore(store: LocalStore) -> StoreResult<Self> {
        let snapshot = match store.get(StorageKey::Token)? {
            Some(token) if !token.is_empty() => {
                let role = store
                    .get(StorageKey::UserRole)?
                    .and_then(|raw| match raw.parse::<Role>() {
                        Ok(role) => Some(role),
                        Err(e) => {
                            tracing::warn!("Ignoring stored role: {}", e);
                            None
                        }
                    });
                SessionSnapshot {
                    role,
                    token: Some(token),
                    username: store.get(StorageKey::Username)?,
                }
            }
            _ => SessionSnapshot::default(),
        };

        if snapshot.is_authenticated() {
            tracing::info!(username = ?snapshot.username, "Restored session");
        }

        Ok(Self {
            state: Arc::new(RwLock::new(snapshot)),
            store,
        })
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionSnapshot> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionSnapshot> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.read().clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.read().role
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.read().username.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Start a session and persist it.
    ///
    /// The keys are written together, so a failed write leaves the previous
    /// session untouched.
    pub fn begin(&self, token: String, role: Role, username: String) -> StoreResult<()> {
        self.store.set_many(&[
            (StorageKey::Token, token.as_str()),
            (StorageKey::UserRole, role.as_str()),
            (StorageKey::Username, username.as_str()),
        ])?;

        tracing::info!(username = %username, role = %role, "Session started");
        *self.write() = SessionSnapshot {
            role: Some(role),
            token: Some(token),
            username: Some(username),
        };
        Ok(())
    }

    /// Log out. Returns the route to show next.
    pub fn end(&self) -> StoreResult<Route> {
        self.clear()?;
        tracing::info!("Session ended");
        Ok(Route::Login)
    }

    /// Drop a session the backend no longer accepts.
    pub fn invalidate(&self) -> StoreResult<Route> {
        self.clear()?;
        tracing::info!("Session invalidated");
        Ok(Route::Login)
    }

    fn clear(&self) -> StoreResult<()> {
        *self.write() = SessionSnapshot::default();
        self.store.clear_session()
    }
}
