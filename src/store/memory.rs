//! In-memory identity store.

use super::{IdentityStore, StoreError};
use crate::identity::{ExistingIdentity, Session, User, UserIdentity};
use dashmap::DashMap;

/// Thread-safe identity store on lock-free concurrent maps.
///
/// Writes to the same key are last-write-wins.
///
/// # Examples
///
/// ```
/// use sso::identity::{IdentityAttributes, User};
/// use sso::store::{IdentityStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.save_user(&User::new("U1")).unwrap();
/// store
///     .save_identity(&IdentityAttributes {
///         principal_id: "U1".to_string(),
///         ..IdentityAttributes::default()
///     })
///     .unwrap();
///
/// assert!(store.find("U1").unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: DashMap<String, Session>,
    users: DashMap<String, User>,
    identities: DashMap<String, UserIdentity>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing user and identity.
    pub fn insert_existing(&self, existing: ExistingIdentity) {
        self.users
            .insert(existing.user.uuid.clone(), existing.user);
        self.identities
            .insert(existing.identity.principal_id.clone(), existing.identity);
    }

    pub fn session(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    pub fn user(&self, uuid: &str) -> Option<User> {
        self.users.get(uuid).map(|entry| entry.value().clone())
    }

    pub fn identity(&self, uuid: &str) -> Option<UserIdentity> {
        self.identities.get(uuid).map(|entry| entry.value().clone())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn identity_count(&self) -> usize {
        self.identities.len()
    }
}

impl IdentityStore for MemoryStore {
    fn find(&self, principal_id: &str) -> Result<Option<ExistingIdentity>, StoreError> {
        // A user without its identity is not a usable record.
        let Some(user) = self.user(principal_id) else {
            return Ok(None);
        };
        Ok(self
            .identity(principal_id)
            .map(|identity| ExistingIdentity { user, identity }))
    }

    fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.users.insert(user.uuid.clone(), user.clone());
        Ok(())
    }

    fn save_identity(&self, identity: &UserIdentity) -> Result<(), StoreError> {
        self.identities
            .insert(identity.principal_id.clone(), identity.clone());
        Ok(())
    }

    fn remove_session(&self, token: &str) -> Result<(), StoreError> {
        self.sessions
            .remove(token)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                entity: "session",
                key: token.to_string(),
            })
    }

    fn remove_sessions_for(&self, uuid: &str) -> Result<usize, StoreError> {
        let tokens: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().uuid == uuid)
            .map(|entry| entry.key().clone())
            .collect();
        Ok(tokens
            .iter()
            .filter(|token| self.sessions.remove(token.as_str()).is_some())
            .count())
    }

    fn remove_user(&self, uuid: &str) -> Result<(), StoreError> {
        self.users
            .remove(uuid)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                entity: "user",
                key: uuid.to_string(),
            })
    }

    fn remove_identity(&self, uuid: &str) -> Result<(), StoreError> {
        self.identities
            .remove(uuid)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                entity: "identity",
                key: uuid.to_string(),
            })
    }
}
