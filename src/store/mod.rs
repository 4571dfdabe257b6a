//! Identity store boundary and session persistence.
//!
//! The store supports point lookups and point writes keyed by principal
//! (users, identities) or token (sessions), plus removal of all sessions of
//! a principal. No multi-row transactions are
//! assumed; [`SessionGateway`] layers ordered writes with compensation on top.

mod error;
mod gateway;
mod memory;

pub use error::StoreError;
pub use gateway::SessionGateway;
pub use memory::MemoryStore;

use crate::identity::{ExistingIdentity, Session, User, UserIdentity};

/// Persistence operations the reconciliation core depends on.
pub trait IdentityStore: Send + Sync {
    /// Point lookup of the user and identity stored for `principal_id`.
    fn find(&self, principal_id: &str) -> Result<Option<ExistingIdentity>, StoreError>;

    /// Delete a previously persisted user and identity along with every
    /// session still issued to the principal.
    fn retire(&self, existing: &ExistingIdentity) -> Result<(), StoreError> {
        self.remove_sessions_for(existing.principal_id())?;
        self.remove_user(&existing.user.uuid)?;
        self.remove_identity(&existing.identity.principal_id)
    }

    fn save_session(&self, session: &Session) -> Result<(), StoreError>;
    fn save_user(&self, user: &User) -> Result<(), StoreError>;
    fn save_identity(&self, identity: &UserIdentity) -> Result<(), StoreError>;

    fn remove_session(&self, token: &str) -> Result<(), StoreError>;
    /// Remove all sessions of a principal, returning how many were removed.
    fn remove_sessions_for(&self, uuid: &str) -> Result<usize, StoreError>;
    fn remove_user(&self, uuid: &str) -> Result<(), StoreError>;
    fn remove_identity(&self, uuid: &str) -> Result<(), StoreError>;
}
