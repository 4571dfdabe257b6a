//! Session, user and identity records.

use super::attributes::IdentityAttributes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted identity is the reconciled attribute snapshot.
pub type UserIdentity = IdentityAttributes;

/// Ties a session token to a principal for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub uuid: String,
    pub created_at: DateTime<Utc>,
    pub ttl_seconds: u64,
}

impl Session {
    /// New session with a random token.
    pub fn new(uuid: impl Into<String>, created_at: DateTime<Utc>, ttl_seconds: u64) -> Self {
        Self {
            token: uuid::Uuid::new_v4().simple().to_string(),
            uuid: uuid.into(),
            created_at,
            ttl_seconds,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        self.created_at + chrono::Duration::seconds(ttl.min(i64::from(i32::MAX)))
    }
}

/// Sign-in bookkeeping for a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uuid: String,
    pub last_signed_in: Option<DateTime<Utc>>,
    /// Last sign-in through the My HealtheVet context
    pub mhv_last_signed_in: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            last_signed_in: None,
            mhv_last_signed_in: None,
        }
    }
}

/// A previously persisted user and identity for one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingIdentity {
    pub user: User,
    pub identity: UserIdentity,
}

impl ExistingIdentity {
    pub fn principal_id(&self) -> &str {
        &self.user.uuid
    }
}

/// Output triad of one reconciliation, committed all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledSession {
    pub session: Session,
    pub user: User,
    pub identity: UserIdentity,
}
