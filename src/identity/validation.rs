//! Presence and shape checks for a reconciled triad.
//!
//! Pure functions: each entity is validated on its own so a failure is
//! always attributed to the entity that caused it.

use super::attributes::{LOA_MAX, LOA_MIN};
use super::model::{ReconciledSession, Session, User, UserIdentity};
use serde::{Deserialize, Serialize};

/// Validity of one entity with its full error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl EntityValidation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Per-entity validation of a triad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriadValidation {
    pub session: EntityValidation,
    pub user: EntityValidation,
    pub identity: EntityValidation,
}

impl TriadValidation {
    pub fn is_valid(&self) -> bool {
        self.session.valid && self.user.valid && self.identity.valid
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_session(session: &Session) -> EntityValidation {
    let mut errors = Vec::new();
    if blank(&session.token) {
        errors.push("Token can't be blank".to_string());
    }
    if blank(&session.uuid) {
        errors.push("Uuid can't be blank".to_string());
    }
    if session.ttl_seconds == 0 {
        errors.push("Ttl must be greater than 0".to_string());
    }
    EntityValidation::from_errors(errors)
}

pub fn validate_user(user: &User) -> EntityValidation {
    let mut errors = Vec::new();
    if blank(&user.uuid) {
        errors.push("Uuid can't be blank".to_string());
    }
    if user.last_signed_in.is_none() {
        errors.push("Last signed in can't be blank".to_string());
    }
    EntityValidation::from_errors(errors)
}

pub fn validate_identity(identity: &UserIdentity) -> EntityValidation {
    let mut errors = Vec::new();
    if blank(&identity.principal_id) {
        errors.push("Uuid can't be blank".to_string());
    }
    if blank(&identity.authn_context) {
        errors.push("Authn context can't be blank".to_string());
    }
    let loa = identity.loa;
    let range = LOA_MIN..=LOA_MAX;
    if !range.contains(&loa.current) {
        errors.push(format!("Loa current must be between {} and {}", LOA_MIN, LOA_MAX));
    }
    if !range.contains(&loa.highest) {
        errors.push(format!("Loa highest must be between {} and {}", LOA_MIN, LOA_MAX));
    }
    if loa.highest < loa.current {
        errors.push("Loa highest must be greater than or equal to current".to_string());
    }
    EntityValidation::from_errors(errors)
}

/// Validate session, user and identity independently.
pub fn validate(triad: &ReconciledSession) -> TriadValidation {
    TriadValidation {
        session: validate_session(&triad.session),
        user: validate_user(&triad.user),
        identity: validate_identity(&triad.identity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{IdentityAttributes, Loa};
    use chrono::Utc;

    fn valid_triad() -> ReconciledSession {
        let now = Utc::now();
        let mut user = User::new("U1");
        user.last_signed_in = Some(now);
        ReconciledSession {
            session: Session::new("U1", now, 3600),
            user,
            identity: IdentityAttributes {
                principal_id: "U1".to_string(),
                authn_context: "myhealthevet".to_string(),
                ..IdentityAttributes::default()
            },
        }
    }

    #[test]
    fn test_valid_triad() {
        let result = validate(&valid_triad());
        assert!(result.is_valid());
        assert!(result.identity.errors.is_empty());
    }

    #[test]
    fn test_blank_identity_uuid_only_fails_identity() {
        let mut triad = valid_triad();
        triad.identity.principal_id = String::new();
        let result = validate(&triad);
        assert!(!result.is_valid());
        assert!(result.session.valid);
        assert!(result.user.valid);
        assert!(!result.identity.valid);
        assert_eq!(result.identity.errors, vec!["Uuid can't be blank"]);
    }

    #[test]
    fn test_malformed_loa_is_reported() {
        let mut triad = valid_triad();
        triad.identity.loa = Loa {
            current: 3,
            highest: 2,
        };
        let result = validate_identity(&triad.identity);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Loa highest must be greater than or equal to current"]
        );

        triad.identity.loa = Loa {
            current: 0,
            highest: 4,
        };
        let result = validate_identity(&triad.identity);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_user_without_sign_in_is_invalid() {
        let result = validate_user(&User::new("U1"));
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Last signed in can't be blank"]);
    }

    #[test]
    fn test_session_with_zero_ttl_is_invalid() {
        let session = Session::new("U1", Utc::now(), 0);
        let result = validate_session(&session);
        assert_eq!(result.errors, vec!["Ttl must be greater than 0"]);
    }
}
