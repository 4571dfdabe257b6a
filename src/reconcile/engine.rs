//! Construction of a fresh session/user/identity triad.
//!
//! Pure: given the new attributes, the (already retired) existing identity
//! and the current time, builds the triad that will be validated and
//! committed. Nothing here touches the store.

use crate::identity::{
    ExistingIdentity, IdentityAttributes, MergeableAttribute, ReconciledSession, Session, User,
    UserIdentity,
};
use crate::saml::SignInContext;
use chrono::{DateTime, Utc};

/// Inputs of one triad construction.
#[derive(Debug, Clone)]
pub struct TriadInput<'a> {
    pub attributes: IdentityAttributes,
    pub existing: Option<&'a ExistingIdentity>,
    /// Multifactor step-up of the existing sign-in; ignored without one
    pub multifactor_change_detected: bool,
    pub now: DateTime<Utc>,
    pub session_ttl_seconds: u64,
}

/// Whether identifiers from an identity signed in through `from` may be
/// carried into a new sign-in through `to`.
///
/// Only the same lineage, or an upgrade through ID.me, qualifies.
pub fn lineage_allows_merge(from: SignInContext, to: SignInContext) -> bool {
    from == to || to == SignInContext::IdMe
}

/// Copy allow-listed correlation ids the new identity lacks.
/// Returns the attributes that were carried over.
pub fn merge_identity(
    identity: &mut UserIdentity,
    existing: &UserIdentity,
) -> Vec<MergeableAttribute> {
    let from = SignInContext::from_authn_context(&existing.authn_context);
    let to = SignInContext::from_authn_context(&identity.authn_context);
    if !lineage_allows_merge(from, to) {
        tracing::debug!(
            uuid = %identity.principal_id,
            from = ?from,
            to = ?to,
            "Sign-in contexts differ, no identifiers carried over"
        );
        return Vec::new();
    }

    let mut merged = Vec::new();
    for attribute in MergeableAttribute::ALL {
        let slot = identity.correlation_ids.slot_mut(attribute);
        if slot.is_some() {
            continue;
        }
        if let Some(value) = existing.correlation_ids.get(attribute) {
            *slot = Some(value.to_string());
            merged.push(attribute);
        }
    }
    merged
}

fn build_user(
    uuid: &str,
    existing: Option<&ExistingIdentity>,
    multifactor_change: bool,
    now: DateTime<Utc>,
) -> User {
    let mut user = User::new(uuid);
    match existing {
        // A step-up is not a new visit
        Some(existing) if multifactor_change => {
            user.last_signed_in = existing.user.last_signed_in;
            user.mhv_last_signed_in = existing.user.mhv_last_signed_in;
        }
        _ => {
            user.last_signed_in = Some(now);
            user.mhv_last_signed_in = Some(now);
        }
    }
    user
}

/// Build the triad for one sign-in.
pub fn build_triad(input: TriadInput<'_>) -> ReconciledSession {
    let TriadInput {
        attributes,
        existing,
        multifactor_change_detected,
        now,
        session_ttl_seconds,
    } = input;

    let mut identity = attributes;
    let user = build_user(
        &identity.principal_id,
        existing,
        multifactor_change_detected,
        now,
    );

    if let Some(existing) = existing {
        let merged = merge_identity(&mut identity, &existing.identity);
        if !merged.is_empty() {
            tracing::debug!(
                uuid = %identity.principal_id,
                merged = ?merged.iter().map(MergeableAttribute::as_str).collect::<Vec<_>>(),
                "Carried identifiers over from previous sign-in"
            );
        }
    }

    let session = Session::new(identity.principal_id.clone(), now, session_ttl_seconds);

    ReconciledSession {
        session,
        user,
        identity,
    }
}
