//! Shared test utilities for reconciliation integration tests.
//!
//! Provides builders for SAML responses and stored identities plus a
//! service wired to in-memory collaborators.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sso::diagnostics::{MemorySink, Severity};
use sso::identity::{CorrelationIds, ExistingIdentity, IdentityAttributes, Loa, User};
use sso::outage::{OutageMonitor, StaticOutageMonitor};
use sso::reconcile::{FixedClock, SsoService};
use sso::saml::{AssertionError, SamlResponse, MHV_CONTEXT};
use sso::store::MemoryStore;
use std::sync::Arc;

// =============================================================================
// Well-Known Test Constants
// =============================================================================

pub const PRINCIPAL: &str = "0e1bb5723d7c4f0686f46ca4505642ad";

pub const ADVANCED_PROFILE: &str =
    r#"{"accountType":"Advanced","availableServices":{"1":"Blue Button self entered data."}}"#;

pub const PREMIUM_PROFILE: &str =
    r#"{"accountType":"Premium","availableServices":{"4":"Secure Messaging"}}"#;

/// Instant every test service reports as "now".
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 3, 1, 12, 0, 0).unwrap()
}

/// Earlier sign-in recorded on stored identities.
pub fn earlier() -> DateTime<Utc> {
    now() - Duration::days(2)
}

// =============================================================================
// SAML Response Builders
// =============================================================================

pub fn mhv_response(context: &str, profile: &str) -> SamlResponse {
    SamlResponse::new(context)
        .with_attribute("uuid", PRINCIPAL)
        .with_attribute("email", "kam+tristanmhv@adhocteam.us")
        .with_attribute("mhv_icn", "1012853550V207686")
        .with_attribute("mhv_uuid", "12345748")
        .with_attribute("mhv_profile", profile)
        .with_attribute("multifactor", "false")
}

pub fn idme_response(context: &str) -> SamlResponse {
    SamlResponse::new(context)
        .with_attribute("uuid", PRINCIPAL)
        .with_attribute("email", "vets.gov.user+0@gmail.com")
        .with_attribute("level_of_assurance", "3")
        .with_attribute("multifactor", "true")
}

pub fn assertion_error(code: &str, message: &str) -> AssertionError {
    AssertionError::new(code, message, Severity::Error)
}

// =============================================================================
// Stored Identity Builders
// =============================================================================

pub fn existing_identity(context: &str, ids: CorrelationIds) -> ExistingIdentity {
    ExistingIdentity {
        user: User {
            uuid: PRINCIPAL.to_string(),
            last_signed_in: Some(earlier()),
            mhv_last_signed_in: Some(earlier() - Duration::hours(3)),
        },
        identity: IdentityAttributes {
            principal_id: PRINCIPAL.to_string(),
            email: Some("kam+tristanmhv@adhocteam.us".to_string()),
            correlation_ids: ids,
            multifactor_asserted: false,
            loa: Loa::one(),
            account_type: Default::default(),
            authn_context: context.to_string(),
        },
    }
}

pub fn existing_mhv(mhv_correlation_id: &str) -> ExistingIdentity {
    existing_identity(
        MHV_CONTEXT,
        CorrelationIds {
            mhv_correlation_id: Some(mhv_correlation_id.to_string()),
            mhv_icn: Some("1012853550V207686".to_string()),
            dslogon_edipi: None,
        },
    )
}

// =============================================================================
// Service Harness
// =============================================================================

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub sink: Arc<MemorySink>,
    pub service: SsoService,
}

pub fn harness_with_monitor(monitor: Arc<dyn OutageMonitor>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(MemorySink::new());
    let service = SsoService::new(
        store.clone(),
        monitor,
        sink.clone(),
        Arc::new(FixedClock(now())),
    );
    Harness {
        store,
        sink,
        service,
    }
}

pub fn harness() -> Harness {
    harness_with_monitor(Arc::new(StaticOutageMonitor::none()))
}
