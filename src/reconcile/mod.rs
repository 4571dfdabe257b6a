//! Sign-in reconciliation.
//!
//! Turns a validated SAML response into a committed session, user and
//! identity, or into exactly one classified failure diagnostic.
//!
//! # Flow
//!
//! 1. Rejected assertion: retire any stored identity for the principal,
//!    report `assertion_invalid`
//! 2. Extract attributes, look up and retire the existing identity
//! 3. Build the triad ([`engine::build_triad`]) and validate it
//! 4. Invalid triad: report through the [`FailureClassifier`]
//! 5. Valid triad: commit through the [`SessionGateway`]

pub mod classifier;
pub mod clock;
pub mod engine;
mod error;

pub use classifier::{FailedReconciliation, FailureClassifier};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::SsoError;

use crate::config::SessionConfig;
use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::identity::{validate, ExistingIdentity, Session};
use crate::outage::OutageMonitor;
use crate::saml::{SamlResponse, SamlUser};
use crate::store::{IdentityStore, SessionGateway, StoreError};
use engine::TriadInput;
use serde::Serialize;
use std::sync::Arc;

/// Result of one reconciliation as seen by the request layer.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOutcome {
    pub success: bool,
    /// An existing identity was found and replaced
    pub new_login: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    /// The same request may succeed once the identity registry recovers
    pub retryable: bool,
    /// Stable category code, e.g. "004"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_code: Option<String>,
    /// Code shown to the end user: the first assertion error's own code
    /// for rejected assertions, the category code otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrumentation_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

impl ReconcileOutcome {
    fn succeeded(session: Session, new_login: bool) -> Self {
        Self {
            success: true,
            new_login,
            session: Some(session),
            retryable: false,
            failure_code: None,
            auth_error_code: None,
            instrumentation_tag: None,
            diagnostic: None,
        }
    }

    fn failed(diagnostic: Diagnostic, auth_error_code: String, new_login: bool) -> Self {
        Self {
            success: false,
            new_login,
            session: None,
            retryable: diagnostic.category.is_retryable(),
            failure_code: Some(diagnostic.code.clone()),
            auth_error_code: Some(auth_error_code),
            instrumentation_tag: Some(diagnostic.instrumentation_tag()),
            diagnostic: Some(diagnostic),
        }
    }
}

/// Reconciles SAML sign-ins against the identity store.
///
/// Stateless between calls; safe to share across request handlers.
/// Concurrent sign-ins of the same principal are not coordinated and
/// resolve last-write-wins in the store.
pub struct SsoService {
    store: Arc<dyn IdentityStore>,
    gateway: SessionGateway,
    classifier: FailureClassifier,
    clock: Arc<dyn Clock>,
    session_ttl_seconds: u64,
}

impl SsoService {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        outage_monitor: Arc<dyn OutageMonitor>,
        sink: Arc<dyn DiagnosticsSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway: SessionGateway::new(store.clone()),
            store,
            classifier: FailureClassifier::new(outage_monitor, sink),
            clock,
            session_ttl_seconds: SessionConfig::default().ttl_seconds,
        }
    }

    pub fn with_session_config(mut self, config: &SessionConfig) -> Self {
        self.session_ttl_seconds = config.ttl_seconds;
        self
    }

    pub fn classifier(&self) -> &FailureClassifier {
        &self.classifier
    }

    /// Reconcile one validated SAML response.
    ///
    /// # Errors
    ///
    /// Returns `SsoError::Store` when the identity store fails while
    /// handling an accepted assertion. Every other failure, including a
    /// store failure while retiring after a rejected assertion, is reported
    /// as an unsuccessful outcome.
    pub fn reconcile(&self, response: &SamlResponse) -> Result<ReconcileOutcome, SsoError> {
        let saml_user = SamlUser::new(response);

        if !response.is_valid() {
            // Retirement is best effort here; the rejection is always reported
            let new_login = saml_user
                .principal_id()
                .is_some_and(|principal_id| self.retire_after_rejection(principal_id));
            let diagnostic = self
                .classifier
                .report(FailedReconciliation::Assertion(&response.errors));
            let auth_error_code = response
                .errors
                .first()
                .map_or_else(|| diagnostic.code.clone(), |e| e.code.clone());
            return Ok(ReconcileOutcome::failed(
                diagnostic,
                auth_error_code,
                new_login,
            ));
        }

        let attributes = saml_user.to_identity_attributes();
        let existing = self.store.find(&attributes.principal_id).inspect_err(|e| {
            tracing::error!(
                uuid = %attributes.principal_id,
                error = %e,
                "Failed to look up existing identity"
            );
        })?;
        let new_login = existing.is_some();

        let changing_multifactor = saml_user.changing_multifactor();
        if changing_multifactor && !new_login {
            tracing::debug!(
                uuid = %attributes.principal_id,
                authn_context = %attributes.authn_context,
                "Multifactor step-up without a previous sign-in"
            );
        }

        // Retire before validating so a failed attempt still clears the old record
        if let Some(existing) = &existing {
            self.retire(existing).inspect_err(|e| {
                tracing::error!(
                    uuid = %existing.principal_id(),
                    error = %e,
                    "Failed to retire existing identity"
                );
            })?;
        }

        let triad = engine::build_triad(TriadInput {
            attributes,
            existing: existing.as_ref(),
            multifactor_change_detected: changing_multifactor && new_login,
            now: self.clock.now(),
            session_ttl_seconds: self.session_ttl_seconds,
        });

        let validation = validate(&triad);
        if !validation.is_valid() {
            let diagnostic = self.classifier.report(FailedReconciliation::Triad {
                triad: &triad,
                validation: &validation,
            });
            let auth_error_code = diagnostic.code.clone();
            return Ok(ReconcileOutcome::failed(
                diagnostic,
                auth_error_code,
                new_login,
            ));
        }

        if let Err(e) = self.gateway.commit(&triad) {
            tracing::error!(
                uuid = %triad.user.uuid,
                error = %e,
                "Failed to persist reconciled session"
            );
            return Err(e.into());
        }

        metrics::counter!(
            "sso_logins_total",
            "new_login" => new_login.to_string(),
        )
        .increment(1);

        tracing::info!(
            uuid = %triad.user.uuid,
            authn_context = %triad.identity.authn_context,
            loa_current = triad.identity.loa.current,
            loa_highest = triad.identity.loa.highest,
            new_login,
            "Sign-in reconciled"
        );

        Ok(ReconcileOutcome::succeeded(triad.session, new_login))
    }

    /// Best-effort retirement for a rejected assertion. Returns whether a
    /// stored identity was found.
    fn retire_after_rejection(&self, principal_id: &str) -> bool {
        let existing = match self.store.find(principal_id) {
            Ok(Some(existing)) => existing,
            Ok(None) => return false,
            Err(e) => {
                tracing::error!(
                    uuid = %principal_id,
                    error = %e,
                    "Failed to look up identity for rejected assertion"
                );
                return false;
            }
        };
        if let Err(e) = self.retire(&existing) {
            tracing::error!(
                uuid = %principal_id,
                error = %e,
                "Failed to retire identity for rejected assertion"
            );
        }
        true
    }

    /// Delete the stored identity. A record already removed by a racing
    /// sign-in counts as retired.
    fn retire(&self, existing: &ExistingIdentity) -> Result<(), StoreError> {
        match self.store.retire(existing) {
            Ok(()) => {
                tracing::debug!(uuid = %existing.principal_id(), "Retired previous identity");
                Ok(())
            }
            Err(StoreError::NotFound { entity, key }) => {
                tracing::debug!(entity, key = %key, "Previous identity already retired");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
