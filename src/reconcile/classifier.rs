//! Outage-aware classification of failed sign-ins.

use crate::diagnostics::{
    Diagnostic, DiagnosticContext, DiagnosticsSink, FailureCategory, IdentityValidation, Severity,
};
use crate::identity::{ReconciledSession, TriadValidation};
use crate::outage::OutageMonitor;
use crate::saml::AssertionError;
use std::sync::Arc;

const MESSAGE_PREFIX: &str = "Login Fail! ";
const MULTIPLE_ERRORS_SUFFIX: &str = " Multiple SAML Errors";

/// What went wrong in one reconciliation attempt.
#[derive(Debug, Clone, Copy)]
pub enum FailedReconciliation<'a> {
    /// The assertion was rejected before any triad was built
    Assertion(&'a [AssertionError]),
    /// A triad was built but did not validate
    Triad {
        triad: &'a ReconciledSession,
        validation: &'a TriadValidation,
    },
}

/// Maps failures to exactly one category and reports them.
///
/// Priority: assertion errors, then an active registry outage, then
/// triad validation.
pub struct FailureClassifier {
    outage_monitor: Arc<dyn OutageMonitor>,
    sink: Arc<dyn DiagnosticsSink>,
}

impl FailureClassifier {
    pub fn new(outage_monitor: Arc<dyn OutageMonitor>, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            outage_monitor,
            sink,
        }
    }

    /// Build the diagnostic for a failure without emitting it.
    pub fn classify(&self, failure: FailedReconciliation<'_>) -> Diagnostic {
        match failure {
            FailedReconciliation::Assertion(errors) => assertion_diagnostic(errors),
            FailedReconciliation::Triad { triad, validation } => self
                .outage_diagnostic()
                .unwrap_or_else(|| validation_diagnostic(triad, validation)),
        }
    }

    /// Classify, emit the diagnostic to the sink and count the failure.
    pub fn report(&self, failure: FailedReconciliation<'_>) -> Diagnostic {
        let diagnostic = self.classify(failure);
        self.sink.record(&diagnostic);
        metrics::counter!(
            "sso_login_failures_total",
            "tag" => diagnostic.instrumentation_tag(),
        )
        .increment(1);
        diagnostic
    }

    fn outage_diagnostic(&self) -> Option<Diagnostic> {
        let outage = self.outage_monitor.latest_outage().filter(|o| o.is_active())?;
        let category = FailureCategory::RegistryOutage;
        Some(Diagnostic {
            category,
            code: category.code().to_string(),
            severity: Severity::Error,
            message: format!("{}{}", MESSAGE_PREFIX, category.short_message()),
            context: DiagnosticContext::RegistryOutage {
                outage_start: outage.start_time,
            },
        })
    }
}

fn assertion_diagnostic(errors: &[AssertionError]) -> Diagnostic {
    let category = FailureCategory::AssertionInvalid;
    let first_code = errors.first().map(|e| e.code.as_str());
    let multiple_errors = errors.iter().any(|e| Some(e.code.as_str()) != first_code);
    let mut message = format!(
        "{}{}",
        MESSAGE_PREFIX,
        errors
            .first()
            .map_or(category.short_message(), |e| e.short_message.as_str())
    );
    if multiple_errors {
        message.push_str(MULTIPLE_ERRORS_SUFFIX);
    }
    Diagnostic {
        category,
        code: category.code().to_string(),
        severity: errors.first().map_or(Severity::Error, |e| e.level),
        message,
        context: DiagnosticContext::AssertionInvalid {
            errors: errors.to_vec(),
            multiple_errors,
        },
    }
}

fn validation_diagnostic(triad: &ReconciledSession, validation: &TriadValidation) -> Diagnostic {
    let category = FailureCategory::ValidationFailed;
    Diagnostic {
        category,
        code: category.code().to_string(),
        severity: Severity::Error,
        message: format!("{}{}", MESSAGE_PREFIX, category.short_message()),
        context: DiagnosticContext::ValidationFailed {
            uuid: triad.user.uuid.clone(),
            session: validation.session.clone(),
            user: validation.user.clone(),
            identity: IdentityValidation {
                validation: validation.identity.clone(),
                authn_context: triad.identity.authn_context.clone(),
                loa: triad.identity.loa,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::identity::{validate, IdentityAttributes, Loa, Session, User};
    use crate::outage::{Outage, StaticOutageMonitor};
    use chrono::{Duration, Utc};

    fn classifier(monitor: StaticOutageMonitor) -> (FailureClassifier, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (
            FailureClassifier::new(Arc::new(monitor), sink.clone()),
            sink,
        )
    }

    fn auth_too_late() -> AssertionError {
        AssertionError::new("002", "Authentication time limit exceeded", Severity::Warning)
    }

    fn clock_drift() -> AssertionError {
        AssertionError::new("003", "Clock drift detected", Severity::Error)
    }

    fn triad_with_blank_identity() -> ReconciledSession {
        let now = Utc::now();
        let mut user = User::new("U1");
        user.last_signed_in = Some(now);
        ReconciledSession {
            session: Session::new("U1", now, 3600),
            user,
            identity: IdentityAttributes {
                principal_id: String::new(),
                authn_context: "myhealthevet".to_string(),
                loa: Loa::one(),
                ..IdentityAttributes::default()
            },
        }
    }

    #[test]
    fn test_single_assertion_error() {
        let (classifier, _) = classifier(StaticOutageMonitor::none());
        let errors = [auth_too_late()];
        let diagnostic = classifier.classify(FailedReconciliation::Assertion(&errors));

        assert_eq!(diagnostic.category, FailureCategory::AssertionInvalid);
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(
            diagnostic.message,
            "Login Fail! Authentication time limit exceeded"
        );
    }

    #[test]
    fn test_multiple_assertion_errors() {
        let (classifier, _) = classifier(StaticOutageMonitor::none());
        let errors = [auth_too_late(), clock_drift()];
        let diagnostic = classifier.classify(FailedReconciliation::Assertion(&errors));

        assert!(diagnostic.message.ends_with(" Multiple SAML Errors"));
        match diagnostic.context {
            DiagnosticContext::AssertionInvalid {
                errors: reported,
                multiple_errors,
            } => {
                assert!(multiple_errors);
                assert_eq!(reported, errors.to_vec());
            }
            other => panic!("Expected assertion context, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_error_code_is_not_multiple() {
        let (classifier, _) = classifier(StaticOutageMonitor::none());
        let errors = [auth_too_late(), auth_too_late()];
        let diagnostic = classifier.classify(FailedReconciliation::Assertion(&errors));

        assert_eq!(
            diagnostic.message,
            "Login Fail! Authentication time limit exceeded"
        );
        assert!(matches!(
            diagnostic.context,
            DiagnosticContext::AssertionInvalid {
                multiple_errors: false,
                ..
            }
        ));
    }

    #[test]
    fn test_assertion_errors_win_over_active_outage() {
        let (classifier, _) = classifier(StaticOutageMonitor::active_since(Utc::now()));
        let errors = [clock_drift()];
        let diagnostic = classifier.classify(FailedReconciliation::Assertion(&errors));
        assert_eq!(diagnostic.category, FailureCategory::AssertionInvalid);
    }

    #[test]
    fn test_active_outage_classified_as_registry_outage() {
        let start = Utc::now() - Duration::minutes(3);
        let (classifier, _) = classifier(StaticOutageMonitor::active_since(start));
        let triad = triad_with_blank_identity();
        let validation = validate(&triad);

        let diagnostic = classifier.classify(FailedReconciliation::Triad {
            triad: &triad,
            validation: &validation,
        });

        assert_eq!(diagnostic.category, FailureCategory::RegistryOutage);
        assert_eq!(diagnostic.code, "006");
        assert_eq!(
            diagnostic.context,
            DiagnosticContext::RegistryOutage {
                outage_start: start
            }
        );
    }

    #[test]
    fn test_ended_outage_falls_through_to_validation() {
        let start = Utc::now() - Duration::hours(1);
        let (classifier, _) = classifier(StaticOutageMonitor::with_outage(Outage {
            start_time: start,
            end_time: Some(start + Duration::minutes(10)),
        }));
        let triad = triad_with_blank_identity();
        let validation = validate(&triad);

        let diagnostic = classifier.classify(FailedReconciliation::Triad {
            triad: &triad,
            validation: &validation,
        });

        assert_eq!(diagnostic.category, FailureCategory::ValidationFailed);
        assert_eq!(diagnostic.code, "004");
    }

    #[test]
    fn test_validation_context_scopes_errors_to_identity() {
        let (classifier, _) = classifier(StaticOutageMonitor::none());
        let triad = triad_with_blank_identity();
        let validation = validate(&triad);

        let diagnostic = classifier.classify(FailedReconciliation::Triad {
            triad: &triad,
            validation: &validation,
        });

        match diagnostic.context {
            DiagnosticContext::ValidationFailed {
                session,
                user,
                identity,
                ..
            } => {
                assert!(session.valid);
                assert!(user.valid);
                assert!(!identity.validation.valid);
                assert_eq!(identity.validation.errors, vec!["Uuid can't be blank"]);
                assert_eq!(identity.authn_context, "myhealthevet");
                assert_eq!(identity.loa, Loa::one());
            }
            other => panic!("Expected validation context, got {:?}", other),
        }
    }

    #[test]
    fn test_report_emits_exactly_one_record() {
        let (classifier, sink) = classifier(StaticOutageMonitor::none());
        let errors = [clock_drift()];
        let diagnostic = classifier.report(FailedReconciliation::Assertion(&errors));

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0], diagnostic);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let (classifier, sink) = classifier(StaticOutageMonitor::none());
        let triad = triad_with_blank_identity();
        let validation = validate(&triad);
        let failure = FailedReconciliation::Triad {
            triad: &triad,
            validation: &validation,
        };

        let first = classifier.report(failure);
        let second = classifier.report(failure);

        assert_eq!(first, second);
        assert_eq!(sink.len(), 2);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_error() -> impl Strategy<Value = AssertionError> {
            ("[0-9]{3}", "[A-Za-z ]{1,30}", any::<bool>()).prop_map(|(code, msg, warn)| {
                let level = if warn { Severity::Warning } else { Severity::Error };
                AssertionError::new(code, msg, level)
            })
        }

        proptest! {
            #[test]
            fn prop_assertion_errors_always_take_priority(
                errors in proptest::collection::vec(arb_error(), 1..5),
                outage_active in any::<bool>(),
            ) {
                let monitor = if outage_active {
                    StaticOutageMonitor::active_since(Utc::now())
                } else {
                    StaticOutageMonitor::none()
                };
                let (classifier, _) = classifier(monitor);
                let diagnostic = classifier.classify(FailedReconciliation::Assertion(&errors));

                prop_assert_eq!(diagnostic.category, FailureCategory::AssertionInvalid);
                prop_assert_eq!(diagnostic.severity, errors[0].level);
                prop_assert_eq!(
                    diagnostic.message.ends_with(MULTIPLE_ERRORS_SUFFIX),
                    errors.len() > 1
                );
            }
        }
    }
}
