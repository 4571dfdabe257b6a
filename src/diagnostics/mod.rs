//! Failure diagnostics for sign-in reconciliation.
//!
//! Diagnostics are emitted once per failed reconciliation and consumed by
//! logging and alerting. They are never persisted as domain state.

mod sink;

pub use sink::{DiagnosticsSink, MemorySink, TracingSink};

use crate::identity::{EntityValidation, Loa};
use crate::saml::AssertionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Failure category of a reconciliation attempt.
///
/// Codes and tags are keyed on by external dashboards and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// The constructed triad failed validation
    ValidationFailed,
    /// The identity registry is in an active outage window
    RegistryOutage,
    /// The assertion itself was rejected upstream
    AssertionInvalid,
}

impl FailureCategory {
    pub fn code(&self) -> &'static str {
        match self {
            FailureCategory::ValidationFailed => "004",
            FailureCategory::RegistryOutage => "006",
            FailureCategory::AssertionInvalid => "007",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            FailureCategory::ValidationFailed => "validations_failed",
            FailureCategory::RegistryOutage => "registry_outage",
            FailureCategory::AssertionInvalid => "assertion_invalid",
        }
    }

    pub fn short_message(&self) -> &'static str {
        match self {
            FailureCategory::ValidationFailed => "on User/Session Validation",
            FailureCategory::RegistryOutage => "Identity registry is unavailable",
            FailureCategory::AssertionInvalid => "Invalid SAML assertion",
        }
    }

    /// Tag used for metrics and request instrumentation, e.g. `error:registry_outage`.
    pub fn instrumentation_tag(&self) -> String {
        format!("error:{}", self.tag())
    }

    /// Transient failures are worth retrying by the end user.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureCategory::RegistryOutage)
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Identity fields snapshotted into a validation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityValidation {
    #[serde(flatten)]
    pub validation: EntityValidation,
    pub authn_context: String,
    pub loa: Loa,
}

/// Structured context attached to a diagnostic, one shape per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticContext {
    AssertionInvalid {
        errors: Vec<AssertionError>,
        multiple_errors: bool,
    },
    RegistryOutage {
        outage_start: DateTime<Utc>,
    },
    ValidationFailed {
        uuid: String,
        session: EntityValidation,
        user: EntityValidation,
        identity: IdentityValidation,
    },
}

/// One loggable failure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: FailureCategory,
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub context: DiagnosticContext,
}

impl Diagnostic {
    pub fn instrumentation_tag(&self) -> String {
        self.category.instrumentation_tag()
    }
}
