//! Validated SAML response handed over by the assertion boundary.

use crate::diagnostics::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One normalized error reported by assertion validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionError {
    /// Stable error code assigned by the validator (e.g. "002")
    pub code: String,
    pub short_message: String,
    #[serde(default)]
    pub level: Severity,
}

impl AssertionError {
    pub fn new(code: impl Into<String>, short_message: impl Into<String>, level: Severity) -> Self {
        Self {
            code: code.into(),
            short_message: short_message.into(),
            level,
        }
    }
}

/// A SAML response after signature, timing and audience checks.
///
/// Parsing and cryptographic validation happen upstream. This type only
/// carries what that boundary yields: the authn context, the multi-valued
/// attribute statement and the ordered list of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamlResponse {
    pub authn_context: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub errors: Vec<AssertionError>,
}

impl SamlResponse {
    pub fn new(authn_context: impl Into<String>) -> Self {
        Self {
            authn_context: authn_context.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper that appends one attribute value.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn with_error(mut self, error: AssertionError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// First value of a (possibly multi-valued) attribute, blank values ignored.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|values| values.first())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}
