//! Identity attribute extraction from a validated SAML response.

use super::response::SamlResponse;
use crate::identity::{AccountType, CorrelationIds, IdentityAttributes, Loa};
use serde::Deserialize;
use std::str::FromStr;

pub const MHV_CONTEXT: &str = "myhealthevet";
pub const DSLOGON_CONTEXT: &str = "dslogon";
pub const IDME_LOA1_CONTEXT: &str = "http://idmanagement.gov/ns/assurance/loa/1/vets";
pub const IDME_LOA3_CONTEXT: &str = "http://idmanagement.gov/ns/assurance/loa/3/vets";
pub const MULTIFACTOR_CONTEXT: &str = "multifactor";

/// Identity provider lineage behind an authn context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInContext {
    MyHealtheVet,
    DsLogon,
    IdMe,
}

impl SignInContext {
    pub fn from_authn_context(authn_context: &str) -> Self {
        if authn_context.starts_with(MHV_CONTEXT) {
            SignInContext::MyHealtheVet
        } else if authn_context.starts_with(DSLOGON_CONTEXT) {
            SignInContext::DsLogon
        } else {
            SignInContext::IdMe
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct MhvProfile {
    #[serde(rename = "accountType")]
    account_type: Option<String>,
}

/// Reads the attribute statement of one response according to its sign-in context.
#[derive(Debug)]
pub struct SamlUser<'a> {
    response: &'a SamlResponse,
    context: SignInContext,
}

impl<'a> SamlUser<'a> {
    pub fn new(response: &'a SamlResponse) -> Self {
        Self {
            response,
            context: SignInContext::from_authn_context(&response.authn_context),
        }
    }

    pub fn context(&self) -> SignInContext {
        self.context
    }

    /// Whether this sign-in is a multifactor step-up of an earlier session.
    pub fn changing_multifactor(&self) -> bool {
        self.response.authn_context.contains(MULTIFACTOR_CONTEXT)
    }

    pub fn principal_id(&self) -> Option<&str> {
        self.response.attribute("uuid")
    }

    pub fn account_type(&self) -> AccountType {
        if self.context != SignInContext::MyHealtheVet {
            return AccountType::None;
        }
        let Some(raw) = self.response.attribute("mhv_profile") else {
            return AccountType::None;
        };
        let profile: MhvProfile = match serde_json::from_str(raw) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable mhv_profile attribute");
                MhvProfile::default()
            }
        };
        profile
            .account_type
            .as_deref()
            .and_then(|t| AccountType::from_str(t).ok())
            .unwrap_or_default()
    }

    pub fn loa(&self) -> Loa {
        match self.context {
            SignInContext::MyHealtheVet => {
                if self.account_type() == AccountType::Premium {
                    Loa::three()
                } else {
                    Loa::one()
                }
            }
            SignInContext::DsLogon => match self.response.attribute("dslogon_assurance") {
                Some("2") | Some("3") => Loa::three(),
                _ => Loa::one(),
            },
            SignInContext::IdMe => {
                let current = if self.response.authn_context == IDME_LOA3_CONTEXT {
                    3
                } else {
                    1
                };
                let highest = self
                    .response
                    .attribute("level_of_assurance")
                    .and_then(|v| v.parse::<u8>().ok())
                    .unwrap_or(current);
                Loa::new(current, highest)
            }
        }
    }

    fn correlation_ids(&self) -> CorrelationIds {
        let owned = |name: &str| self.response.attribute(name).map(str::to_string);
        match self.context {
            SignInContext::MyHealtheVet => CorrelationIds {
                mhv_correlation_id: owned("mhv_uuid"),
                mhv_icn: owned("mhv_icn"),
                dslogon_edipi: None,
            },
            SignInContext::DsLogon => CorrelationIds {
                dslogon_edipi: owned("dslogon_uuid"),
                ..CorrelationIds::default()
            },
            SignInContext::IdMe => CorrelationIds::default(),
        }
    }

    /// Canonical attribute set for reconciliation.
    ///
    /// Never fails: a missing uuid yields an empty principal that identity
    /// validation reports.
    pub fn to_identity_attributes(&self) -> IdentityAttributes {
        IdentityAttributes {
            principal_id: self.principal_id().unwrap_or_default().to_string(),
            email: self.response.attribute("email").map(str::to_string),
            correlation_ids: self.correlation_ids(),
            multifactor_asserted: self
                .response
                .attribute("multifactor")
                .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            loa: self.loa(),
            account_type: self.account_type(),
            authn_context: self.response.authn_context.clone(),
        }
    }
}
