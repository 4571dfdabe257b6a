//! SAML boundary types and attribute extraction.
//!
//! Assertion parsing and signature checks live upstream. This module takes
//! the validated response and maps its attribute statement onto
//! [`IdentityAttributes`](crate::identity::IdentityAttributes).

mod response;
mod user;

pub use response::{AssertionError, SamlResponse};
pub use user::{
    SamlUser, SignInContext, DSLOGON_CONTEXT, IDME_LOA1_CONTEXT, IDME_LOA3_CONTEXT, MHV_CONTEXT,
    MULTIFACTOR_CONTEXT,
};
