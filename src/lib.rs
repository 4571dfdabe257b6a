//! sso - SAML sign-in reconciliation
//!
//! Merges a freshly asserted federated identity with any previously stored
//! identity for the same principal, builds a new session, user and identity,
//! and commits them together. Failed sign-ins are classified (invalid
//! assertion, identity registry outage, failed validation) and reported as
//! one structured diagnostic each.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod identity;
pub mod logging;
pub mod outage;
pub mod reconcile;
pub mod saml;
pub mod store;
