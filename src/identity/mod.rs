//! Identity domain: attribute sets, the session/user/identity triad and
//! its validation.

mod attributes;
mod model;
pub mod validation;

pub use attributes::{
    AccountType, CorrelationIds, IdentityAttributes, Loa, MergeableAttribute, LOA_MAX, LOA_MIN,
};
pub use model::{ExistingIdentity, ReconciledSession, Session, User, UserIdentity};
pub use validation::{validate, EntityValidation, TriadValidation};
