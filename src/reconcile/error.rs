//! Error types for sign-in reconciliation

use crate::store::StoreError;
use thiserror::Error;

/// Errors that abort a reconciliation without a classified outcome.
///
/// Classified failures (invalid assertion, registry outage, failed
/// validation) are not errors: they come back as an unsuccessful
/// [`ReconcileOutcome`](super::ReconcileOutcome).
#[derive(Debug, Error)]
pub enum SsoError {
    #[error("identity store error: {0}")]
    Store(#[from] StoreError),
}
