//! Ordered commit of a reconciled triad.

use super::{IdentityStore, StoreError};
use crate::identity::ReconciledSession;
use std::sync::Arc;

/// Writes session, user and identity in that order.
///
/// The store offers no multi-row transactions. When a later write fails,
/// the writes already made for this triad are removed again before the
/// error is returned, so no partial triad is left behind. Compensation is
/// best effort: a failed removal is logged and the original error wins.
pub struct SessionGateway {
    store: Arc<dyn IdentityStore>,
}

impl SessionGateway {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    pub fn commit(&self, triad: &ReconciledSession) -> Result<(), StoreError> {
        self.store.save_session(&triad.session)?;

        if let Err(e) = self.store.save_user(&triad.user) {
            self.compensate(triad, false);
            return Err(e);
        }

        if let Err(e) = self.store.save_identity(&triad.identity) {
            self.compensate(triad, true);
            return Err(e);
        }

        tracing::debug!(
            uuid = %triad.user.uuid,
            "Session, user and identity committed"
        );
        Ok(())
    }

    fn compensate(&self, triad: &ReconciledSession, user_written: bool) {
        tracing::warn!(uuid = %triad.user.uuid, "Rolling back partial session commit");

        if user_written {
            if let Err(e) = self.store.remove_user(&triad.user.uuid) {
                tracing::error!(uuid = %triad.user.uuid, error = %e, "Failed to roll back user");
            }
        }
        if let Err(e) = self.store.remove_session(&triad.session.token) {
            tracing::error!(uuid = %triad.user.uuid, error = %e, "Failed to roll back session");
        }
    }
}
