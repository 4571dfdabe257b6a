//! Breaker-style outage tracking fed by registry call results.

use super::{Outage, OutageMonitor};
use chrono::{DateTime, Utc};
use std::sync::RwLock;

/// Result of one call to the identity registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryCallResult {
    Success,
    Failure,
}

#[derive(Debug, Default)]
struct TrackerState {
    consecutive_failures: u32,
    latest_outage: Option<Outage>,
}

/// Opens an outage after `failure_threshold` consecutive failed registry
/// calls and closes it on the next success.
#[derive(Debug)]
pub struct OutageTracker {
    failure_threshold: u32,
    state: RwLock<TrackerState>,
}

impl OutageTracker {
    pub fn new(failure_threshold: u32) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            state: RwLock::new(TrackerState::default()),
        }
    }

    /// Apply one call result observed at `at`.
    /// Returns the outage if this call opened or closed it.
    pub fn record(&self, result: RegistryCallResult, at: DateTime<Utc>) -> Option<Outage> {
        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        match result {
            RegistryCallResult::Success => {
                state.consecutive_failures = 0;
                let outage = state.latest_outage.as_mut().filter(|o| o.is_active())?;
                outage.end_time = Some(at);
                tracing::info!(
                    start_time = %outage.start_time,
                    end_time = %at,
                    "Identity registry outage ended"
                );
                Some(*outage)
            }
            RegistryCallResult::Failure => {
                state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                let already_active = state.latest_outage.is_some_and(|o| o.is_active());
                if !already_active && state.consecutive_failures >= self.failure_threshold {
                    let outage = Outage::started(at);
                    state.latest_outage = Some(outage);
                    tracing::warn!(
                        start_time = %at,
                        consecutive_failures = state.consecutive_failures,
                        "Identity registry outage started"
                    );
                    Some(outage)
                } else {
                    None
                }
            }
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        match self.state.read() {
            Ok(state) => state.consecutive_failures,
            Err(poisoned) => poisoned.into_inner().consecutive_failures,
        }
    }
}

impl OutageMonitor for OutageTracker {
    fn latest_outage(&self) -> Option<Outage> {
        match self.state.read() {
            Ok(state) => state.latest_outage,
            Err(poisoned) => poisoned.into_inner().latest_outage,
        }
    }
}
