//! Identity registry outage detection.
//!
//! The classifier asks an injected [`OutageMonitor`] for the latest outage
//! window instead of reading process-wide state.

mod tracker;

pub use tracker::{OutageTracker, RegistryCallResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A window during which the identity registry was degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outage {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Outage {
    pub fn started(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: None,
        }
    }

    /// An outage is active until it has an end time.
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn ended(&self) -> bool {
        !self.is_active()
    }
}

/// Source of the most recent registry outage.
///
/// Implementations that reach over the network own their latency bound.
pub trait OutageMonitor: Send + Sync {
    fn latest_outage(&self) -> Option<Outage>;
}

/// Monitor reporting a fixed outage, or none.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticOutageMonitor {
    outage: Option<Outage>,
}

impl StaticOutageMonitor {
    pub fn none() -> Self {
        Self { outage: None }
    }

    pub fn with_outage(outage: Outage) -> Self {
        Self {
            outage: Some(outage),
        }
    }

    pub fn active_since(start_time: DateTime<Utc>) -> Self {
        Self::with_outage(Outage::started(start_time))
    }
}

impl OutageMonitor for StaticOutageMonitor {
    fn latest_outage(&self) -> Option<Outage> {
        self.outage
    }
}
