//! Identity registry outage detection settings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutageConfig {
    /// Consecutive failed registry calls before an outage is declared
    pub failure_threshold: u32,
}

impl Default for OutageConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
        }
    }
}
