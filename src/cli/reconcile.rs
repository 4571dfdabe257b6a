//! Reconcile command implementation

use crate::cli::extract::read_response;
use crate::cli::output::format_outcome_pretty;
use crate::cli::ReconcileArgs;
use crate::config::SsoConfig;
use crate::diagnostics::TracingSink;
use crate::identity::ExistingIdentity;
use crate::outage::{OutageTracker, RegistryCallResult};
use crate::reconcile::{SsoService, SystemClock};
use crate::store::MemoryStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ReconcileArgs,
) -> Result<SsoConfig, Box<dyn std::error::Error>> {
    let mut config = if args.config.exists() {
        SsoConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        SsoConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn parse_outage_since(raw: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    let start = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| format!("Invalid --outage-since '{}': {}", raw, e))?;
    Ok(start.with_timezone(&Utc))
}

/// Handle `sso reconcile` command
pub fn handle_reconcile(
    args: &ReconcileArgs,
    config: &SsoConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let response = read_response(&args.assertion)?;

    let store = Arc::new(MemoryStore::new());
    if let Some(path) = &args.existing {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let existing: ExistingIdentity = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid existing identity in {}: {}", path.display(), e))?;
        store.insert_existing(existing);
    }

    // Replay enough failed registry calls to open an outage at the given time
    let tracker = Arc::new(OutageTracker::new(config.outage.failure_threshold));
    if let Some(raw) = &args.outage_since {
        let start = parse_outage_since(raw)?;
        for _ in 0..config.outage.failure_threshold {
            tracker.record(RegistryCallResult::Failure, start);
        }
    }

    let service = SsoService::new(store, tracker, Arc::new(TracingSink), Arc::new(SystemClock))
        .with_session_config(&config.session);
    let outcome = service.reconcile(&response)?;

    if args.json {
        Ok(serde_json::to_string_pretty(&outcome)?)
    } else {
        Ok(format_outcome_pretty(&outcome))
    }
}
