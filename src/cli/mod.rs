//! CLI module for the sign-in gateway
//!
//! # Commands
//!
//! - `extract` - Show the identity attributes of a SAML response
//! - `reconcile` - Run one sign-in reconciliation against an in-memory store
//! - `config` - Configuration utilities (init)
//!
//! # Example
//!
//! ```bash
//! sso extract --assertion response.json --json
//! sso reconcile --assertion response.json --existing identity.json
//! ```

pub mod config;
pub mod extract;
pub mod output;
pub mod reconcile;

pub use config::handle_config_init;
pub use extract::handle_extract;
pub use reconcile::handle_reconcile;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// sso - SAML sign-in reconciliation
#[derive(Parser, Debug)]
#[command(
    name = "sso",
    version,
    about = "SAML sign-in reconciliation for federated identity providers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show identity attributes extracted from a SAML response
    Extract(ExtractArgs),
    /// Reconcile a SAML response into a session
    Reconcile(ReconcileArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Validated SAML response as JSON
    #[arg(short, long)]
    pub assertion: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Validated SAML response as JSON
    #[arg(short, long)]
    pub assertion: PathBuf,

    /// Previously persisted user and identity as JSON
    #[arg(short, long)]
    pub existing: Option<PathBuf>,

    /// Treat the identity registry as down since this RFC 3339 time
    #[arg(long)]
    pub outage_since: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "sso.toml")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SSO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write an example configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "sso.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reconcile_args() {
        let cli = Cli::try_parse_from([
            "sso",
            "reconcile",
            "--assertion",
            "response.json",
            "--outage-since",
            "2018-03-01T12:00:00Z",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Reconcile(args) => {
                assert_eq!(args.assertion, PathBuf::from("response.json"));
                assert_eq!(args.outage_since.as_deref(), Some("2018-03-01T12:00:00Z"));
                assert_eq!(args.config, PathBuf::from("sso.toml"));
                assert!(args.existing.is_none());
                assert!(args.json);
            }
            other => panic!("Expected reconcile, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_requires_assertion() {
        assert!(Cli::try_parse_from(["sso", "extract"]).is_err());
    }
}
