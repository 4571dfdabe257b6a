//! Output formatting helpers for CLI commands

use crate::identity::IdentityAttributes;
use crate::reconcile::ReconcileOutcome;
use colored::Colorize;
use std::fmt::Write;

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Format identity attributes as aligned key/value lines
pub fn format_attributes_pretty(attrs: &IdentityAttributes) -> String {
    let mut output = String::new();
    let ids = &attrs.correlation_ids;
    let rows = [
        ("uuid", attrs.principal_id.as_str()),
        ("email", or_dash(attrs.email.as_deref())),
        ("authn_context", attrs.authn_context.as_str()),
        ("mhv_correlation_id", or_dash(ids.mhv_correlation_id.as_deref())),
        ("mhv_icn", or_dash(ids.mhv_icn.as_deref())),
        ("dslogon_edipi", or_dash(ids.dslogon_edipi.as_deref())),
    ];
    for (key, value) in rows {
        let _ = writeln!(output, "{:<20} {}", key.bold(), value);
    }
    let _ = writeln!(
        output,
        "{:<20} {} (highest {})",
        "loa".bold(),
        attrs.loa.current,
        attrs.loa.highest
    );
    let _ = writeln!(output, "{:<20} {}", "account_type".bold(), attrs.account_type);
    let _ = write!(
        output,
        "{:<20} {}",
        "multifactor".bold(),
        attrs.multifactor_asserted
    );
    output
}

/// Format a reconciliation outcome as a status summary
pub fn format_outcome_pretty(outcome: &ReconcileOutcome) -> String {
    let mut output = String::new();
    if outcome.success {
        let _ = writeln!(output, "{} Sign-in reconciled", "✓".green());
        if let Some(session) = &outcome.session {
            let _ = writeln!(output, "  session   {}", session.token);
            let _ = writeln!(output, "  uuid      {}", session.uuid);
            let _ = writeln!(output, "  expires   {}", session.expires_at().to_rfc3339());
        }
        let _ = write!(output, "  new_login {}", outcome.new_login);
    } else {
        let _ = writeln!(
            output,
            "{} Sign-in failed [{}] {}",
            "✗".red(),
            or_dash(outcome.failure_code.as_deref()),
            or_dash(outcome.instrumentation_tag.as_deref()).yellow()
        );
        if let Some(diagnostic) = &outcome.diagnostic {
            let _ = writeln!(output, "  {}", diagnostic.message);
        }
        let _ = writeln!(
            output,
            "  auth_error_code {}",
            or_dash(outcome.auth_error_code.as_deref())
        );
        let _ = write!(output, "  retryable       {}", outcome.retryable);
    }
    output
}
