//! Extract command implementation

use crate::cli::output::format_attributes_pretty;
use crate::cli::ExtractArgs;
use crate::saml::{SamlResponse, SamlUser};
use std::path::Path;

/// Read a JSON SAML response from disk
pub fn read_response(path: &Path) -> Result<SamlResponse, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let response = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid SAML response in {}: {}", path.display(), e))?;
    Ok(response)
}

/// Handle `sso extract` command
pub fn handle_extract(args: &ExtractArgs) -> Result<String, Box<dyn std::error::Error>> {
    let response = read_response(&args.assertion)?;
    let user = SamlUser::new(&response);
    let attrs = user.to_identity_attributes();

    if args.json {
        let value = serde_json::json!({
            "attributes": attrs,
            "changing_multifactor": user.changing_multifactor(),
            "errors": response.errors,
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut output = format_attributes_pretty(&attrs);
    if !response.is_valid() {
        for error in &response.errors {
            output.push_str(&format!("\n! [{}] {}", error.code, error.short_message));
        }
    }
    Ok(output)
}
