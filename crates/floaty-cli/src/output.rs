//! Rendering of service responses for the terminal.

use std::fmt::Write as _;

use anyhow::anyhow;
use floaty_api_models::AllocationResponse;
use serde_json::Value;

use crate::client::{CliError, CliResult};

/// Human-readable listing of freshly allocated hosts, one fully qualified
/// name per line grouped under its OS type.
pub(crate) fn format_host_list(response: &AllocationResponse) -> String {
    let domain_suffix = response
        .domain
        .as_deref()
        .map_or_else(String::new, |domain| format!(".{domain}"));

    let mut out = String::new();
    for (os_type, allocation) in &response.hosts {
        let _ = writeln!(out, "{os_type}:");
        for name in allocation.hostname.names() {
            let _ = writeln!(out, "  {name}{domain_suffix}");
        }
    }
    out
}

/// Pretty-printed JSON for responses the CLI passes through unshaped.
pub(crate) fn render_value(value: &Value) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to render response: {err}")))
}
