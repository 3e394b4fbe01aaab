//! Typed view of the persisted option file.

use serde::Deserialize;

/// Options persisted in `~/.floaty.yml`. Every field is optional; the CLI
/// resolves each one against command-line flags and defaults per invocation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct StoredConfig {
    /// Default for the `--verbose` flag.
    pub verbose: Option<bool>,
    /// Default for the `--user` option.
    pub user: Option<String>,
    /// Default for the `--url` option.
    pub url: Option<String>,
    /// Default for the `--token` option.
    pub token: Option<String>,
}
