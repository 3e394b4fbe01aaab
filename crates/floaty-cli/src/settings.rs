//! Effective configuration resolved once per invocation.

use floaty_config::StoredConfig;

use crate::cli::Cli;

/// Options in effect for a single invocation. Built once from the
/// command line and the persisted store, then threaded read-only through
/// every handler; precedence per field is CLI value, then persisted value,
/// then unset.
#[derive(Debug, Clone, Default)]
pub(crate) struct EffectiveConfig {
    pub(crate) verbose: bool,
    pub(crate) user: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) token: Option<String>,
}

impl EffectiveConfig {
    pub(crate) fn resolve(cli: &Cli, stored: &StoredConfig) -> Self {
        Self {
            verbose: cli.verbose || stored.verbose.unwrap_or(false),
            user: cli.user.clone().or_else(|| stored.user.clone()),
            url: cli.url.clone().or_else(|| stored.url.clone()),
            token: cli.token.clone().or_else(|| stored.token.clone()),
        }
    }
}
