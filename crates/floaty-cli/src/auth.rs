//! Bearer-token workflow: credential exchange, revocation, status, and the
//! masked password prompt.

use std::io::{self, IsTerminal};

use anyhow::anyhow;
use floaty_api_models::TokenCreated;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::client::{AppContext, CliError, CliResult, classify_problem, resolve_base_url};
use crate::settings::EffectiveConfig;

/// Closed set of `token` sub-actions. Anything else is carried as
/// [`TokenAction::Unknown`] and handled explicitly at the command boundary
/// instead of leaking an open-ended string downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenAction {
    Get,
    Delete,
    Status,
    Unknown(String),
}

impl TokenAction {
    pub(crate) fn parse(raw: &str) -> Self {
        match raw {
            "get" => Self::Get,
            "delete" => Self::Delete,
            "status" => Self::Status,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Credential-exchange collaborator for the pool service's token endpoints.
pub(crate) struct AuthClient {
    client: Client,
    base: Url,
}

impl AuthClient {
    pub(crate) fn from_context(ctx: &AppContext) -> CliResult<Self> {
        Ok(Self {
            client: ctx.client.clone(),
            base: resolve_base_url(&ctx.settings)?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base.as_str().trim_end_matches('/'))
    }

    /// Trade a password for a bearer token.
    pub(crate) async fn acquire_token(&self, user: &str, password: &str) -> CliResult<String> {
        let url = self.endpoint("token");
        debug!(%url, user, "requesting bearer token");
        let response = self
            .client
            .post(&url)
            .basic_auth(user, Some(password))
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("token request failed: {err}")))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(CliError::failure(anyhow!(
                "credential exchange rejected for user '{user}'"
            )));
        }
        if response.status().is_success() {
            let created = response.json::<TokenCreated>().await.map_err(|err| {
                CliError::failure(anyhow!("failed to parse token response: {err}"))
            })?;
            Ok(created.token)
        } else {
            Err(classify_problem(response).await)
        }
    }

    /// Revoke an existing bearer token.
    pub(crate) async fn revoke_token(
        &self,
        user: &str,
        password: &str,
        token: &str,
    ) -> CliResult<Value> {
        let url = self.endpoint(&format!("token/{token}"));
        debug!(%url, user, "revoking bearer token");
        let response = self
            .client
            .delete(&url)
            .basic_auth(user, Some(password))
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("token revocation failed: {err}")))?;

        if response.status().is_success() {
            response.json::<Value>().await.map_err(|err| {
                CliError::failure(anyhow!("failed to parse revocation response: {err}"))
            })
        } else {
            Err(classify_problem(response).await)
        }
    }

    /// Ask the service what it knows about a token. Never prompts.
    pub(crate) async fn token_status(&self, token: &str) -> CliResult<Value> {
        let url = self.endpoint(&format!("token/{token}"));
        debug!(%url, "querying token status");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("token status request failed: {err}")))?;

        if response.status().is_success() {
            response.json::<Value>().await.map_err(|err| {
                CliError::failure(anyhow!("failed to parse token status response: {err}"))
            })
        } else {
            Err(classify_problem(response).await)
        }
    }
}

/// Capture the operator's password from a masked prompt. The secret is never
/// logged or persisted and lives only for the single exchange call that
/// follows; callers drop it immediately afterwards.
pub(crate) fn prompt_password() -> CliResult<String> {
    if io::stdin().is_terminal() {
        rpassword::prompt_password("Enter your password please: ")
            .map_err(|err| CliError::failure(anyhow!("failed to read password from stdin: {err}")))
    } else {
        Err(CliError::validation(
            "a password prompt requires a terminal; pass --token or persist one in ~/.floaty.yml",
        ))
    }
}

pub(crate) fn require_user(settings: &EffectiveConfig) -> CliResult<&str> {
    settings.user.as_deref().ok_or_else(|| {
        CliError::validation("a user is required (pass --user or set user in ~/.floaty.yml)")
    })
}

pub(crate) fn require_token(settings: &EffectiveConfig) -> CliResult<&str> {
    settings.token.as_deref().ok_or_else(|| {
        CliError::validation("a token is required (pass --token or set token in ~/.floaty.yml)")
    })
}
