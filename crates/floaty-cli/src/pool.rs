//! Pool-service collaborator calls.
//!
//! One method per wire operation; no retry or timeout policy beyond what the
//! shared HTTP client was built with. Every call logs its method and URL at
//! debug level, which is what `--verbose` surfaces.

use anyhow::anyhow;
use floaty_api_models::AllocationResponse;
use reqwest::{Client, Url};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{
    AppContext, CliError, CliResult, HEADER_AUTH_TOKEN, classify_problem, resolve_base_url,
};
use crate::request::{OsRequestSet, TagSet};

/// HTTP collaborator for the pool service's VM endpoints.
pub(crate) struct PoolClient {
    client: Client,
    base: Url,
}

impl PoolClient {
    pub(crate) fn from_context(ctx: &AppContext) -> CliResult<Self> {
        Ok(Self {
            client: ctx.client.clone(),
            base: resolve_base_url(&ctx.settings)?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base.as_str().trim_end_matches('/'))
    }

    /// Request machines with a token; decodes the structured allocation body.
    pub(crate) async fn allocate(
        &self,
        requests: &OsRequestSet,
        token: &str,
    ) -> CliResult<AllocationResponse> {
        let url = self.endpoint(&format!("vm/{}", os_path_segment(requests)));
        debug!(%url, "POST allocation request");
        let response = self
            .client
            .post(&url)
            .header(HEADER_AUTH_TOKEN, token)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("allocation request failed: {err}")))?;

        if response.status().is_success() {
            response.json::<AllocationResponse>().await.map_err(|err| {
                CliError::failure(anyhow!("failed to parse allocation response: {err}"))
            })
        } else {
            Err(classify_problem(response).await)
        }
    }

    /// Request machines without a token and hand back the body verbatim,
    /// whatever its status; the caller prints it unmodified.
    pub(crate) async fn allocate_raw(&self, requests: &OsRequestSet) -> CliResult<String> {
        let url = self.endpoint(&format!("vm/{}", os_path_segment(requests)));
        debug!(%url, "POST unauthenticated allocation request");
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("allocation request failed: {err}")))?;
        response
            .text()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to read allocation response: {err}")))
    }

    /// List available OS types, optionally filtered by substring.
    pub(crate) async fn list(&self, filter: Option<&str>) -> CliResult<Vec<String>> {
        let url = self.endpoint("vm");
        debug!(%url, "GET pool listing");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("pool listing request failed: {err}")))?;

        if response.status().is_success() {
            let mut names = response.json::<Vec<String>>().await.map_err(|err| {
                CliError::failure(anyhow!("failed to parse pool listing: {err}"))
            })?;
            if let Some(filter) = filter {
                names.retain(|name| name.contains(filter));
            }
            Ok(names)
        } else {
            Err(classify_problem(response).await)
        }
    }

    /// Fetch the service's record for one VM.
    pub(crate) async fn query(&self, hostname: &str) -> CliResult<Value> {
        let url = self.endpoint(&format!("vm/{hostname}"));
        debug!(%url, "GET vm record");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("vm query request failed: {err}")))?;
        read_value(response, "vm record").await
    }

    /// Update a VM's lifetime and/or tags. Returns the raw body regardless
    /// of HTTP status: success is signalled by the body's `ok` flag, which
    /// the caller inspects.
    pub(crate) async fn modify(
        &self,
        hostname: &str,
        token: &str,
        lifetime: Option<u32>,
        tags: Option<&TagSet>,
    ) -> CliResult<String> {
        let url = self.endpoint(&format!("vm/{hostname}"));
        let mut body = Map::new();
        if let Some(lifetime) = lifetime {
            body.insert("lifetime".to_string(), Value::from(lifetime));
        }
        if let Some(tags) = tags {
            let tags = tags
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            body.insert("tags".to_string(), Value::Object(tags));
        }

        debug!(%url, "PUT modification request");
        let response = self
            .client
            .put(&url)
            .header(HEADER_AUTH_TOKEN, token)
            .json(&Value::Object(body))
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("modification request failed: {err}")))?;
        response.text().await.map_err(|err| {
            CliError::failure(anyhow!("failed to read modification response: {err}"))
        })
    }

    /// Schedule deletion of the given hosts as one batch call; atomicity of
    /// the batch is the service's concern.
    pub(crate) async fn delete(&self, hostnames: &[String], token: &str) -> CliResult<()> {
        let url = self.endpoint(&format!("vm/{}", hostnames.join("+")));
        debug!(%url, "DELETE hosts");
        let response = self
            .client
            .delete(&url)
            .header(HEADER_AUTH_TOKEN, token)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("deletion request failed: {err}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(classify_problem(response).await)
        }
    }

    /// Take a snapshot of one VM.
    pub(crate) async fn snapshot(&self, hostname: &str, token: &str) -> CliResult<Value> {
        let url = self.endpoint(&format!("vm/{hostname}/snapshot"));
        debug!(%url, "POST snapshot request");
        let response = self
            .client
            .post(&url)
            .header(HEADER_AUTH_TOKEN, token)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("snapshot request failed: {err}")))?;
        read_value(response, "snapshot").await
    }

    /// Revert one VM to a named snapshot.
    pub(crate) async fn revert(
        &self,
        hostname: &str,
        token: &str,
        snapshot_id: &str,
    ) -> CliResult<Value> {
        let url = self.endpoint(&format!("vm/{hostname}/snapshot/{snapshot_id}"));
        debug!(%url, "POST revert request");
        let response = self
            .client
            .post(&url)
            .header(HEADER_AUTH_TOKEN, token)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("revert request failed: {err}")))?;
        read_value(response, "revert").await
    }

    /// Fetch the service-wide status record.
    pub(crate) async fn status(&self) -> CliResult<Value> {
        let url = self.endpoint("status");
        debug!(%url, "GET pool status");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("status request failed: {err}")))?;
        read_value(response, "status").await
    }

    /// Fetch the service's daily summary record.
    pub(crate) async fn summary(&self) -> CliResult<Value> {
        let url = self.endpoint("summary");
        debug!(%url, "GET pool summary");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("summary request failed: {err}")))?;
        read_value(response, "summary").await
    }
}

async fn read_value(response: reqwest::Response, what: &str) -> CliResult<Value> {
    if response.status().is_success() {
        response
            .json::<Value>()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to parse {what} response: {err}")))
    } else {
        Err(classify_problem(response).await)
    }
}

/// Wire encoding of an allocation request: each OS type repeated `count`
/// times, joined with `+`.
pub(crate) fn os_path_segment(requests: &OsRequestSet) -> String {
    let mut parts = Vec::new();
    for (os_type, count) in requests {
        for _ in 0..*count {
            parts.push(os_type.as_str());
        }
    }
    parts.join("+")
}
