//! Commands that operate on individual machines: query, modify, delete,
//! snapshot, revert.

use serde_json::Value;

use crate::auth::require_token;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_value;
use crate::pool::PoolClient;
use crate::request::{TagSet, parse_hostname_list};

/// Print the service's record for one VM.
pub(crate) async fn handle_query(ctx: &AppContext, hostname: &str) -> CliResult<()> {
    let pool = PoolClient::from_context(ctx)?;
    let record = pool.query(hostname).await?;
    println!("{}", render_value(&record)?);
    Ok(())
}

/// Update a VM's lifetime and/or tags.
///
/// The service signals the outcome in the body's `ok` flag rather than the
/// HTTP status, so the body is inspected here; a non-ok body is printed
/// verbatim and reported as a failed request.
pub(crate) async fn handle_modify(
    ctx: &AppContext,
    hostname: &str,
    lifetime: Option<u32>,
    tags: Option<&TagSet>,
) -> CliResult<()> {
    let token = require_token(&ctx.settings)?;
    let pool = PoolClient::from_context(ctx)?;
    let body = pool.modify(hostname, token, lifetime, tags).await?;

    let ok = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| value.get("ok").and_then(Value::as_bool))
        .unwrap_or(false);
    if ok {
        println!("Successfully modified vm {hostname}.");
        Ok(())
    } else {
        println!("{body}");
        Err(CliError::request(
            "the pool service did not acknowledge the modification",
        ))
    }
}

/// Schedule deletion of a comma-separated list of hosts.
pub(crate) async fn handle_delete(ctx: &AppContext, hostnames: Option<&str>) -> CliResult<()> {
    let hostnames = hostnames.map(parse_hostname_list).unwrap_or_default();
    if hostnames.is_empty() {
        return Err(CliError::validation("no hostnames were provided to delete"));
    }
    let token = require_token(&ctx.settings)?;
    let pool = PoolClient::from_context(ctx)?;
    pool.delete(&hostnames, token).await
}

/// Take a snapshot of one VM and print the service's acknowledgement.
pub(crate) async fn handle_snapshot(ctx: &AppContext, hostname: &str) -> CliResult<()> {
    let token = require_token(&ctx.settings)?;
    let pool = PoolClient::from_context(ctx)?;
    let ack = pool.snapshot(hostname, token).await?;
    println!("{}", render_value(&ack)?);
    Ok(())
}

/// Revert one VM to a named snapshot and print the acknowledgement.
pub(crate) async fn handle_revert(
    ctx: &AppContext,
    hostname: &str,
    snapshot_id: &str,
) -> CliResult<()> {
    let token = require_token(&ctx.settings)?;
    let pool = PoolClient::from_context(ctx)?;
    let ack = pool.revert(hostname, token, snapshot_id).await?;
    println!("{}", render_value(&ack)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HEADER_AUTH_TOKEN;
    use crate::settings::EffectiveConfig;
    use httpmock::prelude::*;
    use reqwest::Client;
    use serde_json::json;

    fn context_for(server: &MockServer) -> AppContext {
        AppContext {
            client: Client::new(),
            settings: EffectiveConfig {
                url: Some(server.base_url()),
                token: Some("tok123".to_string()),
                ..EffectiveConfig::default()
            },
        }
    }

    #[tokio::test]
    async fn query_prints_the_record_without_a_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/vm/vm1");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"ok": true, "vm1": {"state": "running"}}));
        });

        handle_query(&context_for(&server), "vm1")
            .await
            .expect("query should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn modify_with_an_ok_body_succeeds() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PUT)
                .path("/vm/vm1")
                .header(HEADER_AUTH_TOKEN, "tok123");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"ok": true}));
        });

        handle_modify(&context_for(&server), "vm1", Some(12), None)
            .await
            .expect("modification should succeed");
    }

    #[tokio::test]
    async fn modify_with_a_non_ok_body_exits_one() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PUT).path("/vm/vm1");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"ok": false}));
        });

        let err = handle_modify(&context_for(&server), "vm1", Some(12), None)
            .await
            .expect_err("non-ok body should fail");
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn modify_without_flags_still_issues_the_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/vm/vm1")
                .header(HEADER_AUTH_TOKEN, "tok123")
                .json_body(json!({}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"ok": true}));
        });

        handle_modify(&context_for(&server), "vm1", None, None)
            .await
            .expect("a flag-less modification should round-trip");
        mock.assert();
    }

    #[tokio::test]
    async fn delete_without_hostnames_fails_before_any_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path_includes("/vm");
            then.status(200);
        });

        let err = handle_delete(&context_for(&server), None)
            .await
            .expect_err("deleting nothing should fail");
        assert_eq!(err.exit_code(), 1);
        let err = handle_delete(&context_for(&server), Some(" , ,"))
            .await
            .expect_err("deleting nothing should fail");
        assert_eq!(err.exit_code(), 1);
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn delete_batches_all_hosts_in_one_call() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE)
                .path("/vm/vm1+vm2")
                .header(HEADER_AUTH_TOKEN, "tok123");
            then.status(200);
        });

        handle_delete(&context_for(&server), Some("vm1, vm2"))
            .await
            .expect("deletion should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn snapshot_requires_a_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/vm/vm1/snapshot");
            then.status(200);
        });

        let mut ctx = context_for(&server);
        ctx.settings.token = None;
        let err = handle_snapshot(&ctx, "vm1")
            .await
            .expect_err("snapshot without a token should fail");
        assert_eq!(err.exit_code(), 1);
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn revert_posts_to_the_named_snapshot() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/vm/vm1/snapshot/abc123")
                .header(HEADER_AUTH_TOKEN, "tok123");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"ok": true}));
        });

        handle_revert(&context_for(&server), "vm1", "abc123")
            .await
            .expect("revert should succeed");
        mock.assert();
    }
}
