//! The `get` command: request machines from the pool.

use tracing::debug;

use crate::auth::{AuthClient, prompt_password, require_user};
use crate::client::{AppContext, CliResult};
use crate::output::format_host_list;
use crate::pool::PoolClient;
use crate::request::parse_os_requests;

/// Request one or more machines and print their fully qualified names.
///
/// With `--notoken` the allocation is attempted unauthenticated and the
/// service's response is printed verbatim. Otherwise a persisted token is
/// used when one is configured, and a credential exchange is performed as a
/// last resort.
pub(crate) async fn handle_get(
    ctx: &AppContext,
    os_types: &[String],
    notoken: bool,
) -> CliResult<()> {
    let requests = parse_os_requests(os_types);
    if requests.is_empty() {
        eprintln!("warning: no operating systems were requested");
    }
    let pool = PoolClient::from_context(ctx)?;

    if notoken {
        let body = pool.allocate_raw(&requests).await?;
        println!("{body}");
        return Ok(());
    }

    let token = match ctx.settings.token.as_deref() {
        Some(token) => token.to_string(),
        None => {
            debug!("no token configured, performing credential exchange");
            let user = require_user(&ctx.settings)?;
            let password = prompt_password()?;
            let auth = AuthClient::from_context(ctx)?;
            auth.acquire_token(user, &password).await?
        }
    };

    let allocation = pool.allocate(&requests, &token).await?;
    print!("{}", format_host_list(&allocation));
    Ok(())
}
