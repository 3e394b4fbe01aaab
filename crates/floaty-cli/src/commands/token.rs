//! The `token` command family: get, delete, status.

use crate::auth::{AuthClient, TokenAction, prompt_password, require_token, require_user};
use crate::client::{AppContext, CliResult};
use crate::output::render_value;

/// Dispatch a `token` subcommand.
///
/// A missing or unrecognised action prints a diagnostic and exits cleanly
/// without touching the network; only the three known actions reach the
/// service.
pub(crate) async fn handle_token(ctx: &AppContext, action: Option<&str>) -> CliResult<()> {
    let Some(raw) = action else {
        eprintln!("No token operation provided.");
        return Ok(());
    };

    match TokenAction::parse(raw) {
        TokenAction::Get => {
            let user = require_user(&ctx.settings)?;
            let password = prompt_password()?;
            let auth = AuthClient::from_context(ctx)?;
            let token = auth.acquire_token(user, &password).await?;
            println!("{token}");
            Ok(())
        }
        TokenAction::Delete => {
            let token = require_token(&ctx.settings)?;
            let user = require_user(&ctx.settings)?;
            let password = prompt_password()?;
            let auth = AuthClient::from_context(ctx)?;
            let ack = auth.revoke_token(user, &password, token).await?;
            println!("{}", render_value(&ack)?);
            Ok(())
        }
        TokenAction::Status => {
            let token = require_token(&ctx.settings)?;
            let auth = AuthClient::from_context(ctx)?;
            let status = auth.token_status(token).await?;
            println!("{}", render_value(&status)?);
            Ok(())
        }
        TokenAction::Unknown(other) => {
            eprintln!("Unknown token operation: {other}");
            Ok(())
        }
    }
}
