//! Command-line surface and top-level runner.

use std::io;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use floaty_config::{ConfigStore, StoredConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::auth::TokenAction;
use crate::client::{
    AppContext, CliDependencies, CliError, CliResult, DEFAULT_TIMEOUT_SECS,
};
use crate::commands;
use crate::request::{TagSet, parse_tags};
use crate::settings::EffectiveConfig;

/// Parses CLI arguments, executes the requested command, and handles
/// user-facing telemetry emission. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();

    let stored = match stored_config() {
        Ok(stored) => stored,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };
    let settings = EffectiveConfig::resolve(&cli, &stored);
    init_tracing(settings.verbose);

    let deps = match CliDependencies::from_env(cli.timeout, &trace_id) {
        Ok(deps) => deps,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };
    let telemetry = deps.telemetry.clone();
    let ctx = AppContext {
        client: deps.client.clone(),
        settings,
    };

    let result = dispatch(cli.command, &ctx).await;

    let (exit_code, message, outcome) = match result {
        Ok(()) => (0, None, "success"),
        Err(err) => {
            let exit_code = err.exit_code();
            let message = err.display_message();
            eprintln!("error: {message}");
            (exit_code, Some(message), "error")
        }
    };

    if let Some(emitter) = &telemetry {
        emitter
            .emit(
                &trace_id,
                command_name,
                outcome,
                exit_code,
                message.as_deref(),
            )
            .await;
    }

    exit_code
}

async fn dispatch(command: Command, ctx: &AppContext) -> CliResult<()> {
    match command {
        Command::Get(args) => commands::get::handle_get(ctx, &args.os_types, args.notoken).await,
        Command::List(args) => commands::pool::handle_list(ctx, args.filter.as_deref()).await,
        Command::Query(args) => commands::vm::handle_query(ctx, &args.hostname).await,
        Command::Modify(args) => {
            commands::vm::handle_modify(ctx, &args.hostname, args.lifetime, args.tags.as_ref())
                .await
        }
        Command::Delete(args) => {
            commands::vm::handle_delete(ctx, args.hostnames.as_deref()).await
        }
        Command::Snapshot(args) => commands::vm::handle_snapshot(ctx, &args.hostname).await,
        Command::Revert(args) => {
            commands::vm::handle_revert(ctx, &args.hostname, &args.snapshot).await
        }
        Command::Status => commands::pool::handle_status(ctx).await,
        Command::Summary => commands::pool::handle_summary(ctx).await,
        Command::Token(args) => commands::token::handle_token(ctx, args.action.as_deref()).await,
    }
}

#[derive(Parser)]
#[command(name = "floaty", about = "CLI client for a vmpooler-style VM pool service")]
pub(crate) struct Cli {
    /// Surface debug-level diagnostics on stderr.
    #[arg(long, global = true)]
    pub(crate) verbose: bool,
    /// Base URL of the pool service.
    #[arg(long, global = true, env = "FLOATY_URL")]
    pub(crate) url: Option<String>,
    /// Bearer token for authenticated operations.
    #[arg(long, global = true, env = "FLOATY_TOKEN")]
    pub(crate) token: Option<String>,
    /// User name for credential exchanges.
    #[arg(long, global = true, env = "FLOATY_USER")]
    pub(crate) user: Option<String>,
    #[arg(
        long,
        global = true,
        env = "FLOATY_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Request one or more machines from the pool.
    Get(GetArgs),
    /// List the OS types the pool can provide.
    List(ListArgs),
    /// Show the service's record for one VM.
    Query(QueryArgs),
    /// Change a VM's lifetime and/or tags.
    Modify(ModifyArgs),
    /// Schedule VMs for deletion.
    Delete(DeleteArgs),
    /// Take a snapshot of a VM.
    Snapshot(SnapshotArgs),
    /// Revert a VM to a named snapshot.
    Revert(RevertArgs),
    /// Show the service-wide status record.
    Status,
    /// Show the service's daily summary.
    Summary,
    /// Manage the bearer token (get, delete, status).
    Token(TokenArgs),
}

#[derive(Args)]
pub(crate) struct GetArgs {
    /// OS types to request, each optionally suffixed `=count`.
    pub(crate) os_types: Vec<String>,
    /// Request without authenticating and print the raw response.
    #[arg(long)]
    pub(crate) notoken: bool,
}

#[derive(Args)]
pub(crate) struct ListArgs {
    /// Substring to filter the listing by.
    pub(crate) filter: Option<String>,
}

#[derive(Args)]
pub(crate) struct QueryArgs {
    pub(crate) hostname: String,
}

#[derive(Args)]
pub(crate) struct ModifyArgs {
    pub(crate) hostname: String,
    /// New lifetime in hours.
    #[arg(long)]
    pub(crate) lifetime: Option<u32>,
    /// Tags as a JSON object of string values.
    #[arg(long, value_parser = parse_tags)]
    pub(crate) tags: Option<TagSet>,
}

#[derive(Args)]
pub(crate) struct DeleteArgs {
    /// Comma-separated hostnames to delete.
    pub(crate) hostnames: Option<String>,
}

#[derive(Args)]
pub(crate) struct SnapshotArgs {
    pub(crate) hostname: String,
}

#[derive(Args)]
pub(crate) struct RevertArgs {
    pub(crate) hostname: String,
    /// Snapshot identifier to revert to.
    #[arg(long)]
    pub(crate) snapshot: String,
}

#[derive(Args)]
pub(crate) struct TokenArgs {
    /// One of `get`, `delete`, or `status`.
    pub(crate) action: Option<String>,
}

/// Load the persisted config, treating an unavailable home directory as an
/// empty store. A present but unreadable file is a hard failure.
fn stored_config() -> CliResult<StoredConfig> {
    let store = match ConfigStore::from_home() {
        Ok(store) => store,
        Err(err) => {
            debug!(error = %err, "home directory unavailable, using defaults");
            return Ok(StoredConfig::default());
        }
    };
    store.load().map_err(|err| {
        CliError::failure(anyhow!(
            "failed to read {}: {err}",
            store.path().display()
        ))
    })
}

/// Install the stderr tracing subscriber. `FLOATY_LOG` overrides the
/// verbosity chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("FLOATY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Get(_) => "get",
        Command::List(_) => "list",
        Command::Query(_) => "query",
        Command::Modify(_) => "modify",
        Command::Delete(_) => "delete",
        Command::Snapshot(_) => "snapshot",
        Command::Revert(_) => "revert",
        Command::Status => "status",
        Command::Summary => "summary",
        Command::Token(args) => match args.action.as_deref().map(TokenAction::parse) {
            Some(TokenAction::Get) => "token_get",
            Some(TokenAction::Delete) => "token_delete",
            Some(TokenAction::Status) => "token_status",
            Some(TokenAction::Unknown(_)) | None => "token_other",
        },
    }
}
