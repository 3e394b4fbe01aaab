#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Command-line client for a shared VM pool service.
//!
//! Layout:
//! - `cli.rs`: argument parsing, settings resolution, and command dispatch
//! - `commands/`: command handlers grouped by concern
//! - `client.rs`: shared HTTP plumbing, errors, and telemetry helpers
//! - `settings.rs`: the effective per-invocation configuration
//! - `request.rs`: positional-argument parsers
//! - `auth.rs`: bearer-token workflow and the masked password prompt
//! - `pool.rs`: pool-service collaborator calls
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod auth;
pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;
pub(crate) mod pool;
pub(crate) mod request;
pub(crate) mod settings;

pub use cli::run;
