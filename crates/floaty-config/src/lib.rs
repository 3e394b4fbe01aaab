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

//! File-backed option store for the floaty CLI.
//!
//! Layout: `model.rs` (the persisted option set), `store.rs`
//! ([`ConfigStore`] reading `~/.floaty.yml`), `error.rs` (error types).
//! The store is read-only: the CLI never writes credentials back to disk.

pub mod error;
pub mod model;
pub mod store;

pub use error::{ConfigError, ConfigResult};
pub use model::StoredConfig;
pub use store::ConfigStore;
