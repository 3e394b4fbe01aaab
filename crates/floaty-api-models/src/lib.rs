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

//! Shared HTTP DTOs for the pool-service API.
//!
//! These types are re-used by the CLI for response decoding so the wire
//! contract lives in one place. The service keys its allocation payload by
//! OS type, which is why [`AllocationResponse`] flattens everything that is
//! not `ok`/`domain` into a per-OS map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response body returned by the allocation endpoint.
///
/// Shape on the wire:
/// `{"ok": true, "domain": "example.com", "centos": {"hostname": [..]}}` —
/// every key other than `ok` and `domain` names an OS type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationResponse {
    /// Whether the service accepted the allocation request.
    pub ok: bool,
    /// DNS domain to append to bare hostnames, when the service reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Allocated hosts keyed by OS type.
    #[serde(flatten)]
    pub hosts: BTreeMap<String, OsAllocation>,
}

/// Hosts granted for a single OS type within an allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OsAllocation {
    /// One hostname or several, depending on the requested count.
    pub hostname: HostnameList,
}

/// The service encodes a single host as a bare string and multiple hosts as
/// an array; both decode into this list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum HostnameList {
    /// Single allocated host.
    One(String),
    /// Multiple allocated hosts.
    Many(Vec<String>),
}

impl HostnameList {
    /// View the list as a slice of hostnames regardless of wire encoding.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::One(name) => vec![name.as_str()],
            Self::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// Response body returned by the credential-exchange endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenCreated {
    /// Whether the exchange succeeded.
    pub ok: bool,
    /// The freshly minted bearer token.
    pub token: String,
}
