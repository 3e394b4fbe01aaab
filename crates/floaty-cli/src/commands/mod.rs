//! Command handlers, one module per command family.

pub(crate) mod get;
pub(crate) mod pool;
pub(crate) mod token;
pub(crate) mod vm;
