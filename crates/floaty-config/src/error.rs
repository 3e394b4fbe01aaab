//! Error types for persisted-configuration access.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for persisted-configuration access.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No home directory could be resolved for the current user.
    #[error("could not determine a home directory for the current user")]
    HomeDir,
    /// Reading the config file failed for a reason other than absence.
    #[error("failed to read config file")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The config file exists but is not valid YAML for the expected shape.
    #[error("config file is not valid YAML")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Source parse error.
        source: serde_yaml::Error,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
