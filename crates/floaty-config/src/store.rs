//! Read-only loader for the persisted option file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::StoredConfig;

/// File name of the persisted option file inside the user's home directory.
pub const CONFIG_FILE_NAME: &str = ".floaty.yml";

/// Reads persisted default options from a YAML file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by an explicit file path.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `~/.floaty.yml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HomeDir`] when no home directory can be
    /// resolved for the current user.
    pub fn from_home() -> ConfigResult<Self> {
        let base = BaseDirs::new().ok_or(ConfigError::HomeDir)?;
        Ok(Self::at_path(base.home_dir().join(CONFIG_FILE_NAME)))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted options. A missing file is not an error: first-run
    /// users have no config yet, so it loads as the empty option set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file exists but cannot be read,
    /// or [`ConfigError::Parse`] when its contents are not valid YAML for
    /// [`StoredConfig`].
    pub fn load(&self) -> ConfigResult<StoredConfig> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted config file");
                return Ok(StoredConfig::default());
            }
            Err(err) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        serde_yaml::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: self.path.clone(),
            source: err,
        })
    }
}
