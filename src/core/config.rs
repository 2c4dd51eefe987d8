//! Host configuration under the config root.
//!
//! Values live in single-line files below the root (`info/domain`,
//! `info/env`). A missing root is not an error: it means the process is
//! running outside a managed datacenter.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{constants, detect};
use crate::error::{ConfigError, Result};

/// Root configuration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRoot {
    path: PathBuf,
}

impl ConfigRoot {
    /// Use a specific directory as the config root.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the root directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the root exists (the host is in a datacenter).
    pub fn exists(&self) -> bool {
        detect::in_datacenter(&self.path)
    }

    /// Read a required value relative to the root.
    ///
    /// Returns `Ok(None)` when the root itself is absent, and the file
    /// contents with trailing whitespace trimmed otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the root exists but the file does
    /// not, or `ConfigError::Read` for any other I/O failure.
    pub fn read_required(&self, relative: impl AsRef<Path>) -> Result<Option<String>> {
        if !self.exists() {
            debug!(root = %self.path.display(), "config root absent");
            return Ok(None);
        }

        let path = self.path.join(relative);
        debug!(path = %path.display(), "reading config value");

        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents.trim_end().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ConfigError::Missing { path }.into())
            }
            Err(source) => Err(ConfigError::Read { path, source }.into()),
        }
    }
}

impl Default for ConfigRoot {
    fn default() -> Self {
        Self::new(constants::CONFIG_ROOT)
    }
}
