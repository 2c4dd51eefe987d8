//! Secrets bucket access.
//!
//! [`ObjectStore`] abstracts the underlying bucket client so tests and
//! callers can inject their own; [`S3Store`] is the real implementation.
//! [`StorageClient`] is the handle returned by
//! [`Hostdata::storage_client`](crate::core::hostdata::Hostdata::storage_client),
//! carrying the environment, region, bucket and logger alongside the client.
//!
//! ## Adding a New Store
//!
//! 1. Implement the `ObjectStore` trait
//! 2. Pass it through `StorageOptions::client`

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, Dispatch};

use crate::core::constants::ENV_PLACEHOLDER;
use crate::core::logging::with_logger;
use crate::error::{Result, StorageError};

mod s3;

pub use s3::S3Store;

/// Object storage bound to a single bucket.
pub trait ObjectStore: Send + Sync {
    /// Fetch the object at `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Request` if the object cannot be fetched.
    fn get_object(&self, key: &str) -> Result<Vec<u8>>;

    /// Store `body` at `key`, replacing any existing object.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Request` if the upload fails.
    fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()>;

    /// List object keys starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Request` if listing fails.
    fn list_objects(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Handle to the per-environment secrets bucket.
#[derive(Clone)]
pub struct StorageClient {
    env: String,
    region: String,
    bucket: String,
    client: Arc<dyn ObjectStore>,
    logger: Dispatch,
}

impl StorageClient {
    pub fn new(
        env: impl Into<String>,
        region: impl Into<String>,
        bucket: impl Into<String>,
        client: Arc<dyn ObjectStore>,
        logger: Dispatch,
    ) -> Self {
        Self {
            env: env.into(),
            region: region.into(),
            bucket: bucket.into(),
            client,
            logger,
        }
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Underlying object store.
    pub fn client(&self) -> &Arc<dyn ObjectStore> {
        &self.client
    }

    pub fn logger(&self) -> &Dispatch {
        &self.logger
    }

    /// Object key for `path` with every `%{env}` replaced by the environment.
    pub fn object_key(&self, path: &str) -> String {
        path.replace(ENV_PLACEHOLDER, &self.env)
    }

    /// Read a text file from the bucket.
    ///
    /// # Errors
    ///
    /// Propagates store errors; returns `StorageError::InvalidUtf8` if the
    /// object is not text.
    pub fn read_file(&self, path: &str) -> Result<String> {
        let key = self.object_key(path);
        with_logger(&self.logger, || {
            debug!(bucket = %self.bucket, key = %key, "reading object");
        });

        let body = self.client.get_object(&key)?;
        String::from_utf8(body).map_err(|_| StorageError::InvalidUtf8 { key }.into())
    }

    /// Download each `(remote, local)` pair from the bucket to disk.
    ///
    /// Parent directories are created as needed. Files are written with
    /// mode 0600 on Unix. Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates read errors; returns `StorageError::Write` if a local file
    /// cannot be written.
    pub fn download_configs<I, R, L>(&self, files: I) -> Result<()>
    where
        I: IntoIterator<Item = (R, L)>,
        R: AsRef<str>,
        L: AsRef<Path>,
    {
        for (remote, local) in files {
            let local = local.as_ref();
            let contents = self.read_file(remote.as_ref())?;
            write_private(local, contents.as_bytes())?;

            with_logger(&self.logger, || {
                debug!(
                    remote = remote.as_ref(),
                    local = %local.display(),
                    "downloaded config"
                );
            });
        }
        Ok(())
    }
}

impl fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageClient")
            .field("env", &self.env)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, contents).map_err(write_err)?;

    // Restrict permissions on downloaded secrets (Unix only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(write_err)?;
    }

    Ok(())
}
