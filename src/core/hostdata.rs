//! Host identity context.
//!
//! [`Hostdata`] answers "where am I running" questions for a process:
//! whether the host is in a managed datacenter, which domain and
//! environment it belongs to, and which secrets bucket it should read.
//! Answers are resolved lazily and memoized until [`Hostdata::reset`].
//!
//! Construct one at startup and share it (`Arc<Hostdata>`) with whatever
//! needs it. All operations are blocking; do not call them from inside an
//! async runtime.
//!
//! ## Example
//!
//! ```no_run
//! use hostdata::core::hostdata::{Hostdata, StorageOptions};
//!
//! # fn main() -> hostdata::error::Result<()> {
//! let host = Hostdata::new();
//!
//! host.in_datacenter(|h| -> hostdata::error::Result<()> {
//!     let s3 = h.storage_client(StorageOptions::default())?;
//!     let secrets = s3.read_file("/%{env}/v1/idp/secrets.yml")?;
//!     println!("{} bytes of secrets", secrets.len());
//!     Ok(())
//! });
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, Dispatch};

use crate::core::bucket::bucket_name;
use crate::core::config::ConfigRoot;
use crate::core::constants;
use crate::core::logging::{default_logger, with_logger};
use crate::core::metadata::{self, ImdsTransport, MetadataTransport};
use crate::core::storage::{ObjectStore, S3Store, StorageClient};
use crate::error::{ConfigError, Result};

/// Overrides for [`Hostdata::storage_client`].
///
/// Only applied when the handle is built. Once a handle is memoized, later
/// options are ignored until [`Hostdata::reset`].
#[derive(Default, Clone)]
pub struct StorageOptions {
    /// Use this store instead of constructing an [`S3Store`].
    pub client: Option<Arc<dyn ObjectStore>>,
    /// Logger for the handle; defaults to the context logger.
    pub logger: Option<Dispatch>,
}

impl StorageOptions {
    pub fn client(mut self, client: Arc<dyn ObjectStore>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn logger(mut self, logger: Dispatch) -> Self {
        self.logger = Some(logger);
        self
    }
}

/// Which info file a value comes from.
#[derive(Debug, Clone, Copy)]
enum Info {
    Domain,
    Env,
}

impl Info {
    fn file(self) -> &'static str {
        match self {
            Info::Domain => constants::DOMAIN_FILE,
            Info::Env => constants::ENV_FILE,
        }
    }
}

/// Memoized values. `None` means unresolved.
#[derive(Default)]
struct State {
    domain: Option<Option<String>>,
    env: Option<Option<String>>,
    in_datacenter: Option<bool>,
    storage: Option<Arc<StorageClient>>,
    logger: Option<Dispatch>,
}

impl State {
    fn logger(&mut self) -> Dispatch {
        self.logger.get_or_insert_with(default_logger).clone()
    }
}

/// Memoizing host identity context.
pub struct Hostdata {
    root: ConfigRoot,
    transport: Arc<dyn MetadataTransport>,
    state: Mutex<State>,
}

impl Hostdata {
    /// Context for the default config root and metadata service.
    pub fn new() -> Self {
        Self::with_root(constants::CONFIG_ROOT)
    }

    /// Context reading configuration from `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: ConfigRoot::new(root),
            transport: Arc::new(ImdsTransport::new()),
            state: Mutex::new(State::default()),
        }
    }

    /// Replace the metadata transport.
    pub fn transport(mut self, transport: Arc<dyn MetadataTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Config root this context reads from.
    pub fn root(&self) -> &ConfigRoot {
        &self.root
    }

    /// Domain this host serves, or `None` outside a datacenter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the config root exists but
    /// `info/domain` does not.
    pub fn domain(&self) -> Result<Option<String>> {
        let mut state = self.lock();
        self.info(&mut state, Info::Domain)
    }

    /// Environment name (e.g. `int`, `staging`), or `None` outside a
    /// datacenter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the config root exists but
    /// `info/env` does not.
    pub fn env(&self) -> Result<Option<String>> {
        let mut state = self.lock();
        self.info(&mut state, Info::Env)
    }

    /// Check whether the host is in a managed datacenter.
    pub fn is_in_datacenter(&self) -> bool {
        let mut state = self.lock();
        self.detect(&mut state)
    }

    /// Run `f` with this context when in a datacenter.
    ///
    /// Returns `Some` with the callback's result if it ran, `None` otherwise.
    /// The callback is required:
    ///
    /// ```compile_fail
    /// let hostdata = hostdata::core::hostdata::Hostdata::new();
    /// hostdata.in_datacenter();
    /// ```
    pub fn in_datacenter<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&Self) -> R,
    {
        if self.is_in_datacenter() {
            Some(f(self))
        } else {
            None
        }
    }

    /// Handle to the secrets bucket for this host.
    ///
    /// Reads the environment, fetches the instance identity and derives the
    /// bucket name. The handle is memoized: options passed after the first
    /// successful call are ignored until [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInDatacenter` outside a datacenter,
    /// propagates `ConfigError::Missing` for `info/env`, metadata errors,
    /// and `StorageError::Runtime` if an `S3Store` cannot be created.
    pub fn storage_client(&self, options: StorageOptions) -> Result<Arc<StorageClient>> {
        let mut state = self.lock();
        if let Some(storage) = state.storage.clone() {
            if options.client.is_some() || options.logger.is_some() {
                let logger = state.logger();
                with_logger(&logger, || {
                    debug!(bucket = %storage.bucket(), "storage client memoized, ignoring options");
                });
            }
            return Ok(storage);
        }

        let env = self.info(&mut state, Info::Env)?.ok_or_else(|| {
            ConfigError::NotInDatacenter {
                root: self.root.path().to_path_buf(),
            }
        })?;

        let logger = state.logger();
        let identity = with_logger(&logger, || metadata::fetch(self.transport.as_ref()))?;
        let bucket = bucket_name(&env, &identity);

        let client: Arc<dyn ObjectStore> = match options.client {
            Some(client) => client,
            None => Arc::new(S3Store::new(&identity.region, &bucket)?),
        };
        let logger = options.logger.unwrap_or(logger);

        with_logger(&logger, || {
            debug!(env = %env, region = %identity.region, bucket = %bucket, "storage client ready");
        });

        let storage = Arc::new(StorageClient::new(
            env,
            identity.region,
            bucket,
            client,
            logger,
        ));
        state.storage = Some(Arc::clone(&storage));
        Ok(storage)
    }

    /// Current logger.
    pub fn logger(&self) -> Dispatch {
        self.lock().logger()
    }

    /// Replace the logger.
    pub fn set_logger(&self, logger: Dispatch) {
        self.lock().logger = Some(logger);
    }

    /// Forget every memoized value and restore the default logger.
    pub fn reset(&self) {
        *self.lock() = State::default();
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Fields are only assigned after a successful resolution
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn detect(&self, state: &mut State) -> bool {
        if let Some(present) = state.in_datacenter {
            return present;
        }
        let present = self.root.exists();
        with_logger(&state.logger(), || {
            debug!(root = %self.root.path().display(), present, "datacenter detection");
        });
        state.in_datacenter = Some(present);
        present
    }

    fn info(&self, state: &mut State, info: Info) -> Result<Option<String>> {
        let cached = match info {
            Info::Domain => &state.domain,
            Info::Env => &state.env,
        };
        if let Some(value) = cached {
            return Ok(value.clone());
        }

        let value = if self.detect(state) {
            let logger = state.logger();
            with_logger(&logger, || self.root.read_required(info.file()))?
        } else {
            None
        };

        let slot = match info {
            Info::Domain => &mut state.domain,
            Info::Env => &mut state.env,
        };
        *slot = Some(value.clone());
        Ok(value)
    }
}

impl Default for Hostdata {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hostdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hostdata")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
