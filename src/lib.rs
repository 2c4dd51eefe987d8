//! Hostdata - Host identity discovery for fleet-managed hosts.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── info          # status, env, domain
//! │   ├── bucket        # bucket, read, download
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # Config root and info files
//!     ├── detect        # Datacenter detection
//!     ├── metadata      # Instance identity document
//!     ├── bucket        # Secrets bucket naming
//!     ├── storage/      # Bucket access
//!     │   ├── mod       # ObjectStore trait, StorageClient handle
//!     │   └── s3        # S3 implementation
//!     ├── logging       # Logger handles
//!     └── hostdata      # Memoizing Hostdata context
//! ```
//!
//! # Features
//!
//! - Datacenter detection from `/etc/login.gov`
//! - Environment and domain from `info/env` and `info/domain`
//! - Instance identity from the EC2 metadata service
//! - Per-account secrets bucket handle with `%{env}` path templating
//! - Explicit reset of memoized state

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::hostdata::{Hostdata, StorageOptions};
pub use crate::core::metadata::{InstanceIdentity, MetadataTransport};
pub use crate::core::storage::{ObjectStore, StorageClient};
pub use crate::error::{Error, Result};
