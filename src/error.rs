//! Error types.
//!
//! Each layer has its own error enum; [`Error`] wraps them so callers can
//! use a single `Result` alias and still match on the failing layer.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reading host configuration under the config root.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config root exists but a required file under it does not.
    #[error("missing config file: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A value was required but the host is not in a datacenter.
    #[error("not running in a datacenter: {} does not exist", root.display())]
    NotInDatacenter { root: PathBuf },
}

/// Errors fetching or parsing the instance identity document.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to create runtime: {0}")]
    Runtime(std::io::Error),

    #[error("failed to fetch instance metadata: {0}")]
    Fetch(String),

    #[error("malformed instance identity document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors talking to the secrets bucket.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to create runtime: {0}")]
    Runtime(std::io::Error),

    #[error("{op} failed for s3://{bucket}/{key}: {reason}")]
    Request {
        op: &'static str,
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("object is not valid UTF-8: {key}")]
    InvalidUtf8 { key: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
