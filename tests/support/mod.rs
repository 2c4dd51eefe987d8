//! Test support utilities for hostdata integration tests.
//!
//! Provides an isolated config root per test and in-memory doubles for the
//! metadata service and the secrets bucket.

#![allow(dead_code)]

pub mod assertions;
pub mod doubles;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use doubles::*;

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Test environment with an isolated config root.
///
/// The root (`<tmp>/login.gov`) is not created until a test asks for it,
/// so a fresh `Test` models a host outside the datacenter.
pub struct Test {
    /// Temporary directory holding the config root
    pub dir: TempDir,
    /// Config root path
    pub root: PathBuf,
}

impl Test {
    /// Create a test environment without a config root.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path().join("login.gov");
        Self { dir, root }
    }

    /// Create a test environment with an empty config root.
    pub fn datacenter() -> Self {
        let t = Self::new();
        fs::create_dir_all(&t.root).expect("failed to create config root");
        t
    }

    /// Write `info/<name>` under the config root, newline-terminated.
    pub fn write_info(&self, name: &str, value: &str) {
        let info = self.root.join("info");
        fs::create_dir_all(&info).expect("failed to create info dir");
        fs::write(info.join(name), format!("{}\n", value)).expect("failed to write info file");
    }

    /// Remove the config root entirely.
    pub fn remove_root(&self) {
        fs::remove_dir_all(&self.root).expect("failed to remove config root");
    }

    /// Create a hostdata command pointed at this test's config root.
    ///
    /// The metadata endpoint is set to an unroutable local port so nothing
    /// ever reaches a real metadata service.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("hostdata").expect("failed to find hostdata binary");
        cmd.env("HOSTDATA_ROOT", &self.root);
        cmd.env("HOSTDATA_METADATA_ENDPOINT", "http://127.0.0.1:9");
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("HOSTDATA_LOG");
        cmd
    }
}
