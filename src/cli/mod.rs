//! Command-line interface.

pub mod bucket;
pub mod info;
pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::core::constants;
use crate::core::hostdata::Hostdata;
use crate::core::metadata::ImdsTransport;

/// Hostdata - Host identity discovery for fleet-managed hosts.
#[derive(Parser)]
#[command(
    name = "hostdata",
    about = "Discover environment, domain and secrets bucket for this host",
    version
)]
pub struct Cli {
    /// Config root whose presence means "in a datacenter"
    #[arg(long, global = true, env = "HOSTDATA_ROOT", default_value = constants::CONFIG_ROOT)]
    pub root: PathBuf,

    /// Instance metadata endpoint (defaults to the SDK's resolution)
    #[arg(long, global = true, env = "HOSTDATA_METADATA_ENDPOINT")]
    pub metadata_endpoint: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Build the host context described by the global flags.
    pub fn hostdata(&self) -> Hostdata {
        let transport = match &self.metadata_endpoint {
            Some(endpoint) => ImdsTransport::with_endpoint(endpoint.clone()),
            None => ImdsTransport::new(),
        };
        Hostdata::with_root(&self.root).transport(Arc::new(transport))
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Show datacenter presence, domain and environment
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the environment name
    Env,

    /// Print the domain
    Domain,

    /// Show the secrets bucket derived from instance metadata
    Bucket {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a file from the secrets bucket (`%{env}` is substituted)
    Read {
        /// Object path, e.g. /%{env}/v1/idp/secrets.yml
        path: String,
    },

    /// Download a file from the secrets bucket to a local path
    Download {
        /// Object path, e.g. /%{env}/v1/idp/database.yml
        remote: String,
        /// Local destination
        local: PathBuf,
    },
}

/// Execute a command against a host context.
pub fn execute(command: Command, hostdata: &Hostdata) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Status { json } => info::status(hostdata, json),
        Env => info::env(hostdata),
        Domain => info::domain(hostdata),
        Bucket { json } => bucket::show(hostdata, json),
        Read { path } => bucket::read(hostdata, &path),
        Download { remote, local } => bucket::download(hostdata, &remote, &local),
    }
}
