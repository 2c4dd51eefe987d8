//! Hostdata - Host identity discovery for fleet-managed hosts.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hostdata::cli::output;
use hostdata::cli::{execute, Cli};
use hostdata::error::{ConfigError, Error, MetadataError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("HOSTDATA_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("hostdata=debug")
        } else {
            EnvFilter::new("hostdata=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).without_time())
        .init();

    // Route library events through the global subscriber configured above
    let hostdata = cli.hostdata();
    hostdata.set_logger(tracing::dispatcher::get_default(|d| d.clone()));

    if let Err(e) = execute(cli.command, &hostdata) {
        // Format error with suggestion if available
        let suggestion = match &e {
            Error::Config(ConfigError::NotInDatacenter { .. }) => {
                Some("set --root or HOSTDATA_ROOT to the provisioned config directory")
            }
            Error::Config(ConfigError::Missing { .. }) => {
                Some("the host is only partially provisioned")
            }
            Error::Metadata(MetadataError::Fetch(_)) => {
                Some("is this an EC2 instance? set HOSTDATA_METADATA_ENDPOINT to override")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
