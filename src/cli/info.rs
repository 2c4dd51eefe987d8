//! Host info commands: status, env, domain.

use crate::cli::output;
use crate::core::hostdata::Hostdata;
use crate::error::{ConfigError, Result};

/// Show datacenter presence, domain and environment.
///
/// Outside a datacenter domain and env are reported as absent; inside,
/// a missing info file is an error.
pub fn status(hostdata: &Hostdata, json: bool) -> Result<()> {
    let in_datacenter = hostdata.is_in_datacenter();
    let domain = hostdata.domain()?;
    let env = hostdata.env()?;

    if json {
        let value = serde_json::json!({
            "root": hostdata.root().path(),
            "in_datacenter": in_datacenter,
            "domain": domain,
            "env": env,
        });
        output::data(&value.to_string());
        return Ok(());
    }

    output::section("Host");
    output::kv(
        "root:         ",
        output::path(&hostdata.root().path().display().to_string()),
    );
    output::kv("in datacenter:", if in_datacenter { "yes" } else { "no" });
    output::kv("domain:       ", domain.as_deref().unwrap_or("-"));
    output::kv("env:          ", env.as_deref().unwrap_or("-"));
    Ok(())
}

/// Print the environment name.
pub fn env(hostdata: &Hostdata) -> Result<()> {
    let env = hostdata.env()?.ok_or_else(|| not_in_datacenter(hostdata))?;
    output::data(&env);
    Ok(())
}

/// Print the domain.
pub fn domain(hostdata: &Hostdata) -> Result<()> {
    let domain = hostdata.domain()?.ok_or_else(|| not_in_datacenter(hostdata))?;
    output::data(&domain);
    Ok(())
}

fn not_in_datacenter(hostdata: &Hostdata) -> ConfigError {
    ConfigError::NotInDatacenter {
        root: hostdata.root().path().to_path_buf(),
    }
}
