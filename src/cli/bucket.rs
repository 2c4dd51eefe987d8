//! Secrets bucket commands: bucket, read, download.

use std::path::Path;

use crate::cli::output;
use crate::core::hostdata::{Hostdata, StorageOptions};
use crate::error::Result;

/// Show the secrets bucket derived from instance metadata.
pub fn show(hostdata: &Hostdata, json: bool) -> Result<()> {
    let s3 = hostdata.storage_client(StorageOptions::default())?;

    if json {
        let value = serde_json::json!({
            "env": s3.env(),
            "region": s3.region(),
            "bucket": s3.bucket(),
        });
        output::data(&value.to_string());
        return Ok(());
    }

    output::section("Secrets bucket");
    output::kv("env:   ", s3.env());
    output::kv("region:", s3.region());
    output::kv("bucket:", s3.bucket());
    Ok(())
}

/// Print a file from the secrets bucket.
pub fn read(hostdata: &Hostdata, path: &str) -> Result<()> {
    let s3 = hostdata.storage_client(StorageOptions::default())?;
    let contents = s3.read_file(path)?;
    print!("{}", contents);
    Ok(())
}

/// Download a file from the secrets bucket.
pub fn download(hostdata: &Hostdata, remote: &str, local: &Path) -> Result<()> {
    let s3 = hostdata.storage_client(StorageOptions::default())?;
    s3.download_configs([(remote, local)])?;
    output::success(&format!(
        "downloaded {} to {}",
        output::path(&s3.object_key(remote)),
        output::path(&local.display().to_string())
    ));
    Ok(())
}
