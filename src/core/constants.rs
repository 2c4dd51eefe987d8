//! Constants used throughout hostdata.
//!
//! Centralizes well-known paths, endpoints and naming formats.

/// Root configuration directory; its presence means "in a datacenter".
pub const CONFIG_ROOT: &str = "/etc/login.gov";

/// Domain file, relative to the config root.
pub const DOMAIN_FILE: &str = "info/domain";

/// Environment name file, relative to the config root.
pub const ENV_FILE: &str = "info/env";

/// Instance identity document path on the metadata service.
pub const IDENTITY_DOCUMENT_PATH: &str = "/2016-09-02/dynamic/instance-identity/document";

/// Prefix of the per-account secrets bucket.
///
/// Existing bucket provisioning depends on this exact literal.
pub const SECRETS_BUCKET_PREFIX: &str = "login-gov.app-secrets.";

/// Placeholder substituted with the environment name in object paths.
pub const ENV_PLACEHOLDER: &str = "%{env}";
