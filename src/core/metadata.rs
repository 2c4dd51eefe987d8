//! Instance identity metadata.
//!
//! Fetches the cloud instance identity document and extracts the account
//! and region the host runs in. Transport is pluggable through
//! [`MetadataTransport`]; the default goes through the AWS SDK IMDS client.
//!
//! One attempt per call. Callers that want retries compose them around
//! [`fetch`].

use aws_config::imds;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::core::constants;
use crate::error::{MetadataError, Result};

/// Identity of the running instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceIdentity {
    pub account_id: String,
    pub region: String,
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub availability_zone: Option<String>,
}

impl InstanceIdentity {
    /// Identity with only the fields the bucket name depends on.
    pub fn new(account_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            region: region.into(),
            instance_id: None,
            availability_zone: None,
        }
    }

    /// Parse an instance identity document.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Parse` if the body is not JSON or lacks
    /// `accountId` / `region`.
    pub fn parse(body: &str) -> Result<Self> {
        let identity: Self = serde_json::from_str(body).map_err(MetadataError::Parse)?;
        Ok(identity)
    }
}

/// Transport to the instance metadata service.
pub trait MetadataTransport: Send + Sync {
    /// GET `path` from the metadata service and return the body.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Fetch` on any transport failure.
    fn get(&self, path: &str) -> Result<String>;
}

/// Metadata transport backed by the AWS SDK IMDS client.
///
/// Uses the SDK's default endpoint resolution unless an endpoint is set.
/// The SDK retry policy is disabled: each call makes a single attempt.
#[derive(Debug, Clone, Default)]
pub struct ImdsTransport {
    endpoint: Option<String>,
}

impl ImdsTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send requests to a specific metadata endpoint (e.g. a local mock).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl MetadataTransport for ImdsTransport {
    fn get(&self, path: &str) -> Result<String> {
        trace!(path, endpoint = ?self.endpoint, "requesting instance metadata");

        // The SDK client is async; drive it on a throwaway runtime
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(MetadataError::Runtime)?;

        rt.block_on(async {
            let mut builder = imds::Client::builder().max_attempts(1);
            if let Some(endpoint) = &self.endpoint {
                builder = builder.endpoint(endpoint).map_err(|e| {
                    MetadataError::Fetch(format!("invalid endpoint {}: {}", endpoint, e))
                })?;
            }
            let client = builder.build();

            let body = client
                .get(path)
                .await
                .map_err(|e| MetadataError::Fetch(format!("GET {} failed: {}", path, e)))?;

            Ok(String::from(body))
        })
    }
}

/// Fetch and parse the instance identity document.
///
/// # Errors
///
/// Propagates transport errors (`MetadataError::Fetch`) and parse errors
/// (`MetadataError::Parse`).
pub fn fetch(transport: &dyn MetadataTransport) -> Result<InstanceIdentity> {
    let body = transport.get(constants::IDENTITY_DOCUMENT_PATH)?;
    let identity = InstanceIdentity::parse(&body)?;

    debug!(
        account_id = %identity.account_id,
        region = %identity.region,
        "fetched instance identity"
    );
    Ok(identity)
}
