//! Secrets bucket naming.

use crate::core::constants::SECRETS_BUCKET_PREFIX;
use crate::core::metadata::InstanceIdentity;

/// Name of the app secrets bucket for an instance.
///
/// Format: `login-gov.app-secrets.<account_id>-<region>`. The environment
/// is accepted for symmetry with the storage handle but is not part of the
/// name; provisioned buckets are per account and region.
pub fn bucket_name(_env: &str, identity: &InstanceIdentity) -> String {
    format!(
        "{}{}-{}",
        SECRETS_BUCKET_PREFIX, identity.account_id, identity.region
    )
}
