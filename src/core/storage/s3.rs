//! S3 object store.
//!
//! Uses AWS credentials from the environment (AWS_ACCESS_KEY_ID, etc.),
//! the instance profile, or the rest of the default provider chain.

use std::sync::OnceLock;

use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tokio::runtime::Runtime;
use tracing::trace;

use super::ObjectStore;
use crate::error::{Result, StorageError};

/// S3 bucket client for one region and bucket.
///
/// The SDK client is built on first use, so constructing a store never
/// touches the network or credential chain.
pub struct S3Store {
    region: String,
    bucket: String,
    runtime: Runtime,
    client: OnceLock<aws_sdk_s3::Client>,
}

impl S3Store {
    /// Create a store for `bucket` in `region`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Runtime` if the async runtime cannot be created.
    pub fn new(region: impl Into<String>, bucket: impl Into<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(StorageError::Runtime)?;

        Ok(Self {
            region: region.into(),
            bucket: bucket.into(),
            runtime,
            client: OnceLock::new(),
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn client(&self) -> &aws_sdk_s3::Client {
        self.client.get_or_init(|| {
            trace!(region = %self.region, "loading AWS config");
            self.runtime.block_on(async {
                let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(Region::new(self.region.clone()))
                    .load()
                    .await;
                aws_sdk_s3::Client::new(&config)
            })
        })
    }

    /// Build a request error; wrap SDK errors in `DisplayErrorContext` so the
    /// service error code is kept.
    fn request_error(&self, op: &'static str, key: &str, reason: impl ToString) -> StorageError {
        StorageError::Request {
            op,
            bucket: self.bucket.clone(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ObjectStore for S3Store {
    fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        trace!(bucket = %self.bucket, key, "GetObject");
        let client = self.client();

        self.runtime.block_on(async {
            let output = client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| self.request_error("GetObject", key, DisplayErrorContext(&e)))?;

            let data = output
                .body
                .collect()
                .await
                .map_err(|e| self.request_error("GetObject", key, DisplayErrorContext(&e)))?;

            Ok(data.into_bytes().to_vec())
        })
    }

    fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        trace!(bucket = %self.bucket, key, len = body.len(), "PutObject");
        let client = self.client();

        self.runtime.block_on(async {
            client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .body(ByteStream::from(body))
                .send()
                .await
                .map_err(|e| self.request_error("PutObject", key, DisplayErrorContext(&e)))?;
            Ok(())
        })
    }

    fn list_objects(&self, prefix: &str) -> Result<Vec<String>> {
        trace!(bucket = %self.bucket, prefix, "ListObjectsV2");
        let client = self.client();

        self.runtime.block_on(async {
            let mut keys = Vec::new();
            let mut token: Option<String> = None;

            loop {
                let output = client
                    .list_objects_v2()
                    .bucket(&self.bucket)
                    .prefix(prefix)
                    .set_continuation_token(token.take())
                    .send()
                    .await
                    .map_err(|e| self.request_error("ListObjectsV2", prefix, DisplayErrorContext(&e)))?;

                keys.extend(
                    output
                        .contents()
                        .iter()
                        .filter_map(|object| object.key().map(str::to_string)),
                );

                match output.next_continuation_token() {
                    Some(next) => token = Some(next.to_string()),
                    None => break,
                }
            }

            Ok(keys)
        })
    }
}
