//! In-memory doubles for the metadata service and the secrets bucket.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hostdata::error::{MetadataError, Result, StorageError};
use hostdata::{MetadataTransport, ObjectStore};

/// Identity document for account 12345 in us-east-1.
pub const IDENTITY_DOCUMENT: &str = r#"{
    "accountId": "12345",
    "availabilityZone": "us-east-1a",
    "instanceId": "i-0123456789abcdef0",
    "region": "us-east-1"
}"#;

/// Metadata service that serves a replaceable document.
pub struct FakeMetadata {
    document: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl FakeMetadata {
    pub fn serving(document: &str) -> Arc<Self> {
        Arc::new(Self {
            document: Mutex::new(Some(document.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            document: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_document(&self, document: &str) {
        *self.document.lock().unwrap() = Some(document.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetadataTransport for FakeMetadata {
    fn get(&self, _path: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.document
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| MetadataError::Fetch("connection refused".to_string()).into())
    }
}

/// Secrets bucket held in memory.
#[derive(Default)]
pub struct FakeS3Client {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl FakeS3Client {
    pub fn with(objects: &[(&str, &str)]) -> Arc<Self> {
        let client = Self::default();
        for (key, body) in objects {
            client
                .put_object(key, body.as_bytes().to_vec())
                .expect("put into fake bucket");
        }
        Arc::new(client)
    }
}

impl ObjectStore for FakeS3Client {
    fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| {
                StorageError::Request {
                    op: "GetObject",
                    bucket: "fake".to_string(),
                    key: key.to_string(),
                    reason: "NoSuchKey".to_string(),
                }
                .into()
            })
    }

    fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    fn list_objects(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Subscriber that records nothing; only its type identifies it.
pub struct MarkerLogger;

impl MarkerLogger {
    pub fn dispatch() -> tracing::Dispatch {
        tracing::Dispatch::new(MarkerLogger)
    }
}

impl tracing::Subscriber for MarkerLogger {
    fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
        false
    }

    fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        tracing::span::Id::from_u64(1)
    }

    fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}

    fn event(&self, _: &tracing::Event<'_>) {}

    fn enter(&self, _: &tracing::span::Id) {}

    fn exit(&self, _: &tracing::span::Id) {}
}
