//! In-memory object store.
//!
//! Follows S3 listing semantics closely enough to exercise the hierarchy logic
//! offline: delimited listings fold deeper keys into common prefixes, and a
//! folder marker object (`photos/`) is returned as a plain object. Failures can
//! be injected per operation and target.

use super::{ByteStream, ListEntry, ListingStream, ObjectStoreClient};
use crate::error::StoreError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Operation kinds that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListBuckets,
    List,
    Get,
    Put,
    Remove,
}

#[derive(Debug, Clone)]
struct StoredObject {
    body: Bytes,
    content_type: String,
}

type Bucket = BTreeMap<String, StoredObject>;

#[derive(Default)]
pub struct MemoryObjectStore {
    buckets: RwLock<BTreeMap<String, Bucket>>,
    /// (op, bucket, key or prefix) -> message
    failures: RwLock<HashMap<(StoreOp, String, String), String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_bucket(&self, bucket: &str) {
        self.buckets.write().entry(bucket.to_string()).or_default();
    }

    /// Insert an object, creating the bucket when needed.
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        self.insert_with_type(bucket, key, body, "application/octet-stream");
    }

    pub fn insert_with_type(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Bytes>,
        content_type: &str,
    ) {
        self.buckets
            .write()
            .entry(bucket.to_string())
            .or_default()
            .insert(
                key.to_string(),
                StoredObject {
                    body: body.into(),
                    content_type: content_type.to_string(),
                },
            );
    }

    /// Make `op` fail for `(bucket, target)`. For listings `target` is the
    /// prefix; for bucket listing both are ignored.
    pub fn fail_on(&self, op: StoreOp, bucket: &str, target: &str, message: &str) {
        let (bucket, target) = match op {
            StoreOp::ListBuckets => (String::new(), String::new()),
            _ => (bucket.to_string(), target.to_string()),
        };
        self.failures
            .write()
            .insert((op, bucket, target), message.to_string());
    }

    pub fn clear_failures(&self) {
        self.failures.write().clear();
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.buckets
            .read()
            .get(bucket)
            .map(|b| b.contains_key(key))
            .unwrap_or(false)
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.buckets
            .read()
            .get(bucket)
            .and_then(|b| b.get(key))
            .map(|o| o.body.clone())
    }

    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.buckets
            .read()
            .get(bucket)
            .and_then(|b| b.get(key))
            .map(|o| o.content_type.clone())
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.buckets
            .read()
            .get(bucket)
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn injected(&self, op: StoreOp, bucket: &str, target: &str) -> Option<StoreError> {
        let key = match op {
            StoreOp::ListBuckets => (op, String::new(), String::new()),
            _ => (op, bucket.to_string(), target.to_string()),
        };
        self.failures
            .read()
            .get(&key)
            .map(|message| StoreError::Other(message.clone()))
    }

    fn no_such_bucket(bucket: &str) -> StoreError {
        StoreError::NotFound(format!("NoSuchBucket: {}", bucket))
    }
}

/// Entries directly under `prefix`, S3 style.
fn delimited_listing(objects: &Bucket, prefix: &str) -> Vec<ListEntry> {
    let mut entries = Vec::new();
    let mut last_prefix: Option<String> = None;
    for key in objects.keys().filter(|k| k.starts_with(prefix)) {
        let rest = &key[prefix.len()..];
        match rest.find('/') {
            Some(idx) => {
                let common = format!("{}{}", prefix, &rest[..=idx]);
                if last_prefix.as_deref() != Some(common.as_str()) {
                    entries.push(ListEntry::CommonPrefix {
                        prefix: common.clone(),
                    });
                    last_prefix = Some(common);
                }
            }
            _ => entries.push(ListEntry::Object { key: key.clone() }),
        }
    }
    entries
}

#[async_trait]
impl ObjectStoreClient for MemoryObjectStore {
    async fn list_buckets(&self) -> Result<Vec<String>, StoreError> {
        if let Some(err) = self.injected(StoreOp::ListBuckets, "", "") {
            return Err(err);
        }
        Ok(self.buckets.read().keys().cloned().collect())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
    ) -> Result<ListingStream, StoreError> {
        let entries = {
            let buckets = self.buckets.read();
            let objects = buckets
                .get(bucket)
                .ok_or_else(|| Self::no_such_bucket(bucket))?;
            if recursive {
                objects
                    .keys()
                    .filter(|k| k.starts_with(prefix))
                    .map(|k| ListEntry::Object { key: k.clone() })
                    .collect()
            } else {
                delimited_listing(objects, prefix)
            }
        };

        let mut items: Vec<Result<ListEntry, StoreError>> = entries.into_iter().map(Ok).collect();
        // Injected listing failures surface after the entries, as a stream
        // that breaks mid-way would.
        if let Some(err) = self.injected(StoreOp::List, bucket, prefix) {
            items.push(Err(err));
        }
        Ok(stream::iter(items).boxed())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream, StoreError> {
        if let Some(err) = self.injected(StoreOp::Get, bucket, key) {
            return Err(err);
        }
        let body = {
            let buckets = self.buckets.read();
            let objects = buckets
                .get(bucket)
                .ok_or_else(|| Self::no_such_bucket(bucket))?;
            objects
                .get(key)
                .map(|o| o.body.clone())
                .ok_or_else(|| StoreError::NotFound(format!("NoSuchKey: {}/{}", bucket, key)))?
        };
        Ok(super::byte_stream_from(body))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        content_type: &str,
    ) -> Result<(), StoreError> {
        if let Some(err) = self.injected(StoreOp::Put, bucket, key) {
            return Err(err);
        }
        if !self.buckets.read().contains_key(bucket) {
            return Err(Self::no_such_bucket(bucket));
        }
        let chunks: Vec<Bytes> = body.try_collect().await?;
        let body: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        self.insert_with_type(bucket, key, body, content_type);
        Ok(())
    }

    async fn remove_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        if let Some(err) = self.injected(StoreOp::Remove, bucket, key) {
            return Err(err);
        }
        let mut buckets = self.buckets.write();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| Self::no_such_bucket(bucket))?;
        // Removing a missing key succeeds, as on S3.
        objects.remove(key);
        Ok(())
    }
}
