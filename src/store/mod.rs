//! Object Store Client
//!
//! The five primitives the hierarchy and transfer layers need from an
//! S3-compatible store. Implementations are passed in explicitly; nothing in the
//! crate holds a process-wide client.

pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

pub use memory::{MemoryObjectStore, StoreOp};
#[cfg(feature = "s3")]
pub use self::s3::S3ObjectStore;

use crate::error::StoreError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

/// One entry of an object listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    /// An object with its full key.
    Object { key: String },
    /// A common-prefix (folder marker) returned by a delimited listing.
    CommonPrefix { prefix: String },
}

/// Streamed listing; ends at the first error.
pub type ListingStream = BoxStream<'static, Result<ListEntry, StoreError>>;

/// Streamed object body.
pub type ByteStream = BoxStream<'static, Result<Bytes, StoreError>>;

/// Wrap an in-memory body as a single-chunk stream.
pub fn byte_stream_from(bytes: Bytes) -> ByteStream {
    stream::once(async move { Ok(bytes) }).boxed()
}

/// Drain a byte stream into one buffer.
pub async fn collect_bytes(stream: ByteStream) -> Result<Bytes, StoreError> {
    let chunks: Vec<Bytes> = stream.try_collect().await?;
    if chunks.len() == 1 {
        return Ok(chunks.into_iter().next().unwrap_or_default());
    }
    let mut buf = Vec::with_capacity(chunks.iter().map(Bytes::len).sum());
    for chunk in chunks {
        buf.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(buf))
}

#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<String>, StoreError>;

    /// List keys under `prefix`. A non-recursive listing groups everything
    /// below the next `/` into [`ListEntry::CommonPrefix`] entries.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
    ) -> Result<ListingStream, StoreError>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream, StoreError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        content_type: &str,
    ) -> Result<(), StoreError>;

    async fn remove_object(&self, bucket: &str, key: &str) -> Result<(), StoreError>;
}
