//! rust-s3 backed store client.
//!
//! One `Bucket` handle is built per call from the shared region and
//! credentials; path-style addressing is used since most self-hosted
//! S3-compatible servers expect it.

use super::{ByteStream, ListEntry, ListingStream, ObjectStoreClient};
use crate::codec::Endpoint;
use crate::error::StoreError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use ::s3::bucket::Bucket;
use ::s3::creds::Credentials;
use ::s3::error::S3Error;
use ::s3::Region;
use tracing::debug;

pub struct S3ObjectStore {
    region: Region,
    credentials: Credentials,
}

impl S3ObjectStore {
    pub fn new(
        endpoint: &Endpoint,
        region: &str,
        access_key: &str,
        secret_key: &str,
    ) -> Result<Self, StoreError> {
        let credentials = Credentials::new(Some(access_key), Some(secret_key), None, None, None)
            .map_err(|e| StoreError::PermissionDenied(format!("Invalid credentials: {}", e)))?;
        let region = Region::Custom {
            region: region.to_string(),
            endpoint: endpoint.base_url(),
        };
        Ok(Self {
            region,
            credentials,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StoreError> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(map_s3_error)?;
        Ok(bucket.with_path_style())
    }
}

fn map_s3_error(err: S3Error) -> StoreError {
    match err {
        S3Error::HttpFailWithBody(code, body) => map_status(code, body),
        other => StoreError::Network(other.to_string()),
    }
}

fn map_status(code: u16, body: String) -> StoreError {
    let message = format!("HTTP {}: {}", code, body);
    match code {
        404 => StoreError::NotFound(message),
        401 | 403 => StoreError::PermissionDenied(message),
        _ => StoreError::Other(message),
    }
}

fn check_status(code: u16, body: &[u8]) -> Result<(), StoreError> {
    if (200..300).contains(&code) {
        Ok(())
    } else {
        Err(map_status(code, String::from_utf8_lossy(body).into_owned()))
    }
}

#[async_trait]
impl ObjectStoreClient for S3ObjectStore {
    async fn list_buckets(&self) -> Result<Vec<String>, StoreError> {
        let response = Bucket::list_buckets(self.region.clone(), self.credentials.clone())
            .await
            .map_err(map_s3_error)?;
        Ok(response.bucket_names().collect())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        recursive: bool,
    ) -> Result<ListingStream, StoreError> {
        let handle = self.bucket(bucket)?;
        let delimiter = if recursive { None } else { Some("/".to_string()) };
        let pages = handle
            .list(prefix.to_string(), delimiter)
            .await
            .map_err(map_s3_error)?;

        let mut entries = Vec::new();
        for page in pages {
            for common in page.common_prefixes.unwrap_or_default() {
                entries.push(Ok(ListEntry::CommonPrefix {
                    prefix: common.prefix,
                }));
            }
            for object in page.contents {
                entries.push(Ok(ListEntry::Object { key: object.key }));
            }
        }
        debug!(bucket, prefix, count = entries.len(), "s3 listing fetched");
        Ok(stream::iter(entries).boxed())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream, StoreError> {
        let handle = self.bucket(bucket)?;
        let response = handle.get_object(key).await.map_err(map_s3_error)?;
        check_status(response.status_code(), response.as_slice())?;
        let body = Bytes::copy_from_slice(response.as_slice());
        Ok(super::byte_stream_from(body))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: ByteStream,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let handle = self.bucket(bucket)?;
        let chunks: Vec<Bytes> = body.try_collect().await?;
        let content: Vec<u8> = chunks.concat();
        let response = handle
            .put_object_with_content_type(key, &content, content_type)
            .await
            .map_err(map_s3_error)?;
        check_status(response.status_code(), response.as_slice())
    }

    async fn remove_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let handle = self.bucket(bucket)?;
        let response = handle.delete_object(key).await.map_err(map_s3_error)?;
        check_status(response.status_code(), response.as_slice())
    }
}
