//! Transfers: upload, download, delete and links, single and batched.

pub mod batch;

pub use batch::{run_batch, BatchFailure, BatchReport, DEFAULT_BATCH_CONCURRENCY};

use crate::codec::{public_link, Endpoint, ResourceCodec, ResourceId, SEPARATOR};
use crate::error::{ApiError, StoreError};
use crate::store::ObjectStoreClient;
use crate::tree::node::label_for_key;
use futures::{StreamExt, TryStreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Object key for an uploaded file: `<sub_directory>/<file_name>` with the
/// sub-directory trimmed of separators, or just the file name.
pub fn upload_key(sub_directory: &str, file_name: &str) -> String {
    let dir = sub_directory.trim_matches(SEPARATOR);
    if dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{}{}{}", dir, SEPARATOR, file_name)
    }
}

/// Content type guessed from the file extension.
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub struct TransferService {
    client: Arc<dyn ObjectStoreClient>,
    endpoint: Endpoint,
    codec: ResourceCodec,
    concurrency: usize,
}

impl TransferService {
    pub fn new(client: Arc<dyn ObjectStoreClient>, endpoint: Endpoint, codec: ResourceCodec) -> Self {
        Self {
            client,
            endpoint,
            codec,
            concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Decoded `(bucket, key)` of an object identifier. Buckets and folders
    /// are rejected.
    pub fn object_location(&self, id: &ResourceId) -> Result<(String, String), ApiError> {
        let (bucket, key) = self.codec.decode(id);
        if bucket.is_empty() {
            return Err(ApiError::InvalidResource(format!(
                "No bucket in identifier '{}'",
                id
            )));
        }
        if key.is_empty() || key.ends_with(SEPARATOR) {
            return Err(ApiError::PreconditionFailed(format!(
                "'{}' is not an object",
                id
            )));
        }
        Ok((bucket, key))
    }

    /// Public link of the object behind `id`.
    pub fn copy_link(&self, id: &ResourceId) -> Result<String, ApiError> {
        let (bucket, key) = self.object_location(id)?;
        Ok(public_link(&self.endpoint, &bucket, &key))
    }

    pub async fn upload_file(
        &self,
        local: &Path,
        bucket: &str,
        sub_directory: &str,
    ) -> Result<UploadOutcome, ApiError> {
        if bucket.is_empty() {
            return Err(ApiError::ConfigError(
                "No bucket configured for uploads".to_string(),
            ));
        }
        let file_name = local
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ApiError::InvalidResource(format!("No file name in '{}'", local.display()))
            })?;
        let key = upload_key(sub_directory, file_name);
        let content_type = content_type_for(local);

        let file = tokio::fs::File::open(local).await?;
        let body = ReaderStream::new(file).map_err(StoreError::from).boxed();
        self.client
            .put_object(bucket, &key, body, &content_type)
            .await?;

        let link = public_link(&self.endpoint, bucket, &key);
        info!(bucket, key = %key, content_type = %content_type, "Uploaded file");
        Ok(UploadOutcome {
            bucket: bucket.to_string(),
            key,
            content_type,
            link,
        })
    }

    /// Stream an object to `destination`. An existing directory receives the
    /// key's base name. A partially written file is removed on failure.
    pub async fn download_object(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<DownloadOutcome, ApiError> {
        let is_dir = tokio::fs::metadata(destination)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        let path = if is_dir {
            destination.join(label_for_key(key))
        } else {
            destination.to_path_buf()
        };
        let mut stream = self.client.get_object(bucket, key).await?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(&path).await?;
        let mut written = 0u64;
        let copied: Result<(), ApiError> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<(), ApiError>(())
        }
        .await;

        if let Err(e) = copied {
            drop(file);
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove partial download");
            }
            return Err(e);
        }
        info!(bucket, key, path = %path.display(), bytes = written, "Downloaded object");
        Ok(DownloadOutcome {
            path,
            bytes: written,
        })
    }

    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ApiError> {
        self.client.remove_object(bucket, key).await?;
        info!(bucket, key, "Deleted object");
        Ok(())
    }

    pub async fn delete_many(&self, ids: Vec<ResourceId>) -> BatchReport {
        debug!(count = ids.len(), "Deleting objects");
        run_batch("delete", ids, self.concurrency, |id| async move {
            let (bucket, key) = self.object_location(&id)?;
            self.delete_object(&bucket, &key).await
        })
        .await
    }

    /// Download each object into `directory` under its base name.
    ///
    /// Targets whose base names collide would write the same local file, so
    /// all of them fail with `PreconditionFailed` and none is downloaded.
    pub async fn download_many(&self, ids: Vec<ResourceId>, directory: &Path) -> BatchReport {
        let mut name_counts: HashMap<String, usize> = HashMap::new();
        for id in &ids {
            if let Ok((_, key)) = self.object_location(id) {
                *name_counts
                    .entry(label_for_key(&key).to_string())
                    .or_default() += 1;
            }
        }
        let name_counts = &name_counts;

        run_batch("download", ids, self.concurrency, |id| async move {
            let (bucket, key) = self.object_location(&id)?;
            let name = label_for_key(&key);
            if name_counts.get(name).copied().unwrap_or(0) > 1 {
                return Err(ApiError::PreconditionFailed(format!(
                    "'{}' shares the local file name '{}' with another target",
                    id, name
                )));
            }
            let target = directory.join(name);
            self.download_object(&bucket, &key, &target).await.map(|_| ())
        })
        .await
    }

    pub async fn upload_many(
        &self,
        files: Vec<PathBuf>,
        bucket: &str,
        sub_directory: &str,
    ) -> BatchReport {
        let targets: Vec<DisplayPath> = files.into_iter().map(DisplayPath).collect();
        run_batch("upload", targets, self.concurrency, |file| async move {
            self.upload_file(&file.0, bucket, sub_directory)
                .await
                .map(|_| ())
        })
        .await
    }
}

/// `PathBuf` has no `Display`; batch targets need one.
struct DisplayPath(PathBuf);

impl std::fmt::Display for DisplayPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
