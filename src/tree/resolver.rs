//! Hierarchy Resolver
//!
//! Produces the immediate children of a node from a fresh, non-recursive
//! listing. Nothing is cached between calls, so concurrent expansions of
//! different nodes never interact and every view reflects the current store.

use super::grouping::ChildCollector;
use super::node::{label_for_key, Node, NodeKind};
use crate::codec::{ResourceCodec, ResourceId, SEPARATOR};
use crate::error::ApiError;
use crate::store::{collect_bytes, ByteStream, ObjectStoreClient};
use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, error};

pub struct HierarchyResolver {
    client: Arc<dyn ObjectStoreClient>,
    codec: ResourceCodec,
    default_bucket: Option<String>,
}

impl HierarchyResolver {
    pub fn new(client: Arc<dyn ObjectStoreClient>, codec: ResourceCodec) -> Self {
        Self {
            client,
            codec,
            default_bucket: None,
        }
    }

    /// Root children become the contents of `bucket` instead of the bucket list.
    pub fn with_default_bucket(mut self, bucket: Option<String>) -> Self {
        self.default_bucket = bucket.filter(|b| !b.is_empty());
        self
    }

    pub fn codec(&self) -> &ResourceCodec {
        &self.codec
    }

    pub fn client(&self) -> &Arc<dyn ObjectStoreClient> {
        &self.client
    }

    pub fn default_bucket(&self) -> Option<&str> {
        self.default_bucket.as_deref()
    }

    /// All buckets as `Bucket` nodes, sorted by name.
    pub async fn try_list_buckets(&self) -> Result<Vec<Node>, ApiError> {
        let names = self.client.list_buckets().await?;
        let mut nodes: Vec<Node> = names
            .iter()
            .map(|name| Node::bucket(&self.codec, name))
            .collect();
        nodes.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(nodes)
    }

    /// Like [`try_list_buckets`](Self::try_list_buckets) but a failure is
    /// logged and yields an empty list, so the root stays navigable.
    pub async fn list_buckets(&self) -> Vec<Node> {
        match self.try_list_buckets().await {
            Ok(nodes) => nodes,
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Failed to list buckets");
                Vec::new()
            }
        }
    }

    /// Immediate children of `node`, or of the root when `None`.
    pub async fn get_children(&self, node: Option<&Node>) -> Result<Vec<Node>, ApiError> {
        let (bucket, prefix) = match node {
            None => match &self.default_bucket {
                Some(bucket) => (bucket.clone(), String::new()),
                None => return Ok(self.list_buckets().await),
            },
            Some(node) => self.location_of(node)?,
        };
        self.list_prefix(&bucket, &prefix).await
    }

    /// `(bucket, prefix)` a node expands to. The prefix is empty for buckets
    /// and ends with the separator otherwise.
    pub fn location_of(&self, node: &Node) -> Result<(String, String), ApiError> {
        let (bucket, key) = self.codec.decode(&node.resource_id);
        if bucket.is_empty() {
            return Err(ApiError::InvalidResource(format!(
                "No bucket in identifier '{}'",
                node.resource_id
            )));
        }
        let prefix = match node.kind {
            NodeKind::Bucket => String::new(),
            NodeKind::Folder | NodeKind::File => normalize_prefix(&key),
        };
        Ok((bucket, prefix))
    }

    /// Children directly under `prefix` in `bucket`.
    ///
    /// The listing stream is drained to its end; the first stream error fails
    /// the whole call and no partial result is returned.
    pub async fn list_prefix(&self, bucket: &str, prefix: &str) -> Result<Vec<Node>, ApiError> {
        let prefix = normalize_prefix(prefix);
        let mut stream = self
            .client
            .list_objects(bucket, &prefix, false)
            .await
            .map_err(|e| {
                error!(bucket, prefix = %prefix, error = %e, "Failed to list objects");
                ApiError::from(e)
            })?;

        let mut collector = ChildCollector::new(&self.codec, bucket, &prefix);
        let mut entries = 0usize;
        while let Some(entry) = stream.next().await {
            match entry {
                Ok(entry) => {
                    entries += 1;
                    collector.push(entry);
                }
                Err(e) => {
                    error!(bucket, prefix = %prefix, error = %e, "Listing stream failed");
                    return Err(e.into());
                }
            }
        }
        let children = collector.finish();
        debug!(
            bucket,
            prefix = %prefix,
            entries,
            children = children.len(),
            "Resolved children"
        );
        Ok(children)
    }

    /// Object body of a file node.
    ///
    /// Buckets and folders have no content; asking for it is a caller bug and
    /// fails immediately.
    pub async fn get_content(&self, node: &Node) -> Result<ByteStream, ApiError> {
        if node.kind != NodeKind::File {
            return Err(ApiError::PreconditionFailed(format!(
                "Content requested for {} node '{}'",
                node.kind.as_str(),
                node.label
            )));
        }
        let (bucket, key) = self.codec.decode(&node.resource_id);
        if bucket.is_empty() || key.is_empty() {
            return Err(ApiError::InvalidResource(format!(
                "No object in identifier '{}'",
                node.resource_id
            )));
        }
        Ok(self.client.get_object(&bucket, &key).await?)
    }

    /// Whole object body in memory, for read-only viewing.
    pub async fn read_content(&self, node: &Node) -> Result<Bytes, ApiError> {
        let stream = self.get_content(node).await?;
        Ok(collect_bytes(stream).await?)
    }

    /// Node for an identifier: empty key is a bucket, trailing separator a
    /// folder, anything else a file.
    pub fn node_for(&self, id: &ResourceId) -> Result<Node, ApiError> {
        let (bucket, key) = self.codec.decode(id);
        if bucket.is_empty() {
            return Err(ApiError::InvalidResource(format!(
                "No bucket in identifier '{}'",
                id
            )));
        }
        let node = if key.is_empty() {
            Node::bucket(&self.codec, &bucket)
        } else if key.ends_with(SEPARATOR) {
            Node::folder(&self.codec, &bucket, &key, label_for_key(&key))
        } else {
            Node::file(&self.codec, &bucket, &key, label_for_key(&key))
        };
        Ok(node)
    }

    /// Enclosing folder or bucket; `None` for buckets.
    pub fn get_parent(&self, node: &Node) -> Option<Node> {
        let parent = self.codec.parent_of(&node.resource_id)?;
        self.node_for(&parent).ok()
    }
}

fn normalize_prefix(key: &str) -> String {
    if key.is_empty() || key.ends_with(SEPARATOR) {
        key.to_string()
    } else {
        format!("{}{}", key, SEPARATOR)
    }
}
