//! Tree node types

use crate::codec::{ResourceCodec, ResourceId, SEPARATOR};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Node kind. Buckets and folders expand; files are leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Bucket,
    Folder,
    File,
}

impl NodeKind {
    pub fn is_expandable(self) -> bool {
        !matches!(self, NodeKind::File)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Bucket => "bucket",
            NodeKind::Folder => "folder",
            NodeKind::File => "file",
        }
    }

    fn rank(self) -> u8 {
        match self {
            NodeKind::Bucket | NodeKind::Folder => 0,
            NodeKind::File => 1,
        }
    }
}

/// Virtual tree node.
///
/// Equality and hashing use `resource_id` only: two listings of the same
/// parent produce distinct but equal nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub resource_id: ResourceId,
    pub label: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn bucket(codec: &ResourceCodec, name: &str) -> Self {
        Self {
            resource_id: codec.encode_bucket(name),
            label: name.to_string(),
            kind: NodeKind::Bucket,
        }
    }

    /// Folder node for `prefix` (normalized to end with the separator).
    pub fn folder(codec: &ResourceCodec, bucket: &str, prefix: &str, label: &str) -> Self {
        Self {
            resource_id: codec.encode_folder(bucket, prefix),
            label: label.to_string(),
            kind: NodeKind::Folder,
        }
    }

    pub fn file(codec: &ResourceCodec, bucket: &str, key: &str, label: &str) -> Self {
        debug_assert!(!key.ends_with(SEPARATOR), "file keys never end with the separator");
        Self {
            resource_id: codec.encode(bucket, key),
            label: label.to_string(),
            kind: NodeKind::File,
        }
    }

    pub fn is_expandable(&self) -> bool {
        self.kind.is_expandable()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.resource_id == other.resource_id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource_id.hash(state);
    }
}

/// Display order: containers before files, then label, then identifier.
pub fn display_order(a: &Node, b: &Node) -> Ordering {
    a.kind
        .rank()
        .cmp(&b.kind.rank())
        .then_with(|| a.label.cmp(&b.label))
        .then_with(|| a.resource_id.cmp(&b.resource_id))
}

/// Last non-empty segment of a key.
pub fn label_for_key(key: &str) -> &str {
    key.rsplit(SEPARATOR).find(|s| !s.is_empty()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> ResourceCodec {
        ResourceCodec::new("s3", "localhost:9000")
    }

    #[test]
    fn test_equality_follows_resource_id() {
        let c = codec();
        let a = Node::folder(&c, "docs", "img/", "img");
        let mut b = a.clone();
        b.label = "renamed".to_string();
        assert_eq!(a, b);
        assert_ne!(a, Node::file(&c, "docs", "img", "img"));
    }

    #[test]
    fn test_folders_sort_before_files() {
        let c = codec();
        let mut nodes = vec![
            Node::file(&c, "d", "b", "b"),
            Node::folder(&c, "d", "c/", "c"),
            Node::folder(&c, "d", "a/", "a"),
        ];
        nodes.sort_by(display_order);
        let labels: Vec<_> = nodes.iter().map(|n| (n.label.as_str(), n.kind)).collect();
        assert_eq!(
            labels,
            vec![
                ("a", NodeKind::Folder),
                ("c", NodeKind::Folder),
                ("b", NodeKind::File)
            ]
        );
    }

    #[test]
    fn test_labels_skip_trailing_separator() {
        assert_eq!(label_for_key("img/icons/"), "icons");
        assert_eq!(label_for_key("img/logo.png"), "logo.png");
        assert_eq!(label_for_key(""), "");
    }
}
