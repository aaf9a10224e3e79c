use bucketview::{HierarchyResolver, MemoryObjectStore, Node, NodeKind, ResourceCodec};
use std::sync::Arc;

pub const AUTHORITY: &str = "localhost:9000";

pub fn codec() -> ResourceCodec {
    ResourceCodec::new("s3", AUTHORITY)
}

pub fn store_with(objects: &[(&str, &str)]) -> Arc<MemoryObjectStore> {
    let store = Arc::new(MemoryObjectStore::new());
    for (bucket, key) in objects {
        store.insert(bucket, key, format!("body of {}", key));
    }
    store
}

pub fn resolver(store: Arc<MemoryObjectStore>) -> HierarchyResolver {
    HierarchyResolver::new(store, codec())
}

pub fn summary(nodes: &[Node]) -> Vec<(String, NodeKind)> {
    nodes.iter().map(|n| (n.label.clone(), n.kind)).collect()
}
