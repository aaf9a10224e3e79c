//! Bucketview: Object Store Browser
//!
//! Presents the flat key space of an S3-compatible object store as a virtual
//! directory tree of buckets, folders and files, with uploads, downloads,
//! deletions and public links on top.

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod tooling;
pub mod transfer;
pub mod tree;

pub use codec::{Endpoint, ResourceCodec, ResourceId};
pub use error::{ApiError, StoreError};
pub use store::{ListEntry, MemoryObjectStore, ObjectStoreClient};
pub use transfer::{BatchReport, TransferService};
pub use tree::{HierarchyResolver, Node, NodeKind};
