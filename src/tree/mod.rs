//! Virtual Directory Tree
//!
//! Nodes, grouping of flat listings into immediate children, and the resolver
//! that drives both against an object store.

pub mod grouping;
pub mod node;
pub mod resolver;

pub use grouping::{group_listing, ChildCollector};
pub use node::{display_order, label_for_key, Node, NodeKind};
pub use resolver::HierarchyResolver;
