//! Grouping of listing entries into immediate children.
//!
//! Works for delimited listings (common prefixes plus direct objects) and for
//! recursive ones, where deeper keys are folded into their first segment.

use super::node::{display_order, Node};
use crate::codec::{ResourceCodec, SEPARATOR};
use crate::store::ListEntry;
use std::collections::HashSet;
use tracing::debug;

/// Collects the children of one `(bucket, prefix)` listing.
///
/// The seen-sets live only as long as the collector, i.e. one call.
pub struct ChildCollector<'a> {
    codec: &'a ResourceCodec,
    bucket: &'a str,
    prefix: &'a str,
    seen_folders: HashSet<String>,
    seen_files: HashSet<String>,
    children: Vec<Node>,
}

impl<'a> ChildCollector<'a> {
    /// `prefix` is either empty or ends with the separator.
    pub fn new(codec: &'a ResourceCodec, bucket: &'a str, prefix: &'a str) -> Self {
        Self {
            codec,
            bucket,
            prefix,
            seen_folders: HashSet::new(),
            seen_files: HashSet::new(),
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ListEntry) {
        match entry {
            ListEntry::CommonPrefix { prefix } => self.push_common_prefix(&prefix),
            ListEntry::Object { key } => self.push_object(&key),
        }
    }

    fn push_common_prefix(&mut self, full: &str) {
        let Some(relative) = full.strip_prefix(self.prefix) else {
            debug!(prefix = full, query = self.prefix, "common prefix outside query, skipped");
            return;
        };
        if let Some(name) = relative.split(SEPARATOR).find(|s| !s.is_empty()) {
            let name = name.to_string();
            self.add_folder(name);
        }
    }

    fn push_object(&mut self, key: &str) {
        let Some(relative) = key.strip_prefix(self.prefix) else {
            debug!(key, query = self.prefix, "object outside query, skipped");
            return;
        };
        // The prefix's own marker object.
        if relative.is_empty() {
            return;
        }
        match relative.split_once(SEPARATOR) {
            None => {
                if self.seen_files.insert(relative.to_string()) {
                    self.children
                        .push(Node::file(self.codec, self.bucket, key, relative));
                }
            }
            Some((first, _)) if !first.is_empty() => {
                let name = first.to_string();
                self.add_folder(name);
            }
            Some(_) => {
                debug!(key, "object with empty leading segment, skipped");
            }
        }
    }

    fn add_folder(&mut self, name: String) {
        if self.seen_folders.contains(&name) {
            return;
        }
        let folder_prefix = format!("{}{}{}", self.prefix, name, SEPARATOR);
        self.children
            .push(Node::folder(self.codec, self.bucket, &folder_prefix, &name));
        self.seen_folders.insert(name);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in display order.
    pub fn finish(mut self) -> Vec<Node> {
        self.children.sort_by(display_order);
        self.children
    }
}

/// Group already-fetched entries into the sorted immediate children.
pub fn group_listing<I>(codec: &ResourceCodec, bucket: &str, prefix: &str, entries: I) -> Vec<Node>
where
    I: IntoIterator<Item = ListEntry>,
{
    let mut collector = ChildCollector::new(codec, bucket, prefix);
    for entry in entries {
        collector.push(entry);
    }
    collector.finish()
}
