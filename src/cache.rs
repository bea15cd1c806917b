use ahash::AHashMap;
use parking_lot::RwLock;

use crate::graph::GraphEdge;

#[derive(Default)]
struct CachedEdges {
    data_version: Option<i64>,
    by_source: AHashMap<i64, Vec<GraphEdge>>,
}

/// Outgoing edges per source node, in the order the store returned them. Entries
/// are tied to the database `data_version` they were read under.
#[derive(Default)]
pub struct OutgoingEdgeCache {
    inner: RwLock<CachedEdges>,
}

impl OutgoingEdgeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every entry when `data_version` differs from the one the entries were
    /// read under. Returns `true` when entries were discarded.
    pub fn sync_version(&self, data_version: i64) -> bool {
        if self.inner.read().data_version == Some(data_version) {
            return false;
        }
        let mut inner = self.inner.write();
        let stale = !inner.by_source.is_empty();
        inner.by_source.clear();
        inner.data_version = Some(data_version);
        stale
    }

    pub fn get(&self, node: i64) -> Option<Vec<GraphEdge>> {
        self.inner.read().by_source.get(&node).cloned()
    }

    pub fn insert(&self, node: i64, edges: Vec<GraphEdge>) {
        self.inner.write().by_source.insert(node, edges);
    }

    pub fn len(&self) -> usize {
        self.inner.read().by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().by_source.is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().by_source.clear();
    }
}
