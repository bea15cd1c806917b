//! Backend trait bridging the derivation engine with a graph store. The engine only
//! calls [`GraphBackend::outgoing_edges`]; the remaining methods let hosts populate
//! and inspect a graph through the same surface. The `sqlite-backend` Cargo feature
//! (enabled by default) keeps the SQLite adapter compiled in.

use serde_json::Value;

use crate::{
    GraphError,
    graph::{GraphEdge, GraphEntity, SqliteGraph},
};

#[derive(Clone, Debug)]
pub struct NodeSpec {
    pub kind: String,
    pub name: String,
    pub data: Value,
}

#[derive(Clone, Debug)]
pub struct EdgeSpec {
    pub from: i64,
    pub to: i64,
    pub edge_type: String,
    pub data: Value,
}

pub trait GraphBackend {
    fn insert_node(&self, node: NodeSpec) -> Result<i64, GraphError>;
    fn insert_edge(&self, edge: EdgeSpec) -> Result<i64, GraphError>;
    /// Returns `None` when the id is not stored.
    fn get_node(&self, node: i64) -> Result<Option<GraphEntity>, GraphError>;
    fn entity_ids(&self) -> Result<Vec<i64>, GraphError>;
    /// Outgoing edges of `node`. The order is the tie-break order for derivation
    /// and must stay stable while a derivation is running.
    fn outgoing_edges(&self, node: i64) -> Result<Vec<GraphEdge>, GraphError>;
}

#[cfg(feature = "sqlite-backend")]
pub struct SqliteGraphBackend {
    graph: SqliteGraph,
}

#[cfg(feature = "sqlite-backend")]
impl SqliteGraphBackend {
    pub fn in_memory() -> Result<Self, GraphError> {
        Ok(Self {
            graph: SqliteGraph::open_in_memory()?,
        })
    }

    pub fn from_graph(graph: SqliteGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &SqliteGraph {
        &self.graph
    }
}

#[cfg(feature = "sqlite-backend")]
impl GraphBackend for SqliteGraphBackend {
    fn insert_node(&self, node: NodeSpec) -> Result<i64, GraphError> {
        self.graph.insert_entity(&GraphEntity {
            id: 0,
            kind: node.kind,
            name: node.name,
            data: node.data,
        })
    }

    fn insert_edge(&self, edge: EdgeSpec) -> Result<i64, GraphError> {
        self.graph.insert_edge(&GraphEdge {
            id: 0,
            from_id: edge.from,
            to_id: edge.to,
            edge_type: edge.edge_type,
            data: edge.data,
        })
    }

    fn get_node(&self, node: i64) -> Result<Option<GraphEntity>, GraphError> {
        match self.graph.get_entity(node) {
            Ok(entity) => Ok(Some(entity)),
            Err(GraphError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn entity_ids(&self) -> Result<Vec<i64>, GraphError> {
        self.graph.list_entity_ids()
    }

    fn outgoing_edges(&self, node: i64) -> Result<Vec<GraphEdge>, GraphError> {
        self.graph.outgoing_edges(node)
    }
}

impl<'a, B> GraphBackend for &'a B
where
    B: GraphBackend + ?Sized,
{
    fn insert_node(&self, node: NodeSpec) -> Result<i64, GraphError> {
        (*self).insert_node(node)
    }

    fn insert_edge(&self, edge: EdgeSpec) -> Result<i64, GraphError> {
        (*self).insert_edge(edge)
    }

    fn get_node(&self, node: i64) -> Result<Option<GraphEntity>, GraphError> {
        (*self).get_node(node)
    }

    fn entity_ids(&self) -> Result<Vec<i64>, GraphError> {
        (*self).entity_ids()
    }

    fn outgoing_edges(&self, node: i64) -> Result<Vec<GraphEdge>, GraphError> {
        (*self).outgoing_edges(node)
    }
}
