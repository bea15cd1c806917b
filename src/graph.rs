mod sqlite_graph;
mod types;

pub use sqlite_graph::SqliteGraph;
pub use types::{GraphEdge, GraphEntity, validate_edge, validate_entity};
