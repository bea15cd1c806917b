//! Weakest-link ArchiMate relationship derivation over a SQLite-backed graph.
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod backend;
pub mod bench_utils;
pub mod cache;
pub mod cli;
pub mod client;
pub mod derive;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod schema;
pub mod strength;

#[cfg(feature = "sqlite-backend")]
pub use crate::backend::SqliteGraphBackend;
pub use crate::backend::{EdgeSpec, GraphBackend, NodeSpec};
pub use crate::client::BackendClient;
pub use crate::derive::{
    ChainDeriver, Derivation, DerivationFailure, DerivedRelationship, WeakestEdge,
};
pub use crate::errors::GraphError;
pub use crate::graph::{GraphEdge, GraphEntity, SqliteGraph};
pub use crate::strength::{RelationshipKind, StrengthTable};
