//! Weakest-link derivation over a chain of directly connected nodes.
//!
//! For every consecutive pair the engine picks the weakest recognized edge from the
//! first node to the second, then reports a relationship from the first node of the
//! chain to the last, typed with the weakest kind seen across all pairs. Nothing is
//! written back to the store; the result is a plain value.

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{Level, debug, enabled, trace};

use crate::{
    GraphError,
    backend::GraphBackend,
    graph::GraphEdge,
    strength::{RelationshipKind, StrengthTable},
};

/// Transient relationship summarizing a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRelationship {
    pub from_id: i64,
    pub to_id: i64,
    pub kind: RelationshipKind,
}

impl DerivedRelationship {
    /// Edge-shaped view for hosts that present relationships. The edge has id 0 and
    /// is never inserted.
    pub fn to_virtual_edge(&self) -> GraphEdge {
        GraphEdge {
            id: 0,
            from_id: self.from_id,
            to_id: self.to_id,
            edge_type: self.kind.as_str().to_string(),
            data: json!({ "derived": true }),
        }
    }
}

/// Why a chain produced no relationship. These are expected outcomes, not store faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationFailure {
    #[error("insufficient chain length: {provided} node(s) provided, at least 2 required")]
    InsufficientChainLength { provided: usize },
    /// `pair` is the 1-based position `i` of the pair `(nodes[i-1], nodes[i])`.
    #[error("broken chain at pair {pair}: no recognized relationship from {from_id} to {to_id}")]
    BrokenChain { pair: usize, from_id: i64, to_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    Derived(DerivedRelationship),
    Failed(DerivationFailure),
}

impl Derivation {
    pub fn is_derived(&self) -> bool {
        matches!(self, Derivation::Derived(_))
    }

    pub fn relationship(&self) -> Option<&DerivedRelationship> {
        match self {
            Derivation::Derived(rel) => Some(rel),
            Derivation::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&DerivationFailure> {
        match self {
            Derivation::Derived(_) => None,
            Derivation::Failed(failure) => Some(failure),
        }
    }

    pub fn into_relationship(self) -> Option<DerivedRelationship> {
        match self {
            Derivation::Derived(rel) => Some(rel),
            Derivation::Failed(_) => None,
        }
    }
}

/// A stored edge together with its strength rank.
#[derive(Debug, Clone, PartialEq)]
pub struct WeakestEdge {
    pub edge: GraphEdge,
    pub rank: u8,
}

impl WeakestEdge {
    pub fn kind(&self) -> RelationshipKind {
        RelationshipKind::parse(&self.edge.edge_type)
    }
}

pub struct ChainDeriver<'a, B: ?Sized> {
    backend: &'a B,
    table: &'a StrengthTable,
}

impl<'a, B> ChainDeriver<'a, B>
where
    B: GraphBackend + ?Sized,
{
    pub fn new(backend: &'a B, table: &'a StrengthTable) -> Self {
        Self { backend, table }
    }

    pub fn table(&self) -> &StrengthTable {
        self.table
    }

    /// Weakest recognized edge from `source` to `target`, first encountered on ties.
    /// Edges of unrecognized types and edges to other nodes are skipped.
    pub fn weakest_edge_to(
        &self,
        source: i64,
        target: i64,
    ) -> Result<Option<WeakestEdge>, GraphError> {
        let weakest = select_weakest(self.table, target, self.backend.outgoing_edges(source)?);
        if let Some(found) = weakest.as_ref() {
            trace!(
                source,
                target,
                edge_id = found.edge.id,
                edge_type = %found.edge.edge_type,
                rank = found.rank,
                "selected weakest edge"
            );
        }
        Ok(weakest)
    }

    /// Derives the relationship for `nodes`. Store faults come back as `Err`; a chain
    /// that cannot be derived comes back as [`Derivation::Failed`].
    pub fn derive(&self, nodes: &[i64]) -> Result<Derivation, GraphError> {
        let mut weakest: Option<WeakestEdge> = None;
        for (index, pair) in nodes.windows(2).enumerate() {
            let (from_id, to_id) = (pair[0], pair[1]);
            let Some(candidate) = self.weakest_edge_to(from_id, to_id)? else {
                let pair = index + 1;
                debug!(
                    pair,
                    from_id, to_id, "chain has no recognized relationship for pair"
                );
                return Ok(Derivation::Failed(DerivationFailure::BrokenChain {
                    pair,
                    from_id,
                    to_id,
                }));
            };
            if weakest
                .as_ref()
                .is_none_or(|current| candidate.rank < current.rank)
            {
                weakest = Some(candidate);
            }
        }

        let (Some(weakest), Some(&from_id), Some(&to_id)) = (weakest, nodes.first(), nodes.last())
        else {
            debug!(
                provided = nodes.len(),
                "cannot derive a relationship for fewer than 2 nodes"
            );
            return Ok(Derivation::Failed(
                DerivationFailure::InsufficientChainLength {
                    provided: nodes.len(),
                },
            ));
        };
        let relationship = DerivedRelationship {
            from_id,
            to_id,
            kind: weakest.kind(),
        };
        if enabled!(Level::DEBUG) {
            debug!(
                from = %self.describe_node(from_id),
                kind = %relationship.kind,
                to = %self.describe_node(to_id),
                "derived relationship"
            );
        }
        Ok(Derivation::Derived(relationship))
    }

    /// [`ChainDeriver::derive`] with failures collapsed to `None`.
    pub fn derive_relationship(
        &self,
        nodes: &[i64],
    ) -> Result<Option<DerivedRelationship>, GraphError> {
        Ok(self.derive(nodes)?.into_relationship())
    }

    /// `name:kind#id` for log lines. Lookup faults fall back to the bare `#id`.
    fn describe_node(&self, id: i64) -> String {
        match self.backend.get_node(id) {
            Ok(Some(entity)) => format!("{}:{}#{id}", entity.name, entity.kind),
            _ => format!("#{id}"),
        }
    }
}

/// Scans `edges` in order for the weakest recognized edge ending at `target`. Stops
/// as soon as an edge at the table's weakest rank is recorded.
fn select_weakest<I>(table: &StrengthTable, target: i64, edges: I) -> Option<WeakestEdge>
where
    I: IntoIterator<Item = GraphEdge>,
{
    let floor = table.weakest_rank();
    let mut weakest: Option<WeakestEdge> = None;
    for edge in edges {
        if edge.to_id != target {
            continue;
        }
        let Some(rank) = table.rank_of_type(&edge.edge_type) else {
            continue;
        };
        if weakest.as_ref().is_none_or(|current| rank < current.rank) {
            weakest = Some(WeakestEdge { edge, rank });
        }
        if weakest.as_ref().map(|current| current.rank) == floor {
            break;
        }
    }
    weakest
}

#[cfg(feature = "sqlite-backend")]
impl crate::backend::SqliteGraphBackend {
    pub fn deriver<'a>(&'a self, table: &'a StrengthTable) -> ChainDeriver<'a, Self> {
        ChainDeriver::new(self, table)
    }
}
