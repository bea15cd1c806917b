//! Seeded chain generators shared by benches and tests.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::json;

use crate::{
    GraphError,
    graph::{GraphEdge, GraphEntity, SqliteGraph},
    strength::{RelationshipKind, StrengthTable},
};

const NOISE_TYPES: [&str; 3] = ["RC_INFLUENCE", "RC_TRIGGERING", "CALLS"];

#[derive(Clone, Debug)]
pub struct ChainShape {
    /// Number of nodes on the chain.
    pub length: usize,
    /// Recognized edges generated per consecutive pair.
    pub parallel: usize,
    /// Unrecognized-type edges generated per consecutive pair.
    pub noise: usize,
    /// Recognized edges per node pointing off the chain.
    pub detours: usize,
}

impl Default for ChainShape {
    fn default() -> Self {
        Self {
            length: 8,
            parallel: 2,
            noise: 1,
            detours: 1,
        }
    }
}

/// Entities and edges addressed by position; `from_id`/`to_id` are indexes into
/// `entities` until [`ChainDataset::materialize`] maps them to stored ids.
#[derive(Clone, Debug)]
pub struct ChainDataset {
    pub entities: Vec<GraphEntity>,
    pub edges: Vec<GraphEdge>,
    pub chain_len: usize,
}

impl ChainDataset {
    pub fn nodes(&self) -> usize {
        self.entities.len()
    }

    pub fn edges(&self) -> usize {
        self.edges.len()
    }

    /// Weakest recognized kind over all on-chain pairs, computed without a store.
    pub fn expected_kind(&self) -> Option<RelationshipKind> {
        let table = StrengthTable::archimate();
        let mut weakest: Option<(u8, RelationshipKind)> = None;
        for step in 1..self.chain_len {
            let (from, to) = ((step - 1) as i64, step as i64);
            let pair_weakest = self
                .edges
                .iter()
                .filter(|edge| edge.from_id == from && edge.to_id == to)
                .filter_map(|edge| {
                    let kind = RelationshipKind::parse(&edge.edge_type);
                    table.strength_of(&kind).map(|rank| (rank, kind))
                })
                .min_by_key(|(rank, _)| *rank)?;
            if weakest.as_ref().is_none_or(|(rank, _)| pair_weakest.0 < *rank) {
                weakest = Some(pair_weakest);
            }
        }
        weakest.map(|(_, kind)| kind)
    }

    /// Inserts the dataset and returns stored ids of the chain nodes, in order.
    pub fn materialize(&self, graph: &SqliteGraph) -> Result<Vec<i64>, GraphError> {
        let mut ids = Vec::with_capacity(self.entities.len());
        for entity in &self.entities {
            let mut record = entity.clone();
            record.id = 0;
            ids.push(graph.insert_entity(&record)?);
        }
        for edge in &self.edges {
            graph.insert_edge(&GraphEdge {
                id: 0,
                from_id: ids[edge.from_id as usize],
                to_id: ids[edge.to_id as usize],
                edge_type: edge.edge_type.clone(),
                data: edge.data.clone(),
            })?;
        }
        ids.truncate(self.chain_len);
        Ok(ids)
    }
}

pub fn generate_chain(shape: &ChainShape, seed: u64) -> ChainDataset {
    assert!(shape.length > 1, "chain length must exceed 1");
    assert!(shape.parallel > 0, "each pair needs at least one recognized edge");
    let mut rng = StdRng::seed_from_u64(seed);
    // Off-chain targets live after the chain nodes.
    let off_chain = if shape.detours > 0 { shape.length } else { 0 };
    let entities = build_entities(shape.length + off_chain);
    let mut edges = Vec::new();
    for step in 1..shape.length {
        let (from, to) = (step - 1, step);
        for _ in 0..shape.parallel {
            edges.push(new_edge(from, to, random_kind(&mut rng).as_str()));
        }
        for _ in 0..shape.noise {
            let ty = NOISE_TYPES[rng.gen_range(0..NOISE_TYPES.len())];
            edges.push(new_edge(from, to, ty));
        }
    }
    for node in 0..shape.length {
        for _ in 0..shape.detours {
            let target = shape.length + rng.gen_range(0..off_chain);
            edges.push(new_edge(node, target, random_kind(&mut rng).as_str()));
        }
    }
    ChainDataset {
        entities,
        edges,
        chain_len: shape.length,
    }
}

fn random_kind(rng: &mut StdRng) -> RelationshipKind {
    let recognized = RelationshipKind::RECOGNIZED;
    recognized[rng.gen_range(0..recognized.len())].clone()
}

fn build_entities(count: usize) -> Vec<GraphEntity> {
    (0..count)
        .map(|idx| GraphEntity {
            id: idx as i64,
            kind: "ELEMENT".to_string(),
            name: format!("Element{idx}"),
            data: json!({ "idx": idx }),
        })
        .collect()
}

fn new_edge(from: usize, to: usize, edge_type: &str) -> GraphEdge {
    GraphEdge {
        id: 0,
        from_id: from as i64,
        to_id: to as i64,
        edge_type: edge_type.to_string(),
        data: json!({}),
    }
}
