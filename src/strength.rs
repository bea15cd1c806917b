//! Relationship kinds and their derivation strength.
//!
//! ArchiMate derivation keeps the weakest relationship found along a chain. The
//! ordering below runs from weakest to strongest:
//!
//! `ASSOCIATION < ACCESS < SERVING < REALIZATION < ASSIGNMENT < AGGREGATION < COMPOSITION`
//!
//! Stored edge types carry an `RC_` prefix (`RC_SERVING`, ...). Any other type name
//! parses to [`RelationshipKind::Unrecognized`] and has no strength, which makes the
//! edge invisible to derivation.

use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipKind {
    Association,
    Access,
    Serving,
    Realization,
    Assignment,
    Aggregation,
    Composition,
    Unrecognized(String),
}

impl RelationshipKind {
    /// Recognized kinds, weakest first.
    pub const RECOGNIZED: [RelationshipKind; 7] = [
        RelationshipKind::Association,
        RelationshipKind::Access,
        RelationshipKind::Serving,
        RelationshipKind::Realization,
        RelationshipKind::Assignment,
        RelationshipKind::Aggregation,
        RelationshipKind::Composition,
    ];

    /// Exact, case-sensitive match on the stored type name.
    pub fn parse(name: &str) -> Self {
        Self::recognized(name)
            .unwrap_or_else(|| RelationshipKind::Unrecognized(name.to_string()))
    }

    /// Like [`parse`](Self::parse) but returns `None` for unknown names without allocating.
    pub fn recognized(name: &str) -> Option<Self> {
        let kind = match name {
            "RC_ASSOCIATION" => RelationshipKind::Association,
            "RC_ACCESS" => RelationshipKind::Access,
            "RC_SERVING" => RelationshipKind::Serving,
            "RC_REALIZATION" => RelationshipKind::Realization,
            "RC_ASSIGNMENT" => RelationshipKind::Assignment,
            "RC_AGGREGATION" => RelationshipKind::Aggregation,
            "RC_COMPOSITION" => RelationshipKind::Composition,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RelationshipKind::Association => "RC_ASSOCIATION",
            RelationshipKind::Access => "RC_ACCESS",
            RelationshipKind::Serving => "RC_SERVING",
            RelationshipKind::Realization => "RC_REALIZATION",
            RelationshipKind::Assignment => "RC_ASSIGNMENT",
            RelationshipKind::Aggregation => "RC_AGGREGATION",
            RelationshipKind::Composition => "RC_COMPOSITION",
            RelationshipKind::Unrecognized(name) => name.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, RelationshipKind::Unrecognized(_))
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RelationshipKind {
    fn from(name: String) -> Self {
        RelationshipKind::recognized(&name).unwrap_or(RelationshipKind::Unrecognized(name))
    }
}

impl From<RelationshipKind> for String {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Unrecognized(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Read-only rank lookup. Build it once and share it by reference; it has no
/// mutating operations.
#[derive(Debug, Clone)]
pub struct StrengthTable {
    ranks: AHashMap<RelationshipKind, u8>,
}

impl StrengthTable {
    /// The ArchiMate ordering, ranks 1 (association) through 7 (composition).
    pub fn archimate() -> Self {
        let ranks = RelationshipKind::RECOGNIZED
            .into_iter()
            .zip(1u8..)
            .collect::<AHashMap<_, _>>();
        Self { ranks }
    }

    pub fn strength_of(&self, kind: &RelationshipKind) -> Option<u8> {
        self.ranks.get(kind).copied()
    }

    /// Rank of a stored type name. Unknown names return `None` without allocating.
    pub fn rank_of_type(&self, edge_type: &str) -> Option<u8> {
        RelationshipKind::recognized(edge_type).and_then(|kind| self.strength_of(&kind))
    }

    /// Smallest rank in the table; a match at this rank cannot be beaten.
    pub fn weakest_rank(&self) -> Option<u8> {
        self.ranks.values().copied().min()
    }

    /// Entries ordered weakest first.
    pub fn entries(&self) -> Vec<(RelationshipKind, u8)> {
        let mut entries = self
            .ranks
            .iter()
            .map(|(kind, rank)| (kind.clone(), *rank))
            .collect::<Vec<_>>();
        entries.sort_by_key(|(_, rank)| *rank);
        entries
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl Default for StrengthTable {
    fn default() -> Self {
        Self::archimate()
    }
}
