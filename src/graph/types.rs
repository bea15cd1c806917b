use serde::{Deserialize, Serialize};

use crate::errors::GraphError;

/// A stored element. `kind` carries the element label (e.g. `APP_COMP`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEntity {
    pub id: i64,
    pub kind: String,
    pub name: String,
    pub data: serde_json::Value,
}

/// A directed relationship between two entities. `edge_type` is free text;
/// only the derivation engine interprets it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub id: i64,
    pub from_id: i64,
    pub to_id: i64,
    pub edge_type: String,
    pub data: serde_json::Value,
}

pub fn validate_entity(entity: &GraphEntity) -> Result<(), GraphError> {
    if entity.kind.trim().is_empty() {
        return Err(GraphError::invalid_input("entity kind must be set"));
    }
    if entity.name.trim().is_empty() {
        return Err(GraphError::invalid_input("entity name must be set"));
    }
    Ok(())
}

pub fn validate_edge(edge: &GraphEdge) -> Result<(), GraphError> {
    if edge.edge_type.trim().is_empty() {
        return Err(GraphError::invalid_input("edge type must be set"));
    }
    if edge.from_id <= 0 || edge.to_id <= 0 {
        return Err(GraphError::invalid_input(
            "edge endpoints must be positive ids",
        ));
    }
    Ok(())
}

pub fn row_to_entity(row: &rusqlite::Row<'_>) -> Result<GraphEntity, rusqlite::Error> {
    let data: String = row.get(3)?;
    Ok(GraphEntity {
        id: row.get(0)?,
        kind: row.get(1)?,
        name: row.get(2)?,
        data: parse_payload(data)?,
    })
}

pub fn row_to_edge(row: &rusqlite::Row<'_>) -> Result<GraphEdge, rusqlite::Error> {
    let data: String = row.get(4)?;
    Ok(GraphEdge {
        id: row.get(0)?,
        from_id: row.get(1)?,
        to_id: row.get(2)?,
        edge_type: row.get(3)?,
        data: parse_payload(data)?,
    })
}

fn parse_payload(data: String) -> Result<serde_json::Value, rusqlite::Error> {
    serde_json::from_str(&data).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            data.len(),
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}
