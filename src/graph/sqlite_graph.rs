use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::{cache::OutgoingEdgeCache, errors::GraphError, schema::ensure_schema};

use super::types::{
    GraphEdge, GraphEntity, row_to_edge, row_to_entity, validate_edge, validate_entity,
};

const OUTGOING_EDGES_SQL: &str =
    "SELECT id, from_id, to_id, edge_type, data FROM graph_edges WHERE from_id=?1 ORDER BY id";

pub struct SqliteGraph {
    conn: Connection,
    outgoing_cache: OutgoingEdgeCache,
}

impl SqliteGraph {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| GraphError::connection(e.to_string()))?;
        ensure_schema(&conn)?;
        debug!(path = %path.display(), "opened graph database");
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, GraphError> {
        let conn =
            Connection::open_in_memory().map_err(|e| GraphError::connection(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Inserts an entity and returns the SQLite rowid (monotonically increasing per connection).
    pub fn insert_entity(&self, entity: &GraphEntity) -> Result<i64, GraphError> {
        validate_entity(entity)?;
        let data = serde_json::to_string(&entity.data)
            .map_err(|e| GraphError::invalid_input(e.to_string()))?;
        self.conn
            .execute(
                "INSERT INTO graph_entities(kind, name, data) VALUES(?1, ?2, ?3)",
                params![entity.kind.as_str(), entity.name.as_str(), data],
            )
            .map_err(|e| GraphError::query(e.to_string()))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_entity(&self, id: i64) -> Result<GraphEntity, GraphError> {
        self.conn
            .query_row(
                "SELECT id, kind, name, data FROM graph_entities WHERE id=?1",
                params![id],
                row_to_entity,
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    GraphError::not_found(format!("entity {id}"))
                }
                other => GraphError::query(other.to_string()),
            })
    }

    pub fn delete_entity(&self, id: i64) -> Result<(), GraphError> {
        let affected = self
            .conn
            .execute("DELETE FROM graph_entities WHERE id=?1", params![id])
            .map_err(|e| GraphError::query(e.to_string()))?;
        if affected == 0 {
            return Err(GraphError::not_found(format!("entity {id}")));
        }
        self.conn
            .execute(
                "DELETE FROM graph_edges WHERE from_id=?1 OR to_id=?1",
                params![id],
            )
            .map_err(|e| GraphError::query(e.to_string()))?;
        self.invalidate_caches();
        Ok(())
    }

    /// Self loops are accepted; chains may legitimately revisit a node.
    pub fn insert_edge(&self, edge: &GraphEdge) -> Result<i64, GraphError> {
        validate_edge(edge)?;
        if !self.entity_exists(edge.from_id)? || !self.entity_exists(edge.to_id)? {
            return Err(GraphError::invalid_input(
                "edge endpoints must reference existing entities",
            ));
        }
        let data = serde_json::to_string(&edge.data)
            .map_err(|e| GraphError::invalid_input(e.to_string()))?;
        self.conn
            .execute(
                "INSERT INTO graph_edges(from_id, to_id, edge_type, data) VALUES(?1, ?2, ?3, ?4)",
                params![edge.from_id, edge.to_id, edge.edge_type.as_str(), data],
            )
            .map_err(|e| GraphError::query(e.to_string()))?;
        self.invalidate_caches();
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_edge(&self, id: i64) -> Result<GraphEdge, GraphError> {
        self.conn
            .query_row(
                "SELECT id, from_id, to_id, edge_type, data FROM graph_edges WHERE id=?1",
                params![id],
                row_to_edge,
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => {
                    GraphError::not_found(format!("edge {id}"))
                }
                other => GraphError::query(other.to_string()),
            })
    }

    pub fn delete_edge(&self, id: i64) -> Result<(), GraphError> {
        let affected = self
            .conn
            .execute("DELETE FROM graph_edges WHERE id=?1", params![id])
            .map_err(|e| GraphError::query(e.to_string()))?;
        if affected == 0 {
            return Err(GraphError::not_found(format!("edge {id}")));
        }
        self.invalidate_caches();
        Ok(())
    }

    pub fn list_entity_ids(&self) -> Result<Vec<i64>, GraphError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id FROM graph_entities ORDER BY id")
            .map_err(|e| GraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| GraphError::query(e.to_string()))?;
        let mut ids = Vec::new();
        for id in rows {
            ids.push(id.map_err(|e| GraphError::query(e.to_string()))?);
        }
        Ok(ids)
    }

    /// Outgoing edges of `id` in insertion order. Unknown ids yield an empty list.
    /// Commits from other connections to the same database invalidate cached lists.
    pub fn outgoing_edges(&self, id: i64) -> Result<Vec<GraphEdge>, GraphError> {
        if self.outgoing_cache.sync_version(self.data_version()?) {
            debug!("database changed by another connection, dropped cached edges");
        }
        if let Some(cached) = self.outgoing_cache.get(id) {
            return Ok(cached);
        }
        let mut stmt = self
            .conn
            .prepare_cached(OUTGOING_EDGES_SQL)
            .map_err(|e| GraphError::query(e.to_string()))?;
        let rows = stmt
            .query_map(params![id], row_to_edge)
            .map_err(|e| GraphError::query(e.to_string()))?;
        let mut edges = Vec::new();
        for row in rows {
            edges.push(row.map_err(|e| GraphError::query(e.to_string()))?);
        }
        self.outgoing_cache.insert(id, edges.clone());
        Ok(edges)
    }

    fn data_version(&self) -> Result<i64, GraphError> {
        self.conn
            .query_row("PRAGMA data_version", [], |row| row.get(0))
            .map_err(|e| GraphError::query(e.to_string()))
    }

    fn entity_exists(&self, id: i64) -> Result<bool, GraphError> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM graph_entities WHERE id=?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| GraphError::query(e.to_string()))?;
        Ok(exists.is_some())
    }

    fn invalidate_caches(&self) {
        self.outgoing_cache.clear();
    }

    fn from_connection(conn: Connection) -> Self {
        conn.set_prepared_statement_cache_capacity(64);
        Self {
            conn,
            outgoing_cache: OutgoingEdgeCache::new(),
        }
    }
}
