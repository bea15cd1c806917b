use thiserror::Error;

/// Faults raised by the graph store. Derivation outcomes never use this type;
/// a chain that cannot be derived is reported as [`crate::derive::Derivation::Failed`].
///
/// `ChainDeriver::derive` returns whatever the backend's `outgoing_edges` raised,
/// unchanged. For the SQLite store that is `QueryError`.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The database could not be opened.
    #[error("connection error: {0}")]
    ConnectionError(String),
    /// Schema bootstrap failed while opening.
    #[error("schema error: {0}")]
    SchemaError(String),
    /// A statement failed. Raised by every store operation, edge enumeration included.
    #[error("query error: {0}")]
    QueryError(String),
    /// Lookup or delete of a missing entity or edge. Derivation never sees it; unknown
    /// node ids simply have no outgoing edges.
    #[error("not found: {0}")]
    NotFound(String),
    /// Rejected on insert, such as blank fields or dangling edge endpoints.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl GraphError {
    pub fn connection<T: Into<String>>(msg: T) -> Self {
        GraphError::ConnectionError(msg.into())
    }

    pub fn schema<T: Into<String>>(msg: T) -> Self {
        GraphError::SchemaError(msg.into())
    }

    pub fn query<T: Into<String>>(msg: T) -> Self {
        GraphError::QueryError(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        GraphError::NotFound(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        GraphError::InvalidInput(msg.into())
    }
}
