use crate::{EdgeId, NodeId};
use thiserror::Error;

/// Coarse error categories callers map to user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    DuplicateId,
    UnknownTable,
    UnknownColumn,
    IncompleteSelection,
    EmptyColumnName,
    InvalidColumns,
}

/// Rejections produced by the relationship validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationshipError {
    #[error("Please select all required fields for the relationship")]
    IncompleteSelection,

    #[error("Unknown table: {0}")]
    UnknownTable(NodeId),

    #[error("Unknown column {column} on table {table}")]
    UnknownColumn { table: NodeId, column: String },
}

/// Errors returned by the graph store and the mutation API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} is not a table")]
    NotATable(NodeId),

    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("Column index {index} out of range for table {table} ({len} columns)")]
    ColumnIndexOutOfRange {
        table: NodeId,
        index: usize,
        len: usize,
    },

    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    #[error("Duplicate edge id: {0}")]
    DuplicateEdgeId(EdgeId),

    #[error("Column name cannot be empty")]
    EmptyColumnName,

    #[error("Duplicate column {column} on table {table}")]
    DuplicateColumn { table: NodeId, column: String },

    #[error("Table {table} has more than one primary key column")]
    MultiplePrimaryKeys { table: NodeId },

    #[error("Column {column} on table {table} has a reference but is not a foreign key")]
    ReferenceWithoutForeignKey { table: NodeId, column: String },

    #[error(transparent)]
    Relationship(#[from] RelationshipError),
}

impl GraphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::NodeNotFound(_)
            | GraphError::NotATable(_)
            | GraphError::EdgeNotFound(_)
            | GraphError::ColumnIndexOutOfRange { .. } => ErrorKind::NotFound,
            GraphError::DuplicateNodeId(_) | GraphError::DuplicateEdgeId(_) => {
                ErrorKind::DuplicateId
            }
            GraphError::EmptyColumnName => ErrorKind::EmptyColumnName,
            GraphError::DuplicateColumn { .. }
            | GraphError::MultiplePrimaryKeys { .. }
            | GraphError::ReferenceWithoutForeignKey { .. } => ErrorKind::InvalidColumns,
            GraphError::Relationship(RelationshipError::IncompleteSelection) => {
                ErrorKind::IncompleteSelection
            }
            GraphError::Relationship(RelationshipError::UnknownTable(_)) => {
                ErrorKind::UnknownTable
            }
            GraphError::Relationship(RelationshipError::UnknownColumn { .. }) => {
                ErrorKind::UnknownColumn
            }
        }
    }
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
