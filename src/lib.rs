// Flow Graph - schema relationship graph for ETL flow design

pub mod column;
pub mod config;
pub mod designer;
pub mod edge;
pub mod error;
pub mod event;
pub mod graph;
pub mod id_generator;
pub mod node;
pub mod relationship;
pub mod serialization;
pub mod validation;

// Re-export main types for convenience
pub use column::{Column, ColumnType};
pub use config::{DesignerConfig, IdStrategy};
pub use designer::{FlowDesigner, TableSchema};
pub use edge::{Cardinality, Edge, EdgeId, EdgeKind, RelationshipDetail};
pub use error::{ErrorKind, GraphError, RelationshipError, Result};
pub use event::{EventType, GraphEvent, GraphObserver, Notice};
pub use graph::{Graph, GraphStore};
pub use id_generator::IdGenerator;
pub use node::{Node, NodeData, NodeId, NodeKind, TransformKind};
pub use relationship::{validate_relationship, ValidatedRelationship};
pub use serialization::GraphSnapshot;
pub use validation::{
    ValidatedGraph, ValidationIssue, ValidationIssueType, ValidationResult, ValidationSeverity,
    Validator,
};
