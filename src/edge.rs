use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Pipeline data flow, no column semantics
    GenericFlow,
    /// Foreign-key style column-to-column link between tables
    Relationship,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToOne,
    #[default]
    OneToMany,
    ManyToMany,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cardinality::OneToOne => "One-to-One",
            Cardinality::OneToMany => "One-to-Many",
            Cardinality::ManyToMany => "Many-to-Many",
        })
    }
}

/// Column-level detail of a relationship edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipDetail {
    pub source_column: String,
    pub target_column: String,
    pub cardinality: Cardinality,
    pub description: String,
}

/// Directed edge between two nodes. Immutable once added to a graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    /// Empty ids are replaced by the store on insert
    pub id: EdgeId,

    /// Data flows FROM this node
    pub source: NodeId,

    /// Data flows TO this node
    pub target: NodeId,

    pub kind: EdgeKind,
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipDetail>,
}

impl Edge {
    /// Create a generic-flow edge
    pub fn flow(
        id: impl Into<EdgeId>,
        source: NodeId,
        target: NodeId,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            target,
            kind: EdgeKind::GenericFlow,
            label: label.into(),
            relationship: None,
        }
    }

    /// Create a relationship edge carrying column detail
    pub fn relationship(
        id: impl Into<EdgeId>,
        source: NodeId,
        target: NodeId,
        label: impl Into<String>,
        detail: RelationshipDetail,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            target,
            kind: EdgeKind::Relationship,
            label: label.into(),
            relationship: Some(detail),
        }
    }

    /// Check if this edge touches a given node in either direction
    pub fn involves(&self, node: &NodeId) -> bool {
        self.source == *node || self.target == *node
    }

    pub fn starts_from(&self, node: &NodeId) -> bool {
        self.source == *node
    }

    pub fn ends_at(&self, node: &NodeId) -> bool {
        self.target == *node
    }
}
