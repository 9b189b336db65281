use crate::Column;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node, unique across tables and transformations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
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

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of pipeline step a transformation node performs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Filter,
    Join,
    Output,
    Other,
}

impl TransformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Filter => "filter",
            TransformKind::Join => "join",
            TransformKind::Output => "output",
            TransformKind::Other => "other",
        }
    }

    /// Capitalized name used in node labels
    pub fn title(&self) -> &'static str {
        match self {
            TransformKind::Filter => "Filter",
            TransformKind::Join => "Join",
            TransformKind::Output => "Output",
            TransformKind::Other => "Other",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of [`NodeData`], carried in events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Table,
    Transformation,
}

/// Kind-specific payload of a node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeData {
    Table {
        #[serde(
            rename = "originDatabaseName",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        origin_database: Option<String>,
        columns: Vec<Column>,
    },
    Transformation {
        #[serde(rename = "transformKind")]
        transform: TransformKind,
        #[serde(
            rename = "upstreamNodeId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        upstream: Option<NodeId>,
    },
}

/// A table or transformation in the flow graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    /// Empty ids are replaced by the store on insert
    pub id: NodeId,
    pub label: String,
    #[serde(flatten)]
    pub data: NodeData,
}

impl Node {
    /// Create a table node
    pub fn table(id: impl Into<NodeId>, label: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data: NodeData::Table {
                origin_database: None,
                columns,
            },
        }
    }

    /// Create a transformation node
    pub fn transformation(
        id: impl Into<NodeId>,
        label: impl Into<String>,
        transform: TransformKind,
        upstream: Option<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data: NodeData::Transformation {
                transform,
                upstream,
            },
        }
    }

    /// Record which database a table node was browsed from
    pub fn with_origin_database(mut self, database: impl Into<String>) -> Self {
        if let NodeData::Table {
            origin_database, ..
        } = &mut self.data
        {
            *origin_database = Some(database.into());
        }
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Table { .. } => NodeKind::Table,
            NodeData::Transformation { .. } => NodeKind::Transformation,
        }
    }

    pub fn is_table(&self) -> bool {
        self.kind() == NodeKind::Table
    }

    /// Columns of a table node, `None` for transformations
    pub fn columns(&self) -> Option<&[Column]> {
        match &self.data {
            NodeData::Table { columns, .. } => Some(columns),
            NodeData::Transformation { .. } => None,
        }
    }

    pub(crate) fn columns_mut(&mut self) -> Option<&mut Vec<Column>> {
        match &mut self.data {
            NodeData::Table { columns, .. } => Some(columns),
            NodeData::Transformation { .. } => None,
        }
    }

    /// Look up a table column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns()?.iter().find(|c| c.name == name)
    }

    pub fn transform_kind(&self) -> Option<TransformKind> {
        match self.data {
            NodeData::Transformation { transform, .. } => Some(transform),
            NodeData::Table { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColumnType;

    #[test]
    fn test_table_node() {
        let node = Node::table(
            "customers",
            "customers",
            vec![
                Column::primary_key("id", ColumnType::Int),
                Column::new("email", ColumnType::Varchar),
            ],
        )
        .with_origin_database("Production DB");

        assert_eq!(node.kind(), NodeKind::Table);
        assert!(node.is_table());
        assert_eq!(node.columns().map(|c| c.len()), Some(2));
        assert!(node.column("email").is_some());
        assert!(node.column("phone").is_none());
        assert_eq!(node.transform_kind(), None);
        match &node.data {
            NodeData::Table {
                origin_database, ..
            } => assert_eq!(origin_database.as_deref(), Some("Production DB")),
            _ => panic!("Expected table data"),
        }
    }

    #[test]
    fn test_transformation_node() {
        let node = Node::transformation(
            "transformation-1",
            "Filter Transformation",
            TransformKind::Filter,
            Some(NodeId::from("customers")),
        )
        .with_origin_database("ignored");

        assert_eq!(node.kind(), NodeKind::Transformation);
        assert_eq!(node.columns(), None);
        assert_eq!(node.column("id"), None);
        assert_eq!(node.transform_kind(), Some(TransformKind::Filter));
    }

    #[test]
    fn test_node_serialization() {
        let node = Node::transformation(
            "j1",
            "Join Transformation",
            TransformKind::Join,
            Some(NodeId::from("orders")),
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "transformation");
        assert_eq!(json["transformKind"], "join");
        assert_eq!(json["upstreamNodeId"], "orders");
        assert_eq!(json["id"], "j1");

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);

        let table = Node::table("c", "customers", vec![]).with_origin_database("Production DB");
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["type"], "table");
        assert_eq!(json["originDatabaseName"], "Production DB");
        assert!(json.get("origin_database").is_none());
    }
}
