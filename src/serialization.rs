use crate::{DesignerConfig, Edge, Graph, GraphStore, Node, Result as GraphResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Serializable graph representation handed to persistence collaborators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize graph snapshot")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse graph snapshot")
    }
}

impl Graph {
    /// Copy out nodes and edges in insertion order
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes().into_iter().cloned().collect(),
            edges: self.edges().into_iter().cloned().collect(),
        }
    }

    /// Rebuild a graph through the normal insert path, so every invariant is re-checked
    pub fn from_snapshot(snapshot: GraphSnapshot, config: &DesignerConfig) -> GraphResult<Self> {
        let mut graph = Graph::with_config(config);

        for node in snapshot.nodes {
            graph.add_node(node)?;
        }
        for edge in snapshot.edges {
            graph.add_edge(edge)?;
        }

        graph.take_events();
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, ColumnType, FlowDesigner, GraphError, NodeId, TransformKind};
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn designed_graph() -> Graph {
        let mut designer = FlowDesigner::new();
        let customers = designer
            .add_node(Node::table(
                "customers",
                "customers",
                vec![Column::primary_key("id", ColumnType::Int)],
            ))
            .unwrap();
        let orders = designer
            .add_node(Node::table(
                "orders",
                "orders",
                vec![
                    Column::primary_key("id", ColumnType::Int),
                    Column::new("customer_id", ColumnType::Int),
                ],
            ))
            .unwrap();
        designer
            .create_relationship(&customers, "id", &orders, "customer_id")
            .unwrap();
        designer
            .add_transformation(TransformKind::Filter, &orders)
            .unwrap();
        designer.into_store()
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let graph = designed_graph();
        let snapshot = graph.snapshot();

        let ids: Vec<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids[..2].to_vec(), vec!["customers", "orders"]);
        assert_eq!(snapshot.nodes.len(), 3);
        assert_eq!(snapshot.edges.len(), 2);
    }

    #[test]
    fn test_json_round_trip() {
        let graph = designed_graph();
        let json = graph.snapshot().to_json().unwrap();

        let restored =
            Graph::from_snapshot(GraphSnapshot::from_json(&json).unwrap(), &DesignerConfig::default())
                .unwrap();
        assert_eq!(restored.snapshot(), graph.snapshot());

        let fk = restored
            .node(&NodeId::from("orders"))
            .unwrap()
            .column("customer_id")
            .unwrap();
        assert_eq!(fk.references.as_deref(), Some("customers.id"));
    }

    #[test]
    fn test_restore_rejects_dangling_edge() {
        let mut snapshot = designed_graph().snapshot();
        snapshot.nodes.retain(|n| n.id.as_str() != "customers");

        assert_matches!(
            Graph::from_snapshot(snapshot, &DesignerConfig::default()),
            Err(GraphError::NodeNotFound(id)) if id.as_str() == "customers"
        );
    }

    #[test]
    fn test_restore_rejects_duplicate_node() {
        let mut snapshot = designed_graph().snapshot();
        let copy = snapshot.nodes[0].clone();
        snapshot.nodes.push(copy);

        assert_matches!(
            Graph::from_snapshot(snapshot, &DesignerConfig::default()),
            Err(GraphError::DuplicateNodeId(_))
        );
    }

    #[test]
    fn test_corrupted_snapshot() {
        let err = GraphSnapshot::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("Failed to parse graph snapshot"));
    }
}
