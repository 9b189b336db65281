// Helper functions to build flow graphs for integration tests
#![allow(dead_code)]

use flow_graph::{
    Column, ColumnType, Edge, EdgeId, FlowDesigner, Graph, GraphError, GraphEvent, GraphStore,
    Node, NodeId, Result, TableSchema,
};

/// Table `A(id PK)` and table `B(a_id)`
pub fn two_table_designer() -> FlowDesigner {
    let mut designer = FlowDesigner::new();
    designer
        .add_node(Node::table(
            "A",
            "A",
            vec![Column::primary_key("id", ColumnType::Int)],
        ))
        .unwrap();
    designer
        .add_node(Node::table("B", "B", vec![Column::new("a_id", ColumnType::Int)]))
        .unwrap();
    designer.clear_events();
    designer
}

/// The two sample databases offered by schema browsing
pub fn production_tables() -> Vec<TableSchema> {
    vec![
        TableSchema::new(
            "customers",
            vec![
                Column::primary_key("id", ColumnType::Int),
                Column::new("name", ColumnType::Varchar),
                Column::new("email", ColumnType::Varchar),
                Column::new("created_at", ColumnType::Timestamp),
            ],
        ),
        TableSchema::new(
            "orders",
            vec![
                Column::primary_key("id", ColumnType::Int),
                Column::foreign_key("customer_id", ColumnType::Int, "customers.id"),
                Column::new("total", ColumnType::Decimal),
                Column::new("status", ColumnType::Varchar),
                Column::new("created_at", ColumnType::Timestamp),
            ],
        ),
        TableSchema::new(
            "products",
            vec![
                Column::primary_key("id", ColumnType::Int),
                Column::new("name", ColumnType::Varchar),
                Column::new("price", ColumnType::Decimal),
                Column::new("category", ColumnType::Varchar),
            ],
        ),
    ]
}

/// A graph store whose column updates always fail
#[derive(Default)]
pub struct RejectingColumns {
    pub inner: Graph,
}

impl GraphStore for RejectingColumns {
    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.inner.node(id)
    }

    fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.inner.edge(id)
    }

    fn nodes(&self) -> Vec<&Node> {
        self.inner.nodes()
    }

    fn edges(&self) -> Vec<&Edge> {
        self.inner.edges()
    }

    fn add_node(&mut self, node: Node) -> Result<NodeId> {
        self.inner.add_node(node)
    }

    fn remove_node(&mut self, id: &NodeId) -> Result<Node> {
        self.inner.remove_node(id)
    }

    fn update_node_columns(&mut self, id: &NodeId, _columns: Vec<Column>) -> Result<()> {
        Err(GraphError::NotATable(id.clone()))
    }

    fn add_edge(&mut self, edge: Edge) -> Result<EdgeId> {
        self.inner.add_edge(edge)
    }

    fn remove_edge(&mut self, id: &EdgeId) -> Result<Edge> {
        self.inner.remove_edge(id)
    }

    fn take_events(&mut self) -> Vec<GraphEvent> {
        self.inner.take_events()
    }
}
