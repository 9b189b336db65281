use crate::{Cardinality, GraphStore, Node, NodeId, RelationshipError};

/// A relationship request that passed validation, with resolved display labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRelationship {
    pub source_table: NodeId,
    pub source_label: String,
    pub source_column: String,
    pub target_table: NodeId,
    pub target_label: String,
    pub target_column: String,

    /// Always one-to-many; key flags are not consulted
    pub cardinality: Cardinality,
}

impl ValidatedRelationship {
    /// Edge label, e.g. `"id → a_id"`
    pub fn label(&self, arrow: &str) -> String {
        format!("{}{}{}", self.source_column, arrow, self.target_column)
    }

    /// Value written to the target column's `references`
    pub fn reference(&self) -> String {
        format!("{}.{}", self.source_label, self.source_column)
    }

    pub fn description(&self) -> String {
        format!(
            "Foreign key relationship from {}.{} to {}.{}",
            self.source_label, self.source_column, self.target_label, self.target_column
        )
    }
}

/// Check a proposed relationship against the current graph.
///
/// The completeness guard runs first so that any blank field reports
/// `IncompleteSelection`; the table and column checks follow in order.
pub fn validate_relationship<S: GraphStore + ?Sized>(
    graph: &S,
    source_table: &NodeId,
    source_column: &str,
    target_table: &NodeId,
    target_column: &str,
) -> Result<ValidatedRelationship, RelationshipError> {
    if source_table.is_empty()
        || source_column.is_empty()
        || target_table.is_empty()
        || target_column.is_empty()
    {
        return Err(RelationshipError::IncompleteSelection);
    }

    let source = table_node(graph, source_table)?;
    let target = table_node(graph, target_table)?;

    if source.column(source_column).is_none() {
        return Err(RelationshipError::UnknownColumn {
            table: source_table.clone(),
            column: source_column.to_string(),
        });
    }
    if target.column(target_column).is_none() {
        return Err(RelationshipError::UnknownColumn {
            table: target_table.clone(),
            column: target_column.to_string(),
        });
    }

    Ok(ValidatedRelationship {
        source_table: source_table.clone(),
        source_label: source.label.clone(),
        source_column: source_column.to_string(),
        target_table: target_table.clone(),
        target_label: target.label.clone(),
        target_column: target_column.to_string(),
        cardinality: Cardinality::OneToMany,
    })
}

fn table_node<'g, S: GraphStore + ?Sized>(
    graph: &'g S,
    id: &NodeId,
) -> Result<&'g Node, RelationshipError> {
    graph
        .node(id)
        .filter(|n| n.is_table())
        .ok_or_else(|| RelationshipError::UnknownTable(id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, ColumnType, Graph, TransformKind};
    use assert_matches::assert_matches;

    fn graph() -> Graph {
        let mut graph = Graph::new();
        graph
            .add_node(Node::table(
                "A",
                "customers",
                vec![Column::primary_key("id", ColumnType::Int)],
            ))
            .unwrap();
        graph
            .add_node(Node::table(
                "B",
                "orders",
                vec![Column::new("a_id", ColumnType::Int)],
            ))
            .unwrap();
        graph
            .add_node(Node::transformation("F", "Filter", TransformKind::Filter, None))
            .unwrap();
        graph
    }

    fn check(
        graph: &Graph,
        st: &str,
        sc: &str,
        tt: &str,
        tc: &str,
    ) -> Result<ValidatedRelationship, RelationshipError> {
        validate_relationship(graph, &NodeId::from(st), sc, &NodeId::from(tt), tc)
    }

    #[test]
    fn test_valid_relationship() {
        let graph = graph();
        let rel = check(&graph, "A", "id", "B", "a_id").unwrap();

        assert_eq!(rel.source_label, "customers");
        assert_eq!(rel.target_label, "orders");
        assert_eq!(rel.cardinality, Cardinality::OneToMany);
        assert_eq!(rel.label(" → "), "id → a_id");
        assert_eq!(rel.reference(), "customers.id");
        assert_eq!(
            rel.description(),
            "Foreign key relationship from customers.id to orders.a_id"
        );
    }

    #[test]
    fn test_cardinality_ignores_key_flags() {
        let graph = graph();
        // a_id is not a primary key, id is; direction reversed still yields one-to-many
        let rel = check(&graph, "B", "a_id", "A", "id").unwrap();
        assert_eq!(rel.cardinality, Cardinality::OneToMany);
    }

    #[test]
    fn test_unknown_table() {
        let graph = graph();
        assert_eq!(
            check(&graph, "ghost", "id", "B", "a_id"),
            Err(RelationshipError::UnknownTable(NodeId::from("ghost")))
        );
        assert_eq!(
            check(&graph, "A", "id", "ghost", "a_id"),
            Err(RelationshipError::UnknownTable(NodeId::from("ghost")))
        );
        // Transformations are not tables
        assert_eq!(
            check(&graph, "F", "id", "B", "a_id"),
            Err(RelationshipError::UnknownTable(NodeId::from("F")))
        );
    }

    #[test]
    fn test_unknown_column() {
        let graph = graph();
        assert_matches!(
            check(&graph, "A", "uuid", "B", "a_id"),
            Err(RelationshipError::UnknownColumn { table, column })
                if table.as_str() == "A" && column == "uuid"
        );
        assert_matches!(
            check(&graph, "A", "id", "B", "customer_id"),
            Err(RelationshipError::UnknownColumn { table, .. }) if table.as_str() == "B"
        );
    }

    #[test]
    fn test_incomplete_selection() {
        let graph = graph();
        for (st, sc, tt, tc) in [
            ("", "id", "B", "a_id"),
            ("A", "", "B", "a_id"),
            ("A", "id", "", "a_id"),
            ("A", "id", "B", ""),
        ] {
            assert_eq!(
                check(&graph, st, sc, tt, tc),
                Err(RelationshipError::IncompleteSelection)
            );
        }
    }
}
