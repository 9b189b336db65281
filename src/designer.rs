use crate::relationship::validate_relationship;
use crate::{
    Column, DesignerConfig, Edge, EdgeId, Graph, GraphError, GraphEvent, GraphObserver,
    GraphStore, Node, NodeId, Notice, RelationshipDetail, RelationshipError, Result,
    TransformKind,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A table as delivered by schema discovery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// Mutation API over a graph store.
///
/// Each operation runs to completion against the store, then publishes the
/// buffered events (and a notice) to observers. Failed operations leave the
/// store unchanged and publish nothing.
pub struct FlowDesigner<S: GraphStore = Graph> {
    store: S,
    config: DesignerConfig,
    observers: Vec<Box<dyn GraphObserver>>,

    /// Committed events, oldest first
    history: Vec<GraphEvent>,
}

impl FlowDesigner<Graph> {
    /// Start a session on an empty graph
    pub fn new() -> Self {
        Self::with_config(DesignerConfig::default())
    }

    pub fn with_config(config: DesignerConfig) -> Self {
        let graph = Graph::with_config(&config);
        Self::with_store(graph, config)
    }
}

impl Default for FlowDesigner<Graph> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GraphStore> FlowDesigner<S> {
    pub fn with_store(mut store: S, config: DesignerConfig) -> Self {
        // Anything buffered before the session started is not ours to publish
        store.take_events();
        Self {
            store,
            config,
            observers: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn graph(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Register an observer for committed events and notices
    pub fn subscribe(&mut self, observer: impl GraphObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Committed events, oldest first
    pub fn events(&self) -> &[GraphEvent] {
        &self.history
    }

    pub fn clear_events(&mut self) {
        self.history.clear();
    }

    // ========== Nodes ==========

    /// Insert a prepared node
    pub fn add_node(&mut self, node: Node) -> Result<NodeId> {
        debug!(id = %node.id, label = %node.label, "FlowDesigner::add_node");
        let label = node.label.clone();
        let id = self.attempt("add_node", |store| store.add_node(node))?;
        info!(%id, %label, "node added");
        self.commit(Some(Notice::new(
            "Node added",
            format!("{} has been added to the flow.", label),
        )));
        Ok(id)
    }

    /// Add a table browsed from a source or target database
    pub fn add_table(&mut self, table: TableSchema, origin_database: Option<&str>) -> Result<NodeId> {
        debug!(name = %table.name, ?origin_database, "FlowDesigner::add_table");
        let mut node = Node::table(NodeId::new(""), table.name.clone(), table.columns);
        if let Some(database) = origin_database {
            node = node.with_origin_database(database);
        }

        let id = self.attempt("add_table", |store| store.add_node(node))?;
        info!(%id, name = %table.name, "table added");
        self.commit(Some(Notice::new(
            "Table added",
            format!("{} has been added to the flow.", table.name),
        )));
        Ok(id)
    }

    /// Add a transformation fed by `upstream`, connected with a generic-flow edge
    pub fn add_transformation(&mut self, kind: TransformKind, upstream: &NodeId) -> Result<NodeId> {
        debug!(%kind, %upstream, "FlowDesigner::add_transformation");
        let upstream_label = match self.store.node(upstream) {
            Some(node) => node.label.clone(),
            None => return Err(self.reject("add_transformation", GraphError::NodeNotFound(upstream.clone()))),
        };

        let label = format!("{} Transformation", kind.title());
        let node = Node::transformation(NodeId::new(""), label.clone(), kind, Some(upstream.clone()));
        let id = self.attempt("add_transformation", |store| store.add_node(node))?;

        let edge = Edge::flow(
            EdgeId::new(""),
            upstream.clone(),
            id.clone(),
            self.config.flow_label(&upstream_label, &label),
        );
        if let Err(err) = self.store.add_edge(edge) {
            self.roll_back_node(&id);
            return Err(self.reject("add_transformation", err));
        }

        info!(%id, %upstream, "transformation added");
        self.commit(Some(Notice::new(
            "Transformation added",
            format!("{} transformation node has been added to the flow.", kind),
        )));
        Ok(id)
    }

    /// Palette creation: numbered, unconnected node of the given kind.
    /// Output destinations are table nodes so they can receive columns.
    pub fn add_generic_node(&mut self, kind: TransformKind) -> Result<NodeId> {
        debug!(%kind, "FlowDesigner::add_generic_node");
        let base = match kind {
            TransformKind::Filter => "Filter Transformation",
            TransformKind::Join => "Join Transformation",
            TransformKind::Output => "Output Destination",
            TransformKind::Other => "New Node",
        };
        let highest = self
            .store
            .nodes()
            .iter()
            .filter_map(|n| n.label.strip_prefix(base)?.strip_prefix(' ')?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        let label = format!("{} {}", base, highest + 1);

        let node = match kind {
            TransformKind::Output => Node::table(NodeId::new(""), label.clone(), Vec::new()),
            _ => Node::transformation(NodeId::new(""), label.clone(), kind, None),
        };
        let id = self.attempt("add_generic_node", |store| store.add_node(node))?;

        info!(%id, %label, "node added");
        self.commit(Some(Notice::new(
            "Node added",
            format!("{} has been added to the flow.", label),
        )));
        Ok(id)
    }

    /// Remove a node and, in the same transaction, every edge touching it
    pub fn delete_node(&mut self, id: &NodeId) -> Result<()> {
        debug!(%id, "FlowDesigner::delete_node");
        self.attempt("delete_node", |store| store.remove_node(id))?;
        info!(%id, "node deleted");
        self.commit(None);
        Ok(())
    }

    // ========== Edges ==========

    /// Freeform drag-connection between any two nodes
    pub fn connect_generic(&mut self, source: &NodeId, target: &NodeId) -> Result<EdgeId> {
        debug!(%source, %target, "FlowDesigner::connect_generic");
        let (source_node, target_node) = match (self.store.node(source), self.store.node(target)) {
            (Some(s), Some(t)) => (s, t),
            (None, _) => return Err(self.reject("connect_generic", GraphError::NodeNotFound(source.clone()))),
            (_, None) => return Err(self.reject("connect_generic", GraphError::NodeNotFound(target.clone()))),
        };

        let label = self.config.flow_label(&source_node.label, &target_node.label);
        // Only table-to-table links are announced
        let notice = (source_node.is_table() && target_node.is_table()).then(|| {
            Notice::new(
                "Relationship created",
                format!(
                    "Relationship between {} and {} has been created",
                    source_node.label, target_node.label
                ),
            )
        });

        let edge = Edge::flow(EdgeId::new(""), source.clone(), target.clone(), label);
        let id = self.attempt("connect_generic", |store| store.add_edge(edge))?;
        info!(%id, %source, %target, "nodes connected");
        self.commit(notice);
        Ok(id)
    }

    /// Add a column-level relationship and flag the target column as a foreign key.
    /// The edge and the column update commit together or not at all.
    pub fn create_relationship(
        &mut self,
        source_table: &NodeId,
        source_column: &str,
        target_table: &NodeId,
        target_column: &str,
    ) -> Result<EdgeId> {
        debug!(%source_table, source_column, %target_table, target_column, "FlowDesigner::create_relationship");
        let rel = match validate_relationship(
            &self.store,
            source_table,
            source_column,
            target_table,
            target_column,
        ) {
            Ok(rel) => rel,
            Err(err) => return Err(self.reject("create_relationship", err.into())),
        };

        let mut columns = self
            .store
            .node(target_table)
            .and_then(Node::columns)
            .map(<[Column]>::to_vec)
            .unwrap_or_default();
        match columns.iter_mut().find(|c| c.name == rel.target_column) {
            Some(column) => column.mark_foreign_key(rel.reference()),
            None => {
                let err = RelationshipError::UnknownColumn {
                    table: target_table.clone(),
                    column: target_column.to_string(),
                };
                return Err(self.reject("create_relationship", err.into()));
            }
        }

        let edge = Edge::relationship(
            EdgeId::new(""),
            source_table.clone(),
            target_table.clone(),
            rel.label(&self.config.flow_arrow),
            RelationshipDetail {
                source_column: rel.source_column.clone(),
                target_column: rel.target_column.clone(),
                cardinality: rel.cardinality,
                description: rel.description(),
            },
        );
        let id = self.attempt("create_relationship", |store| store.add_edge(edge))?;

        if let Err(err) = self.store.update_node_columns(target_table, columns) {
            warn!(%id, error = %err, "column update failed, rolling back relationship edge");
            if let Err(rollback) = self.store.remove_edge(&id) {
                warn!(%id, error = %rollback, "relationship edge rollback failed");
            }
            return Err(self.reject("create_relationship", err));
        }

        info!(%id, reference = %rel.reference(), "relationship created");
        self.commit(Some(Notice::new(
            "Relationship created",
            format!(
                "Relationship from {}.{} to {}.{} has been created.",
                rel.source_label, rel.source_column, rel.target_label, rel.target_column
            ),
        )));
        Ok(id)
    }

    /// Remove a single edge. Foreign-key flags set by a relationship stay as they are.
    pub fn remove_edge(&mut self, id: &EdgeId) -> Result<()> {
        debug!(%id, "FlowDesigner::remove_edge");
        self.attempt("remove_edge", |store| store.remove_edge(id))?;
        info!(%id, "edge removed");
        self.commit(None);
        Ok(())
    }

    // ========== Columns ==========

    /// Replace a table's columns wholesale
    pub fn update_node_columns(&mut self, id: &NodeId, columns: Vec<Column>) -> Result<()> {
        debug!(%id, columns = columns.len(), "FlowDesigner::update_node_columns");
        self.attempt("update_node_columns", |store| store.update_node_columns(id, columns))?;
        self.commit(None);
        Ok(())
    }

    /// Column dialog save: full replace plus a confirmation notice
    pub fn save_columns(&mut self, id: &NodeId, columns: Vec<Column>) -> Result<()> {
        debug!(%id, columns = columns.len(), "FlowDesigner::save_columns");
        self.attempt("save_columns", |store| store.update_node_columns(id, columns))?;
        info!(%id, "columns saved");
        self.commit(Some(Notice::new(
            "Columns updated",
            "Table columns have been successfully updated.",
        )));
        Ok(())
    }

    /// Append a column to a table
    pub fn add_column(&mut self, table: &NodeId, column: Column) -> Result<()> {
        debug!(%table, name = %column.name, "FlowDesigner::add_column");
        if column.name.trim().is_empty() {
            return Err(self.reject("add_column", GraphError::EmptyColumnName));
        }

        let mut columns = match self.table_columns(table) {
            Ok(columns) => columns,
            Err(err) => return Err(self.reject("add_column", err)),
        };
        columns.push(column);
        self.attempt("add_column", |store| store.update_node_columns(table, columns))?;
        self.commit(None);
        Ok(())
    }

    /// Remove the column at `index`, returning it
    pub fn remove_column(&mut self, table: &NodeId, index: usize) -> Result<Column> {
        debug!(%table, index, "FlowDesigner::remove_column");
        let mut columns = match self.table_columns(table) {
            Ok(columns) => columns,
            Err(err) => return Err(self.reject("remove_column", err)),
        };
        if index >= columns.len() {
            let err = GraphError::ColumnIndexOutOfRange {
                table: table.clone(),
                index,
                len: columns.len(),
            };
            return Err(self.reject("remove_column", err));
        }

        let removed = columns.remove(index);
        self.attempt("remove_column", |store| store.update_node_columns(table, columns))?;
        self.commit(None);
        Ok(removed)
    }

    fn table_columns(&self, id: &NodeId) -> Result<Vec<Column>> {
        let node = self
            .store
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        node.columns()
            .map(<[Column]>::to_vec)
            .ok_or_else(|| GraphError::NotATable(id.clone()))
    }

    // ========== Transactions ==========

    /// Run one store mutation; on failure drop anything it buffered
    fn attempt<T>(&mut self, op: &str, f: impl FnOnce(&mut S) -> Result<T>) -> Result<T> {
        f(&mut self.store).map_err(|err| self.reject(op, err))
    }

    fn roll_back_node(&mut self, id: &NodeId) {
        if let Err(err) = self.store.remove_node(id) {
            warn!(%id, error = %err, "node rollback failed");
        }
    }

    /// Discard buffered events and log the rejection
    fn reject(&mut self, op: &str, err: GraphError) -> GraphError {
        let discarded = self.store.take_events().len();
        warn!(op, error = %err, kind = ?err.kind(), discarded, "mutation rejected");
        err
    }

    /// Publish buffered events, then the notice, to every observer
    fn commit(&mut self, notice: Option<Notice>) {
        let events = self.store.take_events();
        for event in &events {
            for observer in self.observers.iter_mut() {
                observer.on_event(event);
            }
        }
        if let Some(notice) = &notice {
            for observer in self.observers.iter_mut() {
                observer.on_notice(notice);
            }
        }

        self.history.extend(events);
        if let Some(limit) = self.config.history_limit {
            if self.history.len() > limit {
                let excess = self.history.len() - limit;
                self.history.drain(..excess);
            }
        }
    }
}
