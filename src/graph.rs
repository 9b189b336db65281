use crate::column::check_columns;
use crate::{
    Column, DesignerConfig, Edge, EdgeId, EdgeKind, EventType, GraphError, GraphEvent,
    IdGenerator, Node, NodeId, NodeKind, Result,
};
use std::collections::HashMap;
use tracing::debug;

/// Authoritative node/edge storage for one flow-design session.
///
/// Every mutation either succeeds completely or leaves the store untouched.
/// Successful mutations buffer their events until [`GraphStore::take_events`]
/// is called, so a caller composing several mutations can publish or discard
/// them as a unit.
pub trait GraphStore {
    fn node(&self, id: &NodeId) -> Option<&Node>;

    fn edge(&self, id: &EdgeId) -> Option<&Edge>;

    /// All nodes in insertion order
    fn nodes(&self) -> Vec<&Node>;

    /// All edges in insertion order
    fn edges(&self) -> Vec<&Edge>;

    /// Insert a node, assigning an id when `node.id` is empty
    fn add_node(&mut self, node: Node) -> Result<NodeId>;

    /// Remove a node and every edge incident to it
    fn remove_node(&mut self, id: &NodeId) -> Result<Node>;

    /// Replace a table node's column list
    fn update_node_columns(&mut self, id: &NodeId, columns: Vec<Column>) -> Result<()>;

    /// Insert an edge between existing nodes, assigning an id when `edge.id` is empty
    fn add_edge(&mut self, edge: Edge) -> Result<EdgeId>;

    fn remove_edge(&mut self, id: &EdgeId) -> Result<Edge>;

    /// Drain events buffered since the last call
    fn take_events(&mut self) -> Vec<GraphEvent>;

    fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge(id).is_some()
    }
}

/// In-memory graph of table/transformation nodes and directed edges
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,

    /// Insertion order of `nodes`
    node_order: Vec<NodeId>,

    edges: HashMap<EdgeId, Edge>,

    /// Insertion order of `edges`
    edge_order: Vec<EdgeId>,

    ids: IdGenerator,

    /// Events not yet handed to the caller
    pending: Vec<GraphEvent>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::with_config(&DesignerConfig::default())
    }

    pub fn with_config(config: &DesignerConfig) -> Self {
        Self {
            nodes: HashMap::new(),
            node_order: Vec::new(),
            edges: HashMap::new(),
            edge_order: Vec::new(),
            ids: IdGenerator::new(config.id_strategy),
            pending: Vec::new(),
        }
    }

    // ========== Queries ==========

    /// Get all edges starting from a node
    pub fn outgoing_edges(&self, from: &NodeId) -> Vec<&Edge> {
        self.ordered_edges().filter(|e| e.starts_from(from)).collect()
    }

    /// Get all edges ending at a node
    pub fn incoming_edges(&self, to: &NodeId) -> Vec<&Edge> {
        self.ordered_edges().filter(|e| e.ends_at(to)).collect()
    }

    /// Table nodes in insertion order
    pub fn table_nodes(&self) -> Vec<&Node> {
        self.ordered_nodes().filter(|n| n.is_table()).collect()
    }

    /// Find a table node by its display label
    pub fn table_by_label(&self, label: &str) -> Option<&Node> {
        self.ordered_nodes()
            .find(|n| n.is_table() && n.label == label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn ordered_nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    fn ordered_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edge_order.iter().filter_map(|id| self.edges.get(id))
    }

    // ========== Id allocation ==========

    fn fresh_node_id(&mut self, kind: NodeKind) -> NodeId {
        let prefix = match kind {
            NodeKind::Table => "table",
            NodeKind::Transformation => "transformation",
        };
        loop {
            let id = NodeId::new(self.ids.next(prefix));
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    fn fresh_edge_id(&mut self, kind: EdgeKind) -> EdgeId {
        let prefix = match kind {
            EdgeKind::GenericFlow => "edge",
            EdgeKind::Relationship => "rel",
        };
        loop {
            let id = EdgeId::new(self.ids.next(prefix));
            if !self.edges.contains_key(&id) {
                return id;
            }
        }
    }

    // ========== Event Logging ==========

    fn log_event(&mut self, event: EventType) {
        self.pending.push(GraphEvent::new(event));
    }
}

impl GraphStore for Graph {
    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    fn nodes(&self) -> Vec<&Node> {
        self.ordered_nodes().collect()
    }

    fn edges(&self) -> Vec<&Edge> {
        self.ordered_edges().collect()
    }

    fn add_node(&mut self, mut node: Node) -> Result<NodeId> {
        if node.id.is_empty() {
            node.id = self.fresh_node_id(node.kind());
        } else if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateNodeId(node.id));
        }
        if let Some(columns) = node.columns() {
            check_columns(&node.id, columns)?;
        }

        let id = node.id.clone();
        debug!(%id, label = %node.label, kind = ?node.kind(), "Graph::add_node");

        self.log_event(EventType::NodeAdded {
            id: id.clone(),
            label: node.label.clone(),
            kind: node.kind(),
        });
        self.node_order.push(id.clone());
        self.nodes.insert(id.clone(), node);

        Ok(id)
    }

    fn remove_node(&mut self, id: &NodeId) -> Result<Node> {
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        self.node_order.retain(|n| n != id);

        // Cascade: every edge touching the node goes with it
        let incident: Vec<EdgeId> = self
            .ordered_edges()
            .filter(|e| e.involves(id))
            .map(|e| e.id.clone())
            .collect();
        let mut removed = Vec::with_capacity(incident.len());
        for edge_id in &incident {
            if let Some(edge) = self.edges.remove(edge_id) {
                removed.push(edge);
            }
        }
        self.edge_order.retain(|e| !incident.contains(e));

        debug!(%id, cascaded = removed.len(), "Graph::remove_node");

        self.log_event(EventType::NodeRemoved { id: id.clone() });
        for edge in removed {
            self.log_event(EventType::EdgeRemoved {
                id: edge.id,
                source: edge.source,
                target: edge.target,
            });
        }

        Ok(node)
    }

    fn update_node_columns(&mut self, id: &NodeId, columns: Vec<Column>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        let current = node
            .columns_mut()
            .ok_or_else(|| GraphError::NotATable(id.clone()))?;
        check_columns(id, &columns)?;

        let count = columns.len();
        *current = columns;
        debug!(%id, columns = count, "Graph::update_node_columns");

        self.log_event(EventType::ColumnsUpdated {
            id: id.clone(),
            columns: count,
        });

        Ok(())
    }

    fn add_edge(&mut self, mut edge: Edge) -> Result<EdgeId> {
        if !self.nodes.contains_key(&edge.source) {
            return Err(GraphError::NodeNotFound(edge.source));
        }
        if !self.nodes.contains_key(&edge.target) {
            return Err(GraphError::NodeNotFound(edge.target));
        }
        if edge.id.is_empty() {
            edge.id = self.fresh_edge_id(edge.kind);
        } else if self.edges.contains_key(&edge.id) {
            return Err(GraphError::DuplicateEdgeId(edge.id));
        }

        let id = edge.id.clone();
        debug!(%id, source = %edge.source, target = %edge.target, kind = ?edge.kind, "Graph::add_edge");

        self.log_event(EventType::EdgeAdded {
            id: id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            kind: edge.kind,
        });
        self.edge_order.push(id.clone());
        self.edges.insert(id.clone(), edge);

        Ok(id)
    }

    fn remove_edge(&mut self, id: &EdgeId) -> Result<Edge> {
        let edge = self
            .edges
            .remove(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;
        self.edge_order.retain(|e| e != id);

        debug!(%id, "Graph::remove_edge");

        self.log_event(EventType::EdgeRemoved {
            id: id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
        });

        Ok(edge)
    }

    fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.pending)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
