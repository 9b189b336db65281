use crate::{EdgeId, EdgeKind, NodeId, NodeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A graph event with timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEvent {
    pub timestamp: DateTime<Utc>,
    pub event: EventType,
}

impl GraphEvent {
    /// Create a new event with the current timestamp
    pub fn new(event: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Structural changes to the graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventType {
    NodeAdded {
        id: NodeId,
        label: String,
        kind: NodeKind,
    },

    NodeRemoved {
        id: NodeId,
    },

    EdgeAdded {
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        kind: EdgeKind,
    },

    EdgeRemoved {
        id: EdgeId,
        source: NodeId,
        target: NodeId,
    },

    /// A table's column list was replaced
    ColumnsUpdated {
        id: NodeId,
        columns: usize,
    },
}

/// Human-readable confirmation of a completed operation (toast equivalent)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Receives committed changes from a [`crate::FlowDesigner`]
pub trait GraphObserver {
    fn on_event(&mut self, event: &GraphEvent);

    fn on_notice(&mut self, _notice: &Notice) {}
}

impl<F> GraphObserver for F
where
    F: FnMut(&GraphEvent),
{
    fn on_event(&mut self, event: &GraphEvent) {
        self(event)
    }
}
