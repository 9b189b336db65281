use crate::{Graph, GraphStore, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Info,
    Warning,
    Error, // blocks pipeline creation
}

/// Validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub message: String,
    pub affected_nodes: Vec<NodeId>,
    pub issue_type: ValidationIssueType,
}

/// Types of validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssueType {
    Cycle,
    IsolatedNode,
    MissingReference,
    StaleForeignKey,
}

/// Complete validation result
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Warning)
    }

    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.with_severity(ValidationSeverity::Error)
    }

    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.with_severity(ValidationSeverity::Warning)
    }

    pub fn info(&self) -> Vec<&ValidationIssue> {
        self.with_severity(ValidationSeverity::Info)
    }

    fn with_severity(&self, severity: ValidationSeverity) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == severity).collect()
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

/// Read-only checks run by the pipeline validation step
pub struct Validator;

impl Validator {
    /// Run all validations on a graph
    pub fn validate(graph: &Graph) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(cycle_nodes) = Self::detect_cycles(graph) {
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Warning,
                message: format!(
                    "Cycle detected in the flow involving {} nodes. Data would loop forever.",
                    cycle_nodes.len()
                ),
                affected_nodes: cycle_nodes,
                issue_type: ValidationIssueType::Cycle,
            });
        }

        let isolated = Self::find_isolated_nodes(graph);
        if !isolated.is_empty() {
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Info,
                message: format!(
                    "{} node(s) are not connected to the rest of the flow.",
                    isolated.len()
                ),
                affected_nodes: isolated,
                issue_type: ValidationIssueType::IsolatedNode,
            });
        }

        Self::check_foreign_keys(graph, &mut result);

        result
    }

    /// Detect cycles in the edge graph using DFS
    fn detect_cycles(graph: &Graph) -> Option<Vec<NodeId>> {
        let mut successors: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        for edge in graph.edges() {
            successors.entry(&edge.source).or_default().push(&edge.target);
        }

        let mut visited = HashSet::new();
        for node in graph.nodes() {
            if visited.contains(&node.id) {
                continue;
            }
            if let Some(cycle) = Self::dfs_detect_cycle(&successors, &node.id, &mut visited) {
                return Some(cycle);
            }
        }

        None
    }

    /// Iterative DFS from `start`; returns the path segment closed by the first back edge.
    /// Depth is bounded by the heap, not the call stack, so long pipelines are fine.
    fn dfs_detect_cycle<'a>(
        successors: &HashMap<&'a NodeId, Vec<&'a NodeId>>,
        start: &'a NodeId,
        visited: &mut HashSet<&'a NodeId>,
    ) -> Option<Vec<NodeId>> {
        let next_of = |id: &NodeId| successors.get(id).map(Vec::as_slice).unwrap_or(&[]).iter();

        visited.insert(start);
        let mut path = vec![start];
        let mut on_path: HashSet<&NodeId> = HashSet::from([start]);
        let mut pending = vec![next_of(start)];

        while let Some(frontier) = pending.last_mut() {
            match frontier.next().copied() {
                Some(target) if on_path.contains(target) => {
                    let from = path.iter().position(|id| *id == target).unwrap_or(0);
                    return Some(path[from..].iter().map(|id| (*id).clone()).collect());
                }
                Some(target) => {
                    if visited.insert(target) {
                        on_path.insert(target);
                        path.push(target);
                        pending.push(next_of(target));
                    }
                }
                None => {
                    pending.pop();
                    if let Some(done) = path.pop() {
                        on_path.remove(done);
                    }
                }
            }
        }

        None
    }

    /// Nodes with no incident edge, when there is more than one node
    fn find_isolated_nodes(graph: &Graph) -> Vec<NodeId> {
        if graph.node_count() < 2 {
            return Vec::new();
        }

        let connected: HashSet<&NodeId> = graph
            .edges()
            .into_iter()
            .flat_map(|e| [&e.source, &e.target])
            .collect();

        graph
            .nodes()
            .into_iter()
            .filter(|n| !connected.contains(&n.id))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Foreign-key columns must name an existing `table.column`
    fn check_foreign_keys(graph: &Graph, result: &mut ValidationResult) {
        for node in graph.table_nodes() {
            let Some(columns) = node.columns() else {
                continue;
            };

            for column in columns.iter().filter(|c| c.is_foreign_key) {
                let Some(reference) = column.references.as_deref() else {
                    result.add_issue(ValidationIssue {
                        severity: ValidationSeverity::Error,
                        message: format!(
                            "{}.{} is a foreign key but does not reference anything",
                            node.label, column.name
                        ),
                        affected_nodes: vec![node.id.clone()],
                        issue_type: ValidationIssueType::MissingReference,
                    });
                    continue;
                };

                let resolves = column
                    .reference_target()
                    .and_then(|(table, col)| graph.table_by_label(table)?.column(col))
                    .is_some();
                if !resolves {
                    result.add_issue(ValidationIssue {
                        severity: ValidationSeverity::Warning,
                        message: format!(
                            "{}.{} references {}, which is not in the flow",
                            node.label, column.name, reference
                        ),
                        affected_nodes: vec![node.id.clone()],
                        issue_type: ValidationIssueType::StaleForeignKey,
                    });
                }
            }
        }
    }
}

/// Extension trait for Graph to add validation
pub trait ValidatedGraph {
    fn validate(&self) -> ValidationResult;

    /// Highest severity reported for each affected node
    fn nodes_with_issues(&self, result: &ValidationResult) -> HashMap<NodeId, ValidationSeverity>;
}

impl ValidatedGraph for Graph {
    fn validate(&self) -> ValidationResult {
        Validator::validate(self)
    }

    fn nodes_with_issues(&self, result: &ValidationResult) -> HashMap<NodeId, ValidationSeverity> {
        let mut nodes = HashMap::new();

        for issue in &result.issues {
            for node_id in &issue.affected_nodes {
                nodes
                    .entry(node_id.clone())
                    .and_modify(|severity| {
                        if issue.severity > *severity {
                            *severity = issue.severity;
                        }
                    })
                    .or_insert(issue.severity);
            }
        }

        nodes
    }
}
