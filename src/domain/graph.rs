//! Dependency graph over one input task list
//!
//! Every task becomes a node, added in input order, so a node index doubles
//! as the task's position in the input slice. Every dependency reference that
//! names a task in the list becomes an edge `task -> predecessor`. Dangling
//! references are dropped or rejected depending on [`ReferenceMode`].

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use super::id::TaskId;
use super::task::Task;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Duplicate task ID: {0}")]
    DuplicateTask(TaskId),

    #[error("Task {task} references unknown task {reference}")]
    MissingReference { task: TaskId, reference: TaskId },
}

/// How references to IDs absent from the input are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// Dangling dependencies are ignored; a dangling project is still a group key
    #[default]
    Tolerant,
    /// The first dangling reference fails the call
    Strict,
}

/// A dependency graph for one ordering call
#[derive(Debug)]
pub struct TaskGraph<'a> {
    tasks: &'a [Task],

    /// Edges point from a task to its predecessor
    graph: DiGraph<&'a TaskId, ()>,

    node_map: HashMap<&'a TaskId, NodeIndex>,
}

impl<'a> TaskGraph<'a> {
    /// Builds the graph for `tasks`
    pub fn build(tasks: &'a [Task], mode: ReferenceMode) -> Result<Self, GraphError> {
        let mut graph = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut node_map = HashMap::with_capacity(tasks.len());

        // First pass: one node per task, in input order
        for task in tasks {
            let idx = graph.add_node(&task.id);
            if node_map.insert(&task.id, idx).is_some() {
                return Err(GraphError::DuplicateTask(task.id.clone()));
            }
        }

        // Second pass: edges for references that resolve
        for (position, task) in tasks.iter().enumerate() {
            let task_idx = NodeIndex::new(position);

            if let Some(project) = &task.project {
                if !node_map.contains_key(project) {
                    if mode == ReferenceMode::Strict {
                        return Err(GraphError::MissingReference {
                            task: task.id.clone(),
                            reference: project.clone(),
                        });
                    }
                    debug!(task = %task.id, project = %project, "project not in input, kept as group key");
                }
            }

            for dep_id in &task.dependencies {
                match node_map.get(dep_id) {
                    Some(&dep_idx) => {
                        graph.add_edge(task_idx, dep_idx, ());
                    }
                    None if mode == ReferenceMode::Strict => {
                        return Err(GraphError::MissingReference {
                            task: task.id.clone(),
                            reference: dep_id.clone(),
                        });
                    }
                    None => {
                        debug!(task = %task.id, dependency = %dep_id, "dependency not in input, ignored");
                    }
                }
            }
        }

        Ok(Self {
            tasks,
            graph,
            node_map,
        })
    }

    /// Returns the task behind a node
    pub fn task(&self, node: NodeIndex) -> &'a Task {
        &self.tasks[node.index()]
    }

    /// Returns the input slice the graph was built from
    pub fn tasks(&self) -> &'a [Task] {
        self.tasks
    }

    /// Returns the node for a task ID
    pub fn index_of(&self, task_id: &TaskId) -> Option<NodeIndex> {
        self.node_map.get(task_id).copied()
    }

    /// Returns the predecessors of a node in declaration order
    ///
    /// Duplicate declarations yield duplicate entries.
    pub fn dependencies(&self, node: NodeIndex) -> Vec<NodeIndex> {
        // petgraph lists the most recently added edge first
        let mut deps: Vec<_> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        deps.reverse();
        deps
    }

    /// Returns the nodes that declare `node` as a dependency
    pub fn dependents(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut dependents: Vec<_> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .filter(|&other| other != node)
            .collect();
        dependents.sort();
        dependents.dedup();
        dependents
    }

    /// Graph-backed equivalent of [`super::task::is_dependent`]
    pub fn is_dependent(&self, node: NodeIndex) -> bool {
        self.task(node).project.is_some()
            || self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .any(|other| other != node)
    }

    /// Iterates over all nodes in input order
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Returns the number of resolved dependency edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
