//! Project resolution
//!
//! Determines the effective project (group ID) of every task:
//!
//! 1. An explicit `project` is the group ID, whether or not it names a task
//!    in the input.
//! 2. Otherwise the group of the dependency with the latest `end` is adopted
//!    (first declared wins ties). Only dependencies present in the graph count.
//! 3. Otherwise the task is its own group root.
//!
//! Resolution is an iterative depth-first walk with an explicit stack, so deep
//! dependency chains do not grow the call stack. A node is either unvisited,
//! on the current resolution path, or settled (memoized). Meeting a node that
//! is on the current path is a cycle. Settled nodes are never re-entered, so
//! independent branches that share an ancestor are fine and the whole input
//! resolves in O(n + e).

use petgraph::graph::NodeIndex;
use thiserror::Error;
use tracing::trace;

use super::graph::TaskGraph;
use super::id::{join_path, TaskId};

#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("Circular dependency detected involving {id} ({})", join_path(.path))]
    CircularDependency { id: TaskId, path: Vec<TaskId> },
}

/// One task whose dependencies are being resolved
struct Frame {
    node: NodeIndex,
    deps: Vec<NodeIndex>,
    next: usize,
    /// Settled dependency with the latest end so far
    latest: Option<NodeIndex>,
}

/// Memoizing resolver scoped to one graph
pub struct ProjectResolver<'g, 'a> {
    graph: &'g TaskGraph<'a>,
    groups: Vec<Option<TaskId>>,
    on_path: Vec<bool>,
}

impl<'g, 'a> ProjectResolver<'g, 'a> {
    pub fn new(graph: &'g TaskGraph<'a>) -> Self {
        Self {
            graph,
            groups: vec![None; graph.len()],
            on_path: vec![false; graph.len()],
        }
    }

    /// Resolves the group ID of a single task
    pub fn resolve(&mut self, node: NodeIndex) -> Result<TaskId, ResolveError> {
        if let Some(group) = &self.groups[node.index()] {
            return Ok(group.clone());
        }

        let mut stack = vec![self.enter(node)];

        while let Some(frame) = stack.last_mut() {
            match frame.deps.get(frame.next).copied() {
                Some(dep) if self.groups[dep.index()].is_some() => {
                    frame.observe(dep, self.graph);
                    frame.next += 1;
                }
                Some(dep) if self.on_path[dep.index()] => {
                    return Err(self.cycle(&stack, dep));
                }
                Some(dep) => {
                    let child = self.enter(dep);
                    stack.push(child);
                }
                None => {
                    let group = self.settle(frame);
                    stack.pop();
                    if stack.is_empty() {
                        return Ok(group);
                    }
                }
            }
        }

        unreachable!("resolution stack drained before settling {}", self.graph.task(node).id)
    }

    /// Resolves every task and hands back the memo table
    pub fn resolve_all(mut self) -> Result<Resolution, ResolveError> {
        let mut groups = Vec::with_capacity(self.graph.len());
        for node in self.graph.node_indices() {
            groups.push(self.resolve(node)?);
        }
        Ok(Resolution { groups })
    }

    fn enter(&mut self, node: NodeIndex) -> Frame {
        self.on_path[node.index()] = true;

        // An explicit project short-circuits inference
        let deps = if self.graph.task(node).project.is_some() {
            Vec::new()
        } else {
            self.graph.dependencies(node)
        };

        Frame {
            node,
            deps,
            next: 0,
            latest: None,
        }
    }

    fn settle(&mut self, frame: &Frame) -> TaskId {
        let task = self.graph.task(frame.node);

        let group = match (&task.project, frame.latest) {
            (Some(project), _) => project.clone(),
            (None, Some(dep)) => self.groups[dep.index()]
                .clone()
                .unwrap_or_else(|| task.id.clone()),
            (None, None) => task.id.clone(),
        };

        trace!(task = %task.id, group = %group, "resolved");

        self.on_path[frame.node.index()] = false;
        self.groups[frame.node.index()] = Some(group.clone());
        group
    }

    fn cycle(&self, stack: &[Frame], repeated: NodeIndex) -> ResolveError {
        let mut path: Vec<TaskId> = stack
            .iter()
            .map(|frame| self.graph.task(frame.node).id.clone())
            .collect();
        let id = self.graph.task(repeated).id.clone();
        path.push(id.clone());

        ResolveError::CircularDependency { id, path }
    }
}

impl Frame {
    fn observe(&mut self, dep: NodeIndex, graph: &TaskGraph<'_>) {
        let end = graph.task(dep).end;
        let later = match self.latest {
            Some(current) => end > graph.task(current).end,
            None => true,
        };
        if later {
            self.latest = Some(dep);
        }
    }
}

/// Group ID of every task, indexed by node
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    groups: Vec<TaskId>,
}

impl Resolution {
    /// Returns the group ID of a task
    pub fn group_of(&self, node: NodeIndex) -> &TaskId {
        &self.groups[node.index()]
    }

    /// Returns all group IDs in input order
    pub fn groups(&self) -> &[TaskId] {
        &self.groups
    }

    /// Returns true if both tasks resolved to the same group
    pub fn same_group(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.groups[a.index()] == self.groups[b.index()]
    }
}
