//! Per-group topological ordering
//!
//! A group's structural root (own ID equals the group ID, no explicit
//! project) is always emitted first. The remaining members follow in
//! depth-first post-order over intra-group dependency edges, visiting
//! members in input order and each member's dependencies in declaration
//! order. Edges that leave the group only influenced grouping and are
//! ignored here.

use petgraph::graph::NodeIndex;
use thiserror::Error;

use super::graph::TaskGraph;
use super::id::{join_path, TaskId};
use super::resolver::Resolution;

#[derive(Debug, Error, PartialEq)]
pub enum SortError {
    #[error("Circular dependency in task group {group} involving {id} ({})", join_path(.path))]
    CircularDependency {
        id: TaskId,
        group: TaskId,
        path: Vec<TaskId>,
    },
}

struct Visit {
    node: NodeIndex,
    deps: Vec<NodeIndex>,
    next: usize,
}

/// Sorts the members of one group at a time
pub struct GroupSorter<'r, 'a> {
    graph: &'r TaskGraph<'a>,
    resolution: &'r Resolution,
}

impl<'r, 'a> GroupSorter<'r, 'a> {
    pub fn new(graph: &'r TaskGraph<'a>, resolution: &'r Resolution) -> Self {
        Self { graph, resolution }
    }

    /// Returns the structural root of `group` among `members`, if any
    pub fn root(&self, group: &TaskId, members: &[NodeIndex]) -> Option<NodeIndex> {
        members
            .iter()
            .copied()
            .find(|&member| self.graph.task(member).is_root_of(group))
    }

    /// Orders `members`, all of which resolved to `group`, given in input order
    pub fn sort(&self, group: &TaskId, members: &[NodeIndex]) -> Result<Vec<NodeIndex>, SortError> {
        let mut order = Vec::with_capacity(members.len());
        let mut done = vec![false; self.graph.len()];
        let mut on_path = vec![false; self.graph.len()];

        if let Some(root) = self.root(group, members) {
            order.push(root);
            done[root.index()] = true;
        }

        for &member in members {
            if done[member.index()] {
                continue;
            }

            on_path[member.index()] = true;
            let mut stack = vec![self.visit(member)];

            while let Some(frame) = stack.last_mut() {
                match frame.deps.get(frame.next).copied() {
                    Some(dep) => {
                        frame.next += 1;
                        if done[dep.index()] {
                            continue;
                        }
                        if on_path[dep.index()] {
                            return Err(self.cycle(group, &stack, dep));
                        }
                        on_path[dep.index()] = true;
                        stack.push(self.visit(dep));
                    }
                    None => {
                        let node = frame.node;
                        stack.pop();
                        on_path[node.index()] = false;
                        done[node.index()] = true;
                        order.push(node);
                    }
                }
            }
        }

        Ok(order)
    }

    fn visit(&self, node: NodeIndex) -> Visit {
        let deps = self
            .graph
            .dependencies(node)
            .into_iter()
            .filter(|&dep| self.resolution.same_group(node, dep))
            .collect();

        Visit { node, deps, next: 0 }
    }

    fn cycle(&self, group: &TaskId, stack: &[Visit], repeated: NodeIndex) -> SortError {
        let id = self.graph.task(repeated).id.clone();
        let mut path: Vec<TaskId> = stack
            .iter()
            .map(|visit| self.graph.task(visit.node).id.clone())
            .skip_while(|visited| visited != &id)
            .collect();
        path.push(id.clone());

        SortError::CircularDependency {
            id,
            group: group.clone(),
            path,
        }
    }
}
