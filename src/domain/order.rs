//! Task ordering
//!
//! Ties the pieces together for one call:
//!
//! 1. build the [`TaskGraph`] (index by ID, resolve references)
//! 2. resolve every task's group with a fresh [`ProjectResolver`]
//! 3. partition tasks by group, in input order
//! 4. sort group IDs lexicographically
//! 5. sort each group with the [`GroupSorter`] and concatenate
//! 6. apply the [`RollupTable`] to group roots
//!
//! Any failure aborts the call; no partial ordering is returned.

use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::graph::{GraphError, ReferenceMode, TaskGraph};
use super::group::{GroupSorter, SortError};
use super::id::TaskId;
use super::resolver::{ProjectResolver, ResolveError};
use super::rollup::RollupTable;
use super::task::Task;

#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Sort(#[from] SortError),
}

impl OrderError {
    /// Returns true for either kind of circular dependency
    pub fn is_cycle(&self) -> bool {
        matches!(self, OrderError::Resolve(_) | OrderError::Sort(_))
    }
}

/// Orders task lists with a fixed set of options
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskOrderer {
    references: ReferenceMode,
}

impl TaskOrderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how references to unknown task IDs are handled
    pub fn with_references(mut self, references: ReferenceMode) -> Self {
        self.references = references;
        self
    }

    pub fn references(&self) -> ReferenceMode {
        self.references
    }

    /// Orders `tasks` and rolls up project dates
    #[instrument(skip_all, fields(tasks = tasks.len(), references = ?self.references))]
    pub fn order(&self, tasks: Vec<Task>) -> Result<OrderedTasks, OrderError> {
        let (positions, groups, group_keys) = {
            let graph = TaskGraph::build(&tasks, self.references)?;
            let resolution = ProjectResolver::new(&graph).resolve_all()?;

            let mut partitions: BTreeMap<&TaskId, Vec<NodeIndex>> = BTreeMap::new();
            for node in graph.node_indices() {
                partitions
                    .entry(resolution.group_of(node))
                    .or_default()
                    .push(node);
            }

            let sorter = GroupSorter::new(&graph, &resolution);
            let mut positions = Vec::with_capacity(tasks.len());
            let mut group_keys = Vec::with_capacity(partitions.len());

            for (&group, members) in &partitions {
                let sorted = sorter.sort(group, members)?;
                debug!(
                    group = %group,
                    members = members.len(),
                    rooted = sorter.root(group, members).is_some(),
                    "group sorted"
                );
                positions.extend(sorted);
                group_keys.push(group.clone());
            }

            let groups: Vec<TaskId> = positions
                .iter()
                .map(|&node| resolution.group_of(node).clone())
                .collect();

            (positions, groups, group_keys)
        };

        let mut slots: Vec<Option<Task>> = tasks.into_iter().map(Some).collect();
        let ordered: Vec<Task> = positions
            .iter()
            .filter_map(|node| slots[node.index()].take())
            .collect();

        let rollup = RollupTable::compute(ordered.iter().zip(&groups));
        let tasks = rollup.apply(ordered, &groups);

        info!(
            tasks = tasks.len(),
            groups = group_keys.len(),
            "tasks ordered"
        );

        Ok(OrderedTasks {
            tasks,
            groups,
            group_keys,
            rollup,
        })
    }
}

/// Orders `tasks` with default options
///
/// Roots of project groups come back with their rolled-up dates.
pub fn reorder_tasks(tasks: Vec<Task>) -> Result<Vec<Task>, OrderError> {
    TaskOrderer::new().order(tasks).map(OrderedTasks::into_tasks)
}

/// The result of one ordering call
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedTasks {
    tasks: Vec<Task>,
    /// Group ID of `tasks[i]`
    groups: Vec<TaskId>,
    /// Distinct group IDs in output order
    group_keys: Vec<TaskId>,
    rollup: RollupTable,
}

impl OrderedTasks {
    /// Returns the tasks in rendering order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Returns the group ID of the task at `position`
    pub fn group_of(&self, position: usize) -> Option<&TaskId> {
        self.groups.get(position)
    }

    /// Returns the group IDs in output order
    pub fn group_keys(&self) -> &[TaskId] {
        &self.group_keys
    }

    /// Iterates over `(task, group)` pairs in rendering order
    pub fn iter(&self) -> impl Iterator<Item = (&Task, &TaskId)> {
        self.tasks.iter().zip(&self.groups)
    }

    /// Returns the members of a group in rendering order
    pub fn members(&self, group: &TaskId) -> impl Iterator<Item = &Task> + '_ {
        let group = group.clone();
        self.iter()
            .filter(move |(_, g)| **g == group)
            .map(|(task, _)| task)
    }

    /// Returns the structural root of a group, if it has one
    pub fn root(&self, group: &TaskId) -> Option<&Task> {
        self.iter()
            .find(|(task, g)| *g == group && task.is_root_of(group))
            .map(|(task, _)| task)
    }

    /// Returns true if the task at `position` is its group's structural root
    pub fn is_root(&self, position: usize) -> bool {
        match (self.tasks.get(position), self.groups.get(position)) {
            (Some(task), Some(group)) => task.is_root_of(group),
            _ => false,
        }
    }

    pub fn rollup(&self) -> &RollupTable {
        &self.rollup
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Hash of the output order and every task's final range
    ///
    /// Identical inputs always give identical fingerprints, so a caller can
    /// skip re-rendering when a refresh did not change the chart.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for task in &self.tasks {
            hasher.update(task.id.as_str().as_bytes());
            hasher.update(&[0]);
            hasher.update(&task.start.timestamp_millis().to_le_bytes());
            hasher.update(&task.end.timestamp_millis().to_le_bytes());
        }
        hasher.finalize().to_hex()[..16].to_string()
    }
}
