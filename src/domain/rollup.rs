//! Project date roll-up
//!
//! Computes the earliest start and latest end across every member of each
//! group and applies that range to the group's structural root. Non-root
//! tasks are never touched. A group without a structural root still gets a
//! table entry, which is simply not applied anywhere.

use serde::Serialize;
use std::collections::BTreeMap;

use super::id::TaskId;
use super::task::{DateRange, Task};

/// Aggregate range per group ID
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RollupTable {
    ranges: BTreeMap<TaskId, DateRange>,
}

impl RollupTable {
    /// Builds the table from `(task, group)` pairs
    pub fn compute<'t, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'t Task, &'t TaskId)>,
    {
        let mut ranges: BTreeMap<TaskId, DateRange> = BTreeMap::new();

        for (task, group) in entries {
            match ranges.get_mut(group) {
                Some(range) => range.widen(task.range()),
                None => {
                    ranges.insert(group.clone(), task.range());
                }
            }
        }

        Self { ranges }
    }

    /// Returns the aggregate range of a group
    pub fn range(&self, group: &TaskId) -> Option<DateRange> {
        self.ranges.get(group).copied()
    }

    /// Iterates over groups in ID order
    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &DateRange)> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Replaces the dates of every structural root with its group's range
    ///
    /// `groups[i]` is the group of `tasks[i]`. Roots are rebuilt with
    /// [`Task::with_range`]; every other task passes through unchanged.
    pub fn apply(&self, tasks: Vec<Task>, groups: &[TaskId]) -> Vec<Task> {
        tasks
            .into_iter()
            .zip(groups)
            .map(|(task, group)| match self.range(group) {
                Some(range) if task.is_root_of(group) => task.with_range(range),
                _ => task,
            })
            .collect()
    }
}
