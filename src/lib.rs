//! gantt-order - task ordering for Gantt charts
//!
//! Takes a flat list of tasks with optional parent projects and
//! predecessors, partitions it into project groups, orders each group so a
//! task never precedes its predecessors, and rolls the group's dates up into
//! its root task.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use gantt_order::{reorder_tasks, Task};
//!
//! let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
//! let tasks = vec![
//!     Task::new("b", day(3), day(5)).with_dependencies(["a"]),
//!     Task::new("a", day(1), day(2)),
//! ];
//!
//! let ordered = reorder_tasks(tasks).unwrap();
//! let ids: Vec<&str> = ordered.iter().map(|t| t.id.as_str()).collect();
//! assert_eq!(ids, ["a", "b"]);
//! assert_eq!(ordered[0].end, day(5));
//! ```

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{
    is_dependent, reorder_tasks, OrderError, OrderedTasks, ReferenceMode, Task, TaskId, TaskKind,
    TaskOrderer,
};
