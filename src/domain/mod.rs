//! Domain models and the ordering engine
//!
//! Pure, synchronous and free of I/O. Everything here works on one in-memory
//! task list per call; no state survives between calls.

mod id;
mod task;
mod graph;
mod resolver;
mod group;
mod rollup;
mod order;

pub use id::TaskId;
pub use task::{is_dependent, DateRange, Task, TaskKind};
pub use graph::{GraphError, ReferenceMode, TaskGraph};
pub use resolver::{ProjectResolver, Resolution, ResolveError};
pub use group::{GroupSorter, SortError};
pub use rollup::RollupTable;
pub use order::{reorder_tasks, OrderError, OrderedTasks, TaskOrderer};
