//! Task domain model
//!
//! A task is a schedulable unit with a time range, an optional explicit
//! parent ("project") and an optional list of predecessors. Tasks arrive as a
//! flat, unordered list; hierarchy is derived by the resolver, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::id::TaskId;

/// Display type of a task
///
/// Informational only. Whether a task acts as a project root is decided
/// structurally by the resolver, not by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    #[default]
    Task,
    Milestone,
    Project,
}

impl TaskKind {
    /// Maps a numeric option-set value (`1` task, `2` milestone, `3` project)
    ///
    /// Unknown values fall back to [`TaskKind::Task`].
    pub fn from_option(option: i64) -> Self {
        match option {
            2 => TaskKind::Milestone,
            3 => TaskKind::Project,
            _ => TaskKind::Task,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Task => "task",
            TaskKind::Milestone => "milestone",
            TaskKind::Project => "project",
        }
    }
}

/// A start/end pair
///
/// No `start <= end` invariant is enforced; callers may hand over inverted ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Extends the range to the earliest start and the latest end of both
    pub fn widen(&mut self, other: DateRange) {
        if other.start < self.start {
            self.start = other.start;
        }
        if other.end > self.end {
            self.end = other.end;
        }
    }
}

/// A task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique ID within the input list
    pub id: TaskId,

    /// Display name
    #[serde(default)]
    pub name: String,

    pub start: DateTime<Utc>,

    pub end: DateTime<Utc>,

    /// Completion percentage (0-100)
    #[serde(default)]
    pub progress: f64,

    #[serde(rename = "type", default)]
    pub kind: TaskKind,

    /// Explicit parent project
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub project: Option<TaskId>,

    /// Predecessors, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,

    /// Collapsed state for project rows (None for non-projects)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_children: Option<bool>,
}

/// Empty project references mean "no project"
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<TaskId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<TaskId> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|id| !id.is_blank()))
}

impl Task {
    /// Creates a plain task with the given range and no relationships
    pub fn new(id: impl Into<TaskId>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            start,
            end,
            progress: 0.0,
            kind: TaskKind::Task,
            project: None,
            dependencies: Vec::new(),
            hide_children: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_project(mut self, project: impl Into<TaskId>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_dependencies<I, T>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    /// Returns a copy of the task carrying `range` instead of its own dates
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.start = range.start;
        self.end = range.end;
        self
    }

    /// Returns true if this task is the structural root of `group`:
    /// its own ID is the group ID and it declares no explicit project.
    pub fn is_root_of(&self, group: &TaskId) -> bool {
        self.project.is_none() && &self.id == group
    }

    /// Returns true if `id` appears in the dependency list
    pub fn depends_on(&self, id: &TaskId) -> bool {
        self.dependencies.contains(id)
    }
}

/// Returns true if `task` should be presented as a dependent row
///
/// A task is dependent when it declares an explicit project or when any
/// other task in `tasks` lists it as a dependency.
pub fn is_dependent(task: &Task, tasks: &[Task]) -> bool {
    if task.project.is_some() {
        return true;
    }

    tasks
        .iter()
        .any(|other| other.id != task.id && other.depends_on(&task.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn kind_from_option() {
        assert_eq!(TaskKind::from_option(1), TaskKind::Task);
        assert_eq!(TaskKind::from_option(2), TaskKind::Milestone);
        assert_eq!(TaskKind::from_option(3), TaskKind::Project);
        assert_eq!(TaskKind::from_option(0), TaskKind::Task);
        assert_eq!(TaskKind::from_option(99), TaskKind::Task);
    }

    #[test]
    fn widen_range() {
        let mut range = DateRange::new(day(3), day(5));
        range.widen(DateRange::new(day(1), day(4)));
        range.widen(DateRange::new(day(4), day(10)));

        assert_eq!(range, DateRange::new(day(1), day(10)));
    }

    #[test]
    fn widen_keeps_inverted_ranges_per_bound() {
        let mut range = DateRange::new(day(5), day(2));
        range.widen(DateRange::new(day(6), day(1)));

        assert_eq!(range.start, day(5));
        assert_eq!(range.end, day(2));
    }

    #[test]
    fn root_of_group() {
        let root = Task::new("P1", day(1), day(2));
        let child = Task::new("T1", day(1), day(2)).with_project("P1");
        let pinned = Task::new("P1", day(1), day(2)).with_project("P0");

        assert!(root.is_root_of(&"P1".into()));
        assert!(!child.is_root_of(&"P1".into()));
        assert!(!pinned.is_root_of(&"P1".into()));
    }

    #[test]
    fn dependent_by_project() {
        let child = Task::new("T1", day(1), day(2)).with_project("P1");
        assert!(is_dependent(&child, &[]));
    }

    #[test]
    fn dependent_by_reference() {
        let a = Task::new("A", day(1), day(2));
        let b = Task::new("B", day(2), day(3)).with_dependencies(["A"]);
        let tasks = vec![a.clone(), b.clone()];

        assert!(is_dependent(&a, &tasks));
        assert!(!is_dependent(&b, &tasks));
    }

    #[test]
    fn self_reference_is_not_dependent() {
        let a = Task::new("A", day(1), day(2)).with_dependencies(["A"]);
        assert!(!is_dependent(&a, std::slice::from_ref(&a)));
    }

    #[test]
    fn deserialize_minimal_task() {
        let json = r#"{"id":"T1","start":"2024-03-01T00:00:00Z","end":"2024-03-02T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id.as_str(), "T1");
        assert_eq!(task.kind, TaskKind::Task);
        assert!(task.project.is_none());
        assert!(task.dependencies.is_empty());
    }

    #[test]
    fn blank_project_is_none() {
        let json = r#"{"id":"T1","start":"2024-03-01T00:00:00Z","end":"2024-03-02T00:00:00Z","project":""}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.project.is_none());

        let json = r#"{"id":"T1","start":"2024-03-01T00:00:00Z","end":"2024-03-02T00:00:00Z","project":null}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.project.is_none());
    }

    #[test]
    fn serialize_uses_type_key() {
        let task = Task::new("M1", day(1), day(1)).with_kind(TaskKind::Milestone);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["type"], "milestone");
        assert!(json.get("project").is_none());
        assert!(json.get("dependencies").is_none());
    }
}
