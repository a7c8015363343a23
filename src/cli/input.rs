//! Shared input handling for commands that read a task file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::domain::{OrderedTasks, ReferenceMode, Task, TaskId, TaskOrderer};
use crate::storage::{Config, ExpanderState, RecordBinder, TaskFile};

/// Arguments naming the task file and how to read it
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Task file (.json, .jsonl, .yaml or .yml)
    pub file: PathBuf,

    /// Read raw records and bind them through the configured field aliases
    #[arg(long)]
    pub records: bool,

    /// Reject references to unknown task IDs
    #[arg(long)]
    pub strict: bool,

    /// Collapse a project's children (repeatable)
    #[arg(long, value_name = "ID")]
    pub collapse: Vec<String>,
}

impl InputArgs {
    /// Loads the tasks, binding records first when `--records` is set
    pub fn load_tasks(&self, config: &Config) -> Result<Vec<Task>> {
        let file = TaskFile::new(&self.file)?;

        let mut tasks = if self.records {
            let records = file.read_records()?;
            let display = &config.project.display;
            let mut expanders = self.expanders();

            RecordBinder::new(&config.project.fields)
                .with_offset_minutes(display.time_offset_minutes)
                .bind(&records, &mut expanders)
                .with_context(|| format!("Failed to bind records from {}", self.file.display()))?
        } else {
            file.read_tasks()?
        };

        if !self.records {
            for task in &mut tasks {
                if self.collapse.iter().any(|id| id == task.id.as_str()) {
                    task.hide_children = Some(true);
                }
            }
        }

        debug!(
            file = %self.file.display(),
            format = ?file.format(),
            count = tasks.len(),
            "loaded tasks"
        );
        Ok(tasks)
    }

    /// Returns the reference mode: `--strict` wins over the configuration
    pub fn references(&self, config: &Config) -> ReferenceMode {
        if self.strict {
            ReferenceMode::Strict
        } else {
            config.project.engine.references
        }
    }

    /// Loads and orders the tasks
    pub fn order(&self, config: &Config) -> Result<OrderedTasks> {
        let tasks = self.load_tasks(config)?;

        TaskOrderer::new()
            .with_references(self.references(config))
            .order(tasks)
            .with_context(|| format!("Failed to order tasks from {}", self.file.display()))
    }

    fn expanders(&self) -> ExpanderState {
        let mut expanders = ExpanderState::new();
        for id in &self.collapse {
            expanders.set_collapsed(TaskId::from(id.as_str()), true);
        }
        expanders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(file: PathBuf) -> InputArgs {
        InputArgs {
            file,
            records: false,
            strict: false,
            collapse: Vec::new(),
        }
    }

    #[test]
    fn strict_flag_overrides_config() {
        let mut config = Config::default();
        let mut input = args(PathBuf::from("tasks.json"));
        assert_eq!(input.references(&config), ReferenceMode::Tolerant);

        config.project.engine.references = ReferenceMode::Strict;
        assert_eq!(input.references(&config), ReferenceMode::Strict);

        config.project.engine.references = ReferenceMode::Tolerant;
        input.strict = true;
        assert_eq!(input.references(&config), ReferenceMode::Strict);
    }

    #[test]
    fn collapse_marks_tasks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[
                {"id": "p", "start": "2024-01-01T00:00:00Z", "end": "2024-01-02T00:00:00Z", "type": "project"},
                {"id": "a", "start": "2024-01-01T00:00:00Z", "end": "2024-01-02T00:00:00Z", "project": "p"}
            ]"#,
        )
        .unwrap();

        let mut input = args(path);
        input.collapse = vec!["p".to_string()];

        let tasks = input.load_tasks(&Config::default()).unwrap();
        assert_eq!(tasks[0].hide_children, Some(true));
        assert_eq!(tasks[1].hide_children, None);
    }

    #[test]
    fn records_are_bound() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");
        fs::write(
            &path,
            concat!(
                r#"{"id":"p","title":"Launch","startTime":"2024-01-01T00:00:00Z","endTime":"2024-01-02T00:00:00Z","taskTypeOption":3}"#,
                "\n",
                r#"{"id":"a","title":"Build","startTime":"2024-01-03T00:00:00Z","endTime":"2024-01-05T00:00:00Z","parentRecord":"p"}"#,
                "\n",
            ),
        )
        .unwrap();

        let mut input = args(path);
        input.records = true;
        input.collapse = vec!["p".to_string()];

        let ordered = input.order(&Config::default()).unwrap();
        let root = ordered.root(&"p".into()).unwrap();
        assert_eq!(root.hide_children, Some(true));
        assert_eq!(root.end, ordered.tasks()[1].end);
    }
}
