//! Record binding
//!
//! Turns rows from a tabular source into [`Task`]s. Columns are looked up
//! through configurable aliases ([`FieldAliases`]); timestamps are shifted
//! into the viewer's timezone; a parent reference becomes either an explicit
//! project (when the parent row is a project) or a single dependency.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::config::FieldAliases;
use crate::domain::{Task, TaskId, TaskKind};

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("Record {record}: invalid {field} timestamp '{value}'")]
    InvalidTimestamp {
        record: String,
        field: String,
        value: String,
    },
}

/// One row of the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    fn number(&self, field: &str) -> Option<f64> {
        match self.fields.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Parent ID, given either as a plain string or as `{"id": "..."}`
    fn reference(&self, field: &str) -> Option<&str> {
        let id = match self.fields.get(field)? {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj.get("id").and_then(Value::as_str),
            _ => None,
        };
        id.filter(|s| !s.trim().is_empty())
    }

    fn kind(&self, aliases: &FieldAliases) -> TaskKind {
        self.number(&aliases.task_type)
            .map(|option| TaskKind::from_option(option as i64))
            .unwrap_or_default()
    }
}

/// Collapsed/expanded state of project rows, kept by the caller across calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpanderState(HashMap<TaskId, bool>);

impl ExpanderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a project's children are hidden (default: shown)
    pub fn is_collapsed(&self, project: &TaskId) -> bool {
        self.0.get(project).copied().unwrap_or(false)
    }

    pub fn set_collapsed(&mut self, project: TaskId, collapsed: bool) {
        self.0.insert(project, collapsed);
    }

    /// Returns the project's state, recording the default for unseen projects
    fn entry(&mut self, project: &TaskId) -> bool {
        *self.0.entry(project.clone()).or_insert(false)
    }
}

/// Maps records to tasks
pub struct RecordBinder<'c> {
    aliases: &'c FieldAliases,
    offset: Duration,
}

impl<'c> RecordBinder<'c> {
    pub fn new(aliases: &'c FieldAliases) -> Self {
        Self {
            aliases,
            offset: Duration::zero(),
        }
    }

    /// Shifts every timestamp by `minutes`
    pub fn with_offset_minutes(mut self, minutes: i64) -> Self {
        self.offset = Duration::minutes(minutes);
        self
    }

    /// Binds `records` in order
    ///
    /// Records without a name, start or end are skipped. Project rows take
    /// their collapsed state from `expanders`, which gains defaults for
    /// projects it has not seen yet.
    pub fn bind(
        &self,
        records: &[Record],
        expanders: &mut ExpanderState,
    ) -> Result<Vec<Task>, RecordError> {
        let by_id: HashMap<&str, &Record> = records.iter().map(|r| (r.id.as_str(), r)).collect();
        let mut tasks = Vec::with_capacity(records.len());

        for record in records {
            let aliases = self.aliases;
            let (Some(name), Some(start), Some(end)) = (
                record.text(&aliases.title),
                record.text(&aliases.start_time),
                record.text(&aliases.end_time),
            ) else {
                debug!(record = %record.id, "record lacks name, start or end, skipped");
                continue;
            };

            let start = self.timestamp(record, &aliases.start_time, start)?;
            let end = self.timestamp(record, &aliases.end_time, end)?;

            let mut task = Task::new(record.id.as_str(), start, end)
                .with_name(name)
                .with_kind(record.kind(aliases));
            task.progress = record.number(&aliases.progress).unwrap_or(0.0);

            if task.kind == TaskKind::Project {
                task.hide_children = Some(expanders.entry(&task.id));
            }

            if let Some(parent_id) = record.reference(&aliases.parent_record) {
                match by_id.get(parent_id) {
                    Some(parent) if parent.kind(aliases) == TaskKind::Project => {
                        task.project = Some(TaskId::from(parent_id));
                    }
                    Some(_) => {
                        task.dependencies = vec![TaskId::from(parent_id)];
                    }
                    None => {
                        debug!(record = %record.id, parent = parent_id, "parent not in record set, ignored");
                    }
                }
            }

            tasks.push(task);
        }

        Ok(tasks)
    }

    fn timestamp(
        &self,
        record: &Record,
        field: &str,
        value: &str,
    ) -> Result<DateTime<Utc>, RecordError> {
        DateTime::parse_from_rfc3339(value)
            .map(|t| t.with_timezone(&Utc) + self.offset)
            .map_err(|_| RecordError::InvalidTimestamp {
                record: record.id.clone(),
                field: field.to_string(),
                value: value.to_string(),
            })
    }
}
