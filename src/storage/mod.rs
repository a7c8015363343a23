//! # Storage Layer
//!
//! Everything that touches the filesystem: configuration, task files and
//! the binding of raw records into tasks.
//!
//! ## Files
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSON array, JSONL or YAML | anywhere, passed on the command line |
//! | Records | same, one object per row | anywhere, read with `--records` |
//! | Config | TOML | `.gantt/config.toml`, `~/.config/gantt-order/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`TaskFile`] takes a shared `fs2` lock for reads and an exclusive one for writes
//! - Writes are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for a `.gantt/` project
//! - [`TaskFile`] - Read/write task and record files
//! - [`RecordBinder`] - Map records to tasks through [`FieldAliases`]
//! - [`Config`] - Project and global configuration

mod config;
mod project;
mod records;
mod tasks;

pub use config::{
    Config, ConfigError, DisplayConfig, EngineConfig, FieldAliases, GlobalConfig, OutputFormat,
    ProjectConfig, ViewMode, PROJECT_DIR,
};
pub use project::{Project, ProjectError};
pub use records::{ExpanderState, Record, RecordBinder, RecordError};
pub use tasks::{FileFormat, TaskFile};
