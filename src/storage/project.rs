//! Project management
//!
//! A project is any directory holding a `.gantt/` folder. It only carries
//! configuration; task files live wherever the user keeps them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::{Config, PROJECT_DIR};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a gantt project. Run 'gantt init' first.")]
    NotInProject,
}

/// A gantt project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(PROJECT_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Initializes a new project at the given path
    ///
    /// Existing configuration is left untouched.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let gantt_dir = root.join(PROJECT_DIR);

        fs::create_dir_all(&gantt_dir).with_context(|| {
            format!("Failed to create {} directory: {}", PROJECT_DIR, gantt_dir.display())
        })?;

        let config_path = Config::project_config_path(&root);
        if !config_path.exists() {
            let default_config = r#"# gantt-order configuration

[engine]
# "tolerant" ignores dependencies on unknown tasks, "strict" rejects them
references = "tolerant"

[display]
# quarter_day, half_day, day, week or month
view_mode = "day"
time_offset_minutes = 0
include_time = false
bar_width = 60

# Column aliases used by --records
[fields]
title = "title"
start_time = "startTime"
end_time = "endTime"
progress = "progress"
task_type = "taskTypeOption"
parent_record = "parentRecord"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .gantt directory path
    pub fn gantt_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
