//! Configuration handling
//!
//! Configuration is stored in `.gantt/config.toml` (project) and
//! `~/.config/gantt-order/config.toml` (global). Command-line flags take
//! precedence over both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Duration;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ReferenceMode;

/// Name of the per-project directory
pub const PROJECT_DIR: &str = ".gantt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Time span covered by one chart cell
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    QuarterDay,
    HalfDay,
    #[default]
    Day,
    Week,
    Month,
}

impl ViewMode {
    /// Duration of one chart cell
    pub fn cell(&self) -> Duration {
        match self {
            ViewMode::QuarterDay => Duration::hours(6),
            ViewMode::HalfDay => Duration::hours(12),
            ViewMode::Day => Duration::days(1),
            ViewMode::Week => Duration::days(7),
            ViewMode::Month => Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::QuarterDay => "quarter_day",
            ViewMode::HalfDay => "half_day",
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
        }
    }
}

/// Output format for commands
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Ordering engine settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// How references to unknown task IDs are handled
    pub references: ReferenceMode,
}

/// Chart and table rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Default chart scale
    pub view_mode: ViewMode,

    /// Minutes added to every record timestamp (viewer timezone offset)
    pub time_offset_minutes: i64,

    /// Show times next to dates
    pub include_time: bool,

    /// Maximum number of chart cells per row
    pub bar_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Day,
            time_offset_minutes: 0,
            include_time: false,
            bar_width: 60,
        }
    }
}

/// Column aliases used when binding raw records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldAliases {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub progress: String,
    pub task_type: String,
    pub parent_record: String,
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            title: "title".to_string(),
            start_time: "startTime".to_string(),
            end_time: "endTime".to_string(),
            progress: "progress".to_string(),
            task_type: "taskTypeOption".to_string(),
            parent_record: "parentRecord".to_string(),
        }
    }
}

impl FieldAliases {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("title", self.title.as_str()),
            ("start_time", self.start_time.as_str()),
            ("end_time", self.end_time.as_str()),
            ("progress", self.progress.as_str()),
            ("task_type", self.task_type.as_str()),
            ("parent_record", self.parent_record.as_str()),
        ]
        .into_iter()
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectConfig {
    pub engine: EngineConfig,
    pub display: DisplayConfig,
    pub fields: FieldAliases,
}

impl ProjectConfig {
    /// Checks values serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.bar_width == 0 {
            return Err(ConfigError::Invalid(
                "display.bar_width must be at least 1".to_string(),
            ));
        }

        for (name, alias) in self.fields.iter() {
            if alias.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "fields.{} must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project_root = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::find_project_root(&cwd));

        let project = match &project_root {
            Some(root) => Self::load_project_config(root)?,
            None => ProjectConfig::default(),
        };

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "gantt-order", "gantt-order")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = Self::project_config_path(project_root);

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config
            .validate()
            .with_context(|| format!("In {}", config_path.display()))?;

        Ok(config)
    }

    /// Returns the path of a project's config file
    pub fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR).join("config.toml")
    }

    /// Finds the project root by looking for a `.gantt/` directory at or above `start`
    pub fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns true if we're in a project
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Saves the project configuration
    pub fn save_project(&self) -> Result<()> {
        let root = self
            .project_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a gantt project. Run 'gantt init' first."))?;
        let config_path = Self::project_config_path(root);

        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))
    }
}
