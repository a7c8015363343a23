//! Task files
//!
//! Task lists (and raw records) are read from JSON arrays, JSONL (one JSON
//! object per line) or YAML sequences, picked by file extension. Reads take a
//! shared lock; writes go to a temp file under an exclusive lock and are
//! renamed into place.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::records::Record;
use crate::domain::Task;

/// On-disk format of a task file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Jsonl,
    Yaml,
}

impl FileFormat {
    /// Picks the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("json") => Ok(FileFormat::Json),
            Some("jsonl") | Some("ndjson") => Ok(FileFormat::Jsonl),
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            _ => bail!(
                "Unsupported task file extension: {} (expected .json, .jsonl or .yaml)",
                path.display()
            ),
        }
    }
}

/// A task file on disk
pub struct TaskFile {
    path: PathBuf,
    format: FileFormat,
}

impl TaskFile {
    /// Opens a task file handle, choosing the format from the extension
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = FileFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Returns the path to the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Reads all tasks from the file, in file order
    pub fn read_tasks(&self) -> Result<Vec<Task>> {
        self.read_all()
    }

    /// Reads all raw records from the file, in file order
    pub fn read_records(&self) -> Result<Vec<Record>> {
        self.read_all()
    }

    fn read_all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open task file: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on task file")?;

        let mut reader = BufReader::new(&file);

        match self.format {
            FileFormat::Jsonl => {
                let mut items = Vec::new();
                for (line_num, line) in reader.lines().enumerate() {
                    let line =
                        line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

                    if line.trim().is_empty() {
                        continue;
                    }

                    let item = serde_json::from_str(&line)
                        .with_context(|| format!("Failed to parse entry at line {}", line_num + 1))?;
                    items.push(item);
                }
                Ok(items)
            }
            FileFormat::Json => {
                let mut content = String::new();
                reader
                    .read_to_string(&mut content)
                    .context("Failed to read task file")?;
                serde_json::from_str(&content).with_context(|| {
                    format!("Failed to parse JSON task file: {}", self.path.display())
                })
            }
            FileFormat::Yaml => {
                let mut content = String::new();
                reader
                    .read_to_string(&mut content)
                    .context("Failed to read task file")?;
                serde_yaml::from_str(&content).with_context(|| {
                    format!("Failed to parse YAML task file: {}", self.path.display())
                })
            }
        }
        // Lock is released when file is dropped
    }

    /// Writes tasks in the given order (full rewrite)
    pub fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.write_all(tasks)
    }

    fn write_all<T: Serialize>(&self, items: &[T]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.temp_path();

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on task file")?;

            let mut writer = BufWriter::new(&file);

            match self.format {
                FileFormat::Jsonl => {
                    for item in items {
                        let line =
                            serde_json::to_string(item).context("Failed to serialize task")?;
                        writeln!(writer, "{}", line).context("Failed to write task")?;
                    }
                }
                FileFormat::Json => {
                    serde_json::to_writer_pretty(&mut writer, items)
                        .context("Failed to serialize tasks")?;
                    writeln!(writer).context("Failed to write task file")?;
                }
                FileFormat::Yaml => {
                    serde_yaml::to_writer(&mut writer, items)
                        .context("Failed to serialize tasks")?;
                }
            }

            writer.flush().context("Failed to flush task file")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
