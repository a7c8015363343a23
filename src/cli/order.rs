//! `gantt order`

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use super::input::InputArgs;
use super::output::Output;
use crate::domain::Task;
use crate::storage::{Config, TaskFile};

#[derive(Serialize)]
struct OrderReport<'a> {
    tasks: &'a [Task],
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
}

pub fn run(
    output: &Output,
    config: &Config,
    input: &InputArgs,
    out_path: Option<PathBuf>,
    fingerprint: bool,
) -> Result<()> {
    let ordered = input.order(config)?;
    let fingerprint = fingerprint.then(|| ordered.fingerprint());

    if let Some(path) = out_path {
        let file = TaskFile::new(path)?;
        file.write_tasks(ordered.tasks())?;
        output.success(&format!(
            "Wrote {} task(s) to {}",
            ordered.len(),
            file.path().display()
        ));
        if let Some(hash) = &fingerprint {
            output.row(&["fingerprint", hash.as_str()]);
        }
        return Ok(());
    }

    if output.is_json() {
        output.data(&OrderReport {
            tasks: ordered.tasks(),
            fingerprint,
        });
        return Ok(());
    }

    if ordered.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    println!(
        "{:<4} {:<16} {:<24} {:<16} {:<16} GROUP",
        "POS", "ID", "NAME", "START", "END"
    );
    println!("{}", "-".repeat(90));

    for (pos, (task, group)) in ordered.iter().enumerate() {
        let marker = if ordered.is_root(pos) { "*" } else { " " };
        println!(
            "{:<4} {:<16} {:<24} {:<16} {:<16} {}{}",
            pos + 1,
            task.id,
            truncate(&task.name, 24),
            output.date(task.start),
            output.date(task.end),
            group,
            marker
        );
    }

    if let Some(hash) = fingerprint {
        output.blank();
        println!("Fingerprint: {}", hash);
    }

    Ok(())
}

/// Cuts `text` to at most `max` characters, marking the cut with `~`
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_names() {
        assert_eq!(truncate("Design", 24), "Design");
        assert_eq!(truncate("abcdef", 4), "abc~");
        assert_eq!(truncate("日本語テキスト", 3), "日本~");
    }
}
