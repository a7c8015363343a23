//! `gantt chart` - text Gantt chart

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::input::InputArgs;
use super::order::truncate;
use super::output::Output;
use crate::domain::{OrderedTasks, TaskKind};
use crate::storage::{Config, ViewMode};

const NAME_WIDTH: usize = 24;

/// One laid-out chart row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRow {
    pub id: String,
    pub name: String,
    /// 0 for top-level rows, 1 for members of a rooted group
    pub depth: usize,
    /// First cell of the bar
    pub offset: usize,
    /// Number of cells covered
    pub span: usize,
    pub glyph: char,
}

/// Lays out `ordered` on a grid of `width` cells of `view` size
///
/// The grid starts at the earliest task start. Bars are clipped to the
/// grid, and members of a collapsed project are left out.
pub fn layout(ordered: &OrderedTasks, view: ViewMode, width: usize) -> Vec<ChartRow> {
    let Some(origin) = ordered.tasks().iter().map(|t| t.start).min() else {
        return Vec::new();
    };
    let cell = view.cell().num_seconds().max(1);

    let mut rows = Vec::with_capacity(ordered.len());
    for (pos, (task, group)) in ordered.iter().enumerate() {
        let is_root = ordered.is_root(pos);
        let root = ordered.root(group);

        if !is_root && root.is_some_and(|r| r.hide_children == Some(true)) {
            continue;
        }

        let offset = ((task.start - origin).num_seconds() / cell) as usize;
        let length = (task.end - task.start).num_seconds().max(0);
        let span = ((length + cell - 1) / cell).max(1) as usize;

        let offset = offset.min(width);
        let span = span.min(width - offset);

        // A lone task is the root of its own group but is not drawn as a project
        let project_bar = is_root
            && (task.kind == TaskKind::Project || ordered.members(group).nth(1).is_some());

        let glyph = if project_bar {
            '#'
        } else if task.kind == TaskKind::Milestone {
            '*'
        } else {
            '='
        };

        rows.push(ChartRow {
            id: task.id.to_string(),
            name: task.name.clone(),
            depth: usize::from(root.is_some() && !is_root),
            offset,
            span,
            glyph,
        });
    }

    rows
}

#[derive(Serialize)]
struct ChartReport {
    view: ViewMode,
    origin: Option<DateTime<Utc>>,
    rows: Vec<ChartRow>,
}

pub fn run(
    output: &Output,
    config: &Config,
    input: &InputArgs,
    view: Option<ViewMode>,
) -> Result<()> {
    let display = &config.project.display;
    let view = view.unwrap_or(display.view_mode);
    let ordered = input.order(config)?;
    let rows = layout(&ordered, view, display.bar_width);
    let origin = ordered.tasks().iter().map(|t| t.start).min();

    if output.is_json() {
        output.data(&ChartReport { view, origin, rows });
        return Ok(());
    }

    let Some(origin) = origin else {
        println!("No tasks.");
        return Ok(());
    };

    println!(
        "{:<width$} | {} from {}",
        "",
        view.as_str(),
        output.date(origin),
        width = NAME_WIDTH
    );

    for row in &rows {
        let label = format!("{}{}", "  ".repeat(row.depth), row.name);
        let bar: String = std::iter::repeat(row.glyph).take(row.span).collect();
        println!(
            "{:<width$} | {}{}",
            truncate(&label, NAME_WIDTH),
            " ".repeat(row.offset),
            bar,
            width = NAME_WIDTH
        );
    }

    Ok(())
}
