//! `gantt groups`

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::input::InputArgs;
use super::output::Output;
use crate::domain::{is_dependent, OrderedTasks, TaskId};
use crate::storage::Config;

#[derive(Debug, Serialize)]
struct GroupSummary<'a> {
    group: &'a TaskId,
    root: Option<&'a TaskId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<DateTime<Utc>>,
    members: Vec<MemberSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct MemberSummary<'a> {
    id: &'a TaskId,
    name: &'a str,
    dependent: bool,
}

fn summarize(ordered: &OrderedTasks) -> Vec<GroupSummary<'_>> {
    ordered
        .group_keys()
        .iter()
        .map(|group| {
            let root = ordered.root(group).map(|task| &task.id);
            let range = root.and_then(|_| ordered.rollup().range(group));
            let members = ordered
                .members(group)
                .map(|task| MemberSummary {
                    id: &task.id,
                    name: &task.name,
                    dependent: is_dependent(task, ordered.tasks()),
                })
                .collect();

            GroupSummary {
                group,
                root,
                start: range.map(|r| r.start),
                end: range.map(|r| r.end),
                members,
            }
        })
        .collect()
}

pub fn run(output: &Output, config: &Config, input: &InputArgs) -> Result<()> {
    let ordered = input.order(config)?;
    let groups = summarize(&ordered);

    if output.is_json() {
        output.data(&groups);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No groups.");
        return Ok(());
    }

    for (i, summary) in groups.iter().enumerate() {
        if i > 0 {
            output.blank();
        }

        match (summary.root, summary.start, summary.end) {
            (Some(_), Some(start), Some(end)) => println!(
                "{}  {} -> {}  ({} member(s))",
                summary.group,
                output.date(start),
                output.date(end),
                summary.members.len()
            ),
            _ => println!(
                "{}  (no root, {} member(s))",
                summary.group,
                summary.members.len()
            ),
        }

        for member in &summary.members {
            let flag = if member.dependent { "dependent" } else { "" };
            output.row(&["  ", member.id.as_str(), member.name, flag]);
        }
    }

    Ok(())
}
