//! Derived views over the store: render order and per-list completion.
//!
//! Everything here is a pure function of the current lists and tasks and is meant to
//! be recomputed after each mutation.

use crate::model::{Rgb, Task, TaskList, UNASSIGNED_COLOR};
use crate::registry::ListRegistry;
use serde::Serialize;
use std::cmp::Ordering;

/// Number of lists the progress summary shows unless configured otherwise.
pub const DEFAULT_PROGRESS_LISTS: usize = 3;

const SHADE_FACTOR: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListProgress {
    pub list_id: String,
    pub name: String,
    pub color: String,
    pub shade: String,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

/// Incomplete tasks first, then completed ones; each group by due time with creation
/// order breaking ties.
pub fn ordered_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by(|left, right| compare_for_display(left, right));
    ordered
}

fn compare_for_display(left: &Task, right: &Task) -> Ordering {
    left.completed
        .cmp(&right.completed)
        .then_with(|| left.due.cmp_instant(&right.due))
        .then_with(|| left.created_at.cmp(&right.created_at))
}

/// Rounded share of the list's tasks that are completed; 0 for an empty list.
pub fn progress_for(tasks: &[Task], list: &TaskList) -> u8 {
    let (completed, total) = completion_counts(tasks, &list.id);
    percent(completed, total)
}

/// Progress for the first `cap` lists in registry order.
pub fn progress_summary(registry: &ListRegistry, tasks: &[Task], cap: usize) -> Vec<ListProgress> {
    registry
        .lists()
        .iter()
        .take(cap)
        .map(|list| {
            let (completed, total) = completion_counts(tasks, &list.id);
            ListProgress {
                list_id: list.id.clone(),
                name: list.name.clone(),
                color: list.color.clone(),
                shade: dark_shade(&list.color),
                completed,
                total,
                percent: percent(completed, total),
            }
        })
        .collect()
}

/// The task's list, or `None` when the reference no longer resolves.
pub fn resolve_list<'a>(registry: &'a ListRegistry, task: &Task) -> Option<&'a TaskList> {
    registry.get(&task.list_id)
}

pub fn list_color<'a>(registry: &'a ListRegistry, task: &Task) -> &'a str {
    resolve_list(registry, task)
        .map(|list| list.color.as_str())
        .unwrap_or(UNASSIGNED_COLOR)
}

/// Darkened variant of `color` for the unfilled part of a progress ring.
pub fn dark_shade(color: &str) -> String {
    Rgb::from_hex(color)
        .or_else(|| Rgb::from_hex(UNASSIGNED_COLOR))
        .map(|rgb| rgb.scaled(SHADE_FACTOR).to_css())
        .unwrap_or_default()
}

fn completion_counts(tasks: &[Task], list_id: &str) -> (usize, usize) {
    tasks
        .iter()
        .filter(|task| task.list_id == list_id)
        .fold((0, 0), |(completed, total), task| {
            (completed + usize::from(task.completed), total + 1)
        })
}

fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (completed as f64 * 100.0 / total as f64).round() as u8
}
