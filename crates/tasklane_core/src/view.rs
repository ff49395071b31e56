use crate::model::Task;
use crate::monitor::Alert;
use crate::ordering::{ListProgress, list_color, ordered_tasks, progress_summary, resolve_list};
use crate::registry::ListRegistry;
use serde::Serialize;
use time::UtcOffset;

/// One task as a caller should render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: String,
    pub name: String,
    pub due: String,
    pub reminder: Option<String>,
    pub list_name: Option<String>,
    pub color: String,
    pub completed: bool,
}

/// Ordered rows plus the capped progress summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub tasks: Vec<TaskRow>,
    pub progress: Vec<ListProgress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertView {
    pub task_id: String,
    pub name: String,
    pub due: String,
    pub list_name: Option<String>,
    pub color: String,
}

pub fn task_row(registry: &ListRegistry, task: &Task, offset: UtcOffset) -> TaskRow {
    TaskRow {
        id: task.id.clone(),
        name: task.name.clone(),
        due: task.due.display(offset),
        reminder: task.reminder.clone(),
        list_name: resolve_list(registry, task).map(|list| list.name.clone()),
        color: list_color(registry, task).to_string(),
        completed: task.completed,
    }
}

pub fn board(
    registry: &ListRegistry,
    tasks: &[Task],
    offset: UtcOffset,
    progress_lists: usize,
) -> Board {
    Board {
        tasks: ordered_tasks(tasks)
            .into_iter()
            .map(|task| task_row(registry, task, offset))
            .collect(),
        progress: progress_summary(registry, tasks, progress_lists),
    }
}

pub fn alert_view(registry: &ListRegistry, alert: &Alert, offset: UtcOffset) -> AlertView {
    let row = task_row(registry, &alert.task, offset);
    AlertView {
        task_id: row.id,
        name: row.name,
        due: row.due,
        list_name: row.list_name,
        color: row.color,
    }
}
