use crate::due::Due;
use crate::error::AppError;
use crate::model::Task;
use crate::registry::ListRegistry;
use time::{Duration, OffsetDateTime, UtcOffset};
use tracing::{debug, info};

/// Caller input for a new task. Blank optional fields count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskDraft<'a> {
    pub name: &'a str,
    pub due: &'a str,
    pub reminder: Option<&'a str>,
    pub list_id: Option<&'a str>,
}

/// Tasks in insertion order. Tasks are never removed; only `completed` changes.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    last_created_at: Option<OffsetDateTime>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `draft`, resolves its list and appends the task.
    ///
    /// Without a list selection the task lands in the registry's first list, which is
    /// created on demand. Nothing is written when validation fails.
    pub fn create_task(
        &mut self,
        registry: &mut ListRegistry,
        draft: TaskDraft<'_>,
        now: OffsetDateTime,
        offset: UtcOffset,
    ) -> Result<Task, AppError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("task name is required"));
        }
        if draft.due.trim().is_empty() {
            return Err(AppError::validation("due date is required"));
        }

        let list_id = match non_blank(draft.list_id) {
            Some(id) => registry
                .get(id)
                .map(|list| list.id.clone())
                .ok_or_else(|| AppError::not_found(format!("list {id} not found")))?,
            None => registry.ensure_default_list().id.clone(),
        };

        self.next_id += 1;
        let task = Task {
            id: format!("task-{}", self.next_id),
            name: name.to_string(),
            due: Due::parse(draft.due, offset),
            reminder: non_blank(draft.reminder).map(str::to_string),
            list_id,
            created_at: self.next_created_at(now),
            completed: false,
        };

        info!(
            task_id = %task.id,
            list_id = %task.list_id,
            due_parsed = task.due.is_parsed(),
            "task created"
        );
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn toggle_completion(&mut self, id: &str) -> Result<Task, AppError> {
        let trimmed = id.trim();
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == trimmed)
            .ok_or_else(|| AppError::not_found(format!("task {trimmed} not found")))?;

        task.completed = !task.completed;
        debug!(task_id = %task.id, completed = task.completed, "task toggled");
        Ok(task.clone())
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // Clock readings can repeat or step back; creation order must not.
    fn next_created_at(&mut self, now: OffsetDateTime) -> OffsetDateTime {
        let created_at = match self.last_created_at {
            Some(last) if now <= last => last + Duration::nanoseconds(1),
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
