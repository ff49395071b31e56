use crate::config::Config;
use crate::error::AppError;
use crate::model::{Task, TaskList};
use crate::monitor::{AlertDecision, DueMonitor};
use crate::ordering::{self, DEFAULT_PROGRESS_LISTS};
use crate::registry::{ColorAvailability, ListRegistry};
use crate::store::{TaskDraft, TaskStore};
use crate::view::{self, AlertView, Board};
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

/// Result of a task mutation together with the poll it triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChange {
    pub task: Task,
    pub decision: AlertDecision,
}

/// Owns every piece of core state for one process.
///
/// Each mutating call re-polls the monitor before returning, so a caller never sees
/// an alert state older than its own action.
#[derive(Debug)]
pub struct Tracker {
    registry: ListRegistry,
    store: TaskStore,
    monitor: DueMonitor,
    offset: UtcOffset,
    progress_lists: usize,
}

impl Tracker {
    pub fn new(offset: UtcOffset) -> Self {
        Self::with_parts(ListRegistry::new(), TaskStore::new(), DueMonitor::new(), offset)
    }

    pub fn from_config(config: &Config, offset: UtcOffset) -> Self {
        let mut tracker = Self::new(offset);
        tracker.progress_lists = config.progress_lists();
        tracker
    }

    pub fn with_parts(
        registry: ListRegistry,
        store: TaskStore,
        monitor: DueMonitor,
        offset: UtcOffset,
    ) -> Self {
        Self {
            registry,
            store,
            monitor,
            offset,
            progress_lists: DEFAULT_PROGRESS_LISTS,
        }
    }

    /// Creates a list. Without a color the first unused palette entry is taken.
    pub fn create_list(&mut self, name: &str, color: Option<&str>) -> Result<TaskList, AppError> {
        let color = match color.map(str::trim).filter(|value| !value.is_empty()) {
            Some(color) => color,
            None => self
                .registry
                .default_color()
                .ok_or_else(|| AppError::validation("every palette color is already used"))?,
        };
        self.registry.create_list(name, color)
    }

    pub fn ensure_default_list(&mut self) -> TaskList {
        self.registry.ensure_default_list().clone()
    }

    pub fn create_task(
        &mut self,
        draft: TaskDraft<'_>,
        now: OffsetDateTime,
    ) -> Result<TaskChange, AppError> {
        let task = self
            .store
            .create_task(&mut self.registry, draft, now, self.offset)?;
        let decision = self.poll(now);
        Ok(TaskChange { task, decision })
    }

    pub fn toggle_completion(
        &mut self,
        task_id: &str,
        now: OffsetDateTime,
    ) -> Result<TaskChange, AppError> {
        let task = self.store.toggle_completion(task_id)?;
        let decision = self.poll(now);
        Ok(TaskChange { task, decision })
    }

    /// Single entry point for timer ticks and post-mutation checks.
    pub fn poll(&mut self, now: OffsetDateTime) -> AlertDecision {
        self.monitor.poll(self.store.tasks(), now)
    }

    pub fn acknowledge(&mut self) {
        self.monitor.acknowledge();
    }

    pub fn ordered_tasks(&self) -> Vec<&Task> {
        ordering::ordered_tasks(self.store.tasks())
    }

    pub fn progress_for(&self, list_id: &str) -> Result<u8, AppError> {
        let list = self
            .registry
            .get(list_id.trim())
            .ok_or_else(|| AppError::not_found(format!("list {} not found", list_id.trim())))?;
        Ok(ordering::progress_for(self.store.tasks(), list))
    }

    pub fn available_colors(&self) -> ColorAvailability {
        self.registry.available_colors()
    }

    pub fn board(&self) -> Board {
        debug!(tasks = self.store.len(), lists = self.registry.len(), "board refresh");
        view::board(
            &self.registry,
            self.store.tasks(),
            self.offset,
            self.progress_lists,
        )
    }

    /// Presentation of the alert currently shown, if any.
    pub fn current_alert(&self) -> Option<AlertView> {
        self.monitor
            .current_alert()
            .map(|alert| view::alert_view(&self.registry, alert, self.offset))
    }

    pub fn alert_view(&self, decision: &AlertDecision) -> Option<AlertView> {
        decision
            .alert()
            .map(|alert| view::alert_view(&self.registry, alert, self.offset))
    }

    pub fn registry(&self) -> &ListRegistry {
        &self.registry
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn monitor(&self) -> &DueMonitor {
        &self.monitor
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::Tracker;
    use crate::config::Config;
    use crate::monitor::{AlertDecision, MonitorState};
    use crate::store::TaskDraft;
    use time::macros::datetime;
    use time::{Duration, UtcOffset};

    fn draft<'a>(name: &'a str, due: &'a str) -> TaskDraft<'a> {
        TaskDraft {
            name,
            due,
            ..TaskDraft::default()
        }
    }

    #[test]
    fn work_list_orders_email_before_report() {
        let mut tracker = Tracker::new(UtcOffset::UTC);
        let now = datetime!(2023-12-31 12:00 UTC);
        let work = tracker.create_list("Work", Some("#ff4d6d")).unwrap();

        tracker
            .create_task(
                TaskDraft {
                    list_id: Some(work.id.as_str()),
                    ..draft("Report", "2024-01-01T09:00:00")
                },
                now,
            )
            .unwrap();
        tracker
            .create_task(
                TaskDraft {
                    list_id: Some(work.id.as_str()),
                    ..draft("Email", "2024-01-01T08:00:00")
                },
                now,
            )
            .unwrap();

        let names: Vec<&str> = tracker
            .ordered_tasks()
            .into_iter()
            .map(|task| task.name.as_str())
            .collect();
        assert_eq!(names, vec!["Email", "Report"]);
    }

    #[test]
    fn creating_an_overdue_task_alerts_immediately() {
        let mut tracker = Tracker::new(UtcOffset::UTC);
        let now = datetime!(2024-06-01 12:00 UTC);

        let change = tracker
            .create_task(draft("Call", "2024-06-01T11:55:00"), now)
            .unwrap();

        match &change.decision {
            AlertDecision::Show(alert) => assert_eq!(alert.task.id, change.task.id),
            AlertDecision::Dismiss => panic!("expected an alert"),
        }
        let view = tracker.current_alert().unwrap();
        assert_eq!(view.name, "Call");
        assert_eq!(view.due, "2024-06-01 11:55");
        assert_eq!(view.list_name.as_deref(), Some("Default"));

        let later = tracker.poll(now + Duration::minutes(30));
        assert_eq!(later, AlertDecision::Dismiss);
    }

    #[test]
    fn toggling_alerted_task_quiets_monitor() {
        let mut tracker = Tracker::new(UtcOffset::UTC);
        let now = datetime!(2024-06-01 12:00 UTC);
        let task = tracker
            .create_task(draft("Call", "2024-06-01T11:00:00"), now)
            .unwrap()
            .task;
        assert!(matches!(tracker.monitor().state(), MonitorState::Alerting(_)));

        let change = tracker.toggle_completion(&task.id, now).unwrap();

        assert!(change.task.completed);
        assert_eq!(change.decision, AlertDecision::Dismiss);
        assert_eq!(tracker.monitor().state(), &MonitorState::Quiet);
    }

    #[test]
    fn toggle_can_surface_the_next_overdue_task() {
        let mut tracker = Tracker::new(UtcOffset::UTC);
        let now = datetime!(2024-06-01 12:00 UTC);
        let first = tracker
            .create_task(draft("first", "2024-06-01T13:00:00"), now)
            .unwrap()
            .task;
        tracker
            .create_task(draft("second", "2024-06-01T13:00:00"), now)
            .unwrap();

        let later = now + Duration::hours(2);
        let decision = tracker.poll(later);
        assert_eq!(decision.alert().map(|alert| alert.task.name.as_str()), Some("first"));

        let change = tracker.toggle_completion(&first.id, later).unwrap();
        assert_eq!(
            change.decision.alert().map(|alert| alert.task.name.as_str()),
            Some("second")
        );
    }

    #[test]
    fn failed_mutations_leave_state_untouched() {
        let mut tracker = Tracker::new(UtcOffset::UTC);
        let now = datetime!(2024-06-01 12:00 UTC);

        assert_eq!(
            tracker.create_task(draft("", "2024-06-01"), now).unwrap_err().code(),
            "validation"
        );
        assert_eq!(
            tracker.toggle_completion("task-1", now).unwrap_err().code(),
            "not_found"
        );
        assert!(tracker.store().is_empty());
        assert!(tracker.registry().is_empty());
    }

    #[test]
    fn create_list_picks_first_free_color() {
        let mut tracker = Tracker::new(UtcOffset::UTC);
        tracker.ensure_default_list();

        let list = tracker.create_list("Errands", None).unwrap();

        assert_eq!(list.color, "#ffb84d");
        assert!(!tracker.available_colors().available.contains(&"#ffb84d"));
    }

    #[test]
    fn create_list_fails_when_palette_exhausted() {
        let mut tracker = Tracker::new(UtcOffset::UTC);
        for index in 0..10 {
            tracker.create_list(&format!("list {index}"), None).unwrap();
        }

        let err = tracker.create_list("one more", None).unwrap_err();
        assert_eq!(err.code(), "validation");
        assert_eq!(tracker.registry().len(), 10);
    }

    #[test]
    fn progress_for_reports_unknown_list() {
        let tracker = Tracker::new(UtcOffset::UTC);
        assert_eq!(tracker.progress_for("list-7").unwrap_err().code(), "not_found");
    }

    #[test]
    fn board_reflects_toggles_and_progress_cap() {
        let config = Config {
            progress_lists: Some(1),
            ..Config::default()
        };
        let mut tracker = Tracker::from_config(&config, UtcOffset::UTC);
        let now = datetime!(2024-06-01 12:00 UTC);
        tracker.ensure_default_list();
        tracker.create_list("Home", None).unwrap();
        let task = tracker
            .create_task(draft("Plan", "2024-07-01T09:00"), now)
            .unwrap()
            .task;
        tracker.toggle_completion(&task.id, now).unwrap();

        let board = tracker.board();
        assert_eq!(board.progress.len(), 1);
        assert_eq!(board.progress[0].percent, 100);
        assert_eq!(board.tasks.len(), 1);
        assert!(board.tasks[0].completed);
        assert_eq!(board.tasks[0].color, "#ff4d6d");
        assert_eq!(tracker.progress_for(&task.list_id).unwrap(), 100);
    }
}
