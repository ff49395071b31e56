//! Due-date monitor: decides which overdue task, if any, to put in front of the user.
//!
//! The monitor is a two-state machine (quiet / alerting) plus a ledger of task ids
//! that have already been alerted. The ledger only grows; a task is alerted at most
//! once per monitor lifetime no matter how long it stays overdue.
//!
//! Candidates are scanned in store insertion order, not due order: the first overdue
//! task that has not been alerted yet wins, even when a later-created task is more
//! overdue.

use crate::model::Task;
use serde::Serialize;
use std::collections::HashSet;
use time::OffsetDateTime;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub task: Task,
    #[serde(with = "time::serde::rfc3339")]
    pub raised_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertDecision {
    Show(Alert),
    Dismiss,
}

impl AlertDecision {
    pub fn alert(&self) -> Option<&Alert> {
        match self {
            Self::Show(alert) => Some(alert),
            Self::Dismiss => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MonitorState {
    #[default]
    Quiet,
    Alerting(Alert),
}

/// Ids of tasks that have produced an alert. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct AlertLedger {
    alerted: HashSet<String>,
}

impl AlertLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.alerted.contains(task_id)
    }

    pub fn len(&self) -> usize {
        self.alerted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerted.is_empty()
    }

    fn record(&mut self, task_id: &str) {
        self.alerted.insert(task_id.to_string());
    }
}

#[derive(Debug, Default)]
pub struct DueMonitor {
    ledger: AlertLedger,
    state: MonitorState,
}

impl DueMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: AlertLedger) -> Self {
        Self {
            ledger,
            state: MonitorState::Quiet,
        }
    }

    /// Evaluates `tasks` (in store order) against `now`.
    pub fn poll(&mut self, tasks: &[Task], now: OffsetDateTime) -> AlertDecision {
        let mut due_count = 0usize;
        let mut candidate = None;
        for task in tasks.iter().filter(|task| !task.completed && task.due.is_due(now)) {
            due_count += 1;
            if candidate.is_none() && !self.ledger.contains(&task.id) {
                candidate = Some(task);
            }
        }
        debug!(due_count, "due poll");

        let Some(task) = candidate else {
            self.state = MonitorState::Quiet;
            return AlertDecision::Dismiss;
        };

        self.ledger.record(&task.id);
        info!(task_id = %task.id, "alert raised");
        let alert = Alert {
            task: task.clone(),
            raised_at: now,
        };
        self.state = MonitorState::Alerting(alert.clone());
        AlertDecision::Show(alert)
    }

    /// User dismissal. The alerted task stays in the ledger.
    pub fn acknowledge(&mut self) {
        if matches!(self.state, MonitorState::Alerting(_)) {
            debug!("alert acknowledged");
        }
        self.state = MonitorState::Quiet;
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn current_alert(&self) -> Option<&Alert> {
        match &self.state {
            MonitorState::Alerting(alert) => Some(alert),
            MonitorState::Quiet => None,
        }
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }
}
