use crate::error::AppError;
use crate::model::{PALETTE, TaskList, palette_color};
use serde::Serialize;
use tracing::info;

pub const DEFAULT_LIST_NAME: &str = "Default";

/// Palette split by whether an existing list already claims the color.
/// Both halves keep palette order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorAvailability {
    pub used: Vec<&'static str>,
    pub available: Vec<&'static str>,
}

/// Lists in creation order. Lists are never removed or edited.
#[derive(Debug, Default)]
pub struct ListRegistry {
    lists: Vec<TaskList>,
    next_id: u64,
}

impl ListRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_list(&mut self, name: &str, color: &str) -> Result<TaskList, AppError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("list name is required"));
        }

        let color = palette_color(color).ok_or_else(|| {
            AppError::validation(format!("color {} is not in the palette", color.trim()))
        })?;
        if self.is_color_used(color) {
            return Err(AppError::validation(format!("color {color} is already used")));
        }

        Ok(self.insert(trimmed, color))
    }

    /// Creates the "Default" list when the registry is empty; otherwise does nothing.
    pub fn ensure_default_list(&mut self) -> &TaskList {
        if self.lists.is_empty() {
            self.insert(DEFAULT_LIST_NAME, PALETTE[0]);
        }
        &self.lists[0]
    }

    pub fn available_colors(&self) -> ColorAvailability {
        let (used, available): (Vec<&'static str>, Vec<&'static str>) = PALETTE
            .iter()
            .copied()
            .partition(|color| self.is_color_used(color));
        ColorAvailability { used, available }
    }

    /// The color a new-list form starts out with.
    pub fn default_color(&self) -> Option<&'static str> {
        PALETTE
            .iter()
            .copied()
            .find(|color| !self.is_color_used(color))
    }

    pub fn get(&self, id: &str) -> Option<&TaskList> {
        self.lists.iter().find(|list| list.id == id)
    }

    pub fn first(&self) -> Option<&TaskList> {
        self.lists.first()
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.lists
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    fn is_color_used(&self, color: &str) -> bool {
        self.lists.iter().any(|list| list.color == color)
    }

    fn insert(&mut self, name: &str, color: &str) -> TaskList {
        self.next_id += 1;
        let list = TaskList {
            id: format!("list-{}", self.next_id),
            name: name.to_string(),
            color: color.to_string(),
        };
        info!(list_id = %list.id, color = %list.color, "list created");
        self.lists.push(list.clone());
        list
    }
}
