mod list;
mod task;

pub use list::{PALETTE, Rgb, TaskList, UNASSIGNED_COLOR, palette_color};
pub use task::Task;
