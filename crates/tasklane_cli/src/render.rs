use std::io::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasklane_core::AppError;
use tasklane_core::model::Rgb;
use tasklane_core::ordering::ListProgress;
use tasklane_core::registry::ColorAvailability;
use tasklane_core::view::{AlertView, Board, TaskRow};

const BAR_WIDTH: usize = 10;

#[derive(Tabled)]
struct BoardRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "task")]
    name: String,
    #[tabled(rename = "due")]
    due: String,
    #[tabled(rename = "list")]
    list: String,
    #[tabled(rename = "reminder")]
    reminder: String,
    #[tabled(rename = "status")]
    status: &'static str,
}

impl From<&TaskRow> for BoardRow {
    fn from(row: &TaskRow) -> Self {
        Self {
            id: row.id.clone(),
            name: row.name.clone(),
            due: row.due.clone(),
            list: row.list_name.clone().unwrap_or_else(|| "-".to_string()),
            reminder: row.reminder.clone().unwrap_or_else(|| "-".to_string()),
            status: if row.completed { "done" } else { "open" },
        }
    }
}

/// Writes the progress lines followed by the task table.
pub fn board<W: Write>(out: &mut W, board: &Board, ansi: bool) -> Result<(), AppError> {
    for entry in &board.progress {
        writeln!(out, "{}", progress_line(entry, ansi))?;
    }

    if board.tasks.is_empty() {
        writeln!(out, "No tasks yet.")?;
        return Ok(());
    }

    let mut table = Table::new(board.tasks.iter().map(BoardRow::from));
    table.with(Style::psql());
    writeln!(out, "{table}")?;
    Ok(())
}

pub fn board_json<W: Write>(out: &mut W, board: &Board) -> Result<(), AppError> {
    let json =
        serde_json::to_string_pretty(board).map_err(|err| AppError::invalid_data(err.to_string()))?;
    writeln!(out, "{json}")?;
    Ok(())
}

pub fn alert<W: Write>(out: &mut W, alert: &AlertView) -> Result<(), AppError> {
    writeln!(out, "ALERT: {} ({})", alert.name, alert.due)?;
    Ok(())
}

pub fn colors<W: Write>(out: &mut W, colors: &ColorAvailability, ansi: bool) -> Result<(), AppError> {
    writeln!(out, "used: {}", swatch_list(&colors.used, ansi))?;
    writeln!(out, "available: {}", swatch_list(&colors.available, ansi))?;
    Ok(())
}

fn swatch_list(colors: &[&str], ansi: bool) -> String {
    if colors.is_empty() {
        return "-".to_string();
    }
    colors
        .iter()
        .map(|color| format!("{}{color}", swatch(color, ansi)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `Work [#####-----] 50% (1/2)`, with a colored marker on terminals.
pub fn progress_line(entry: &ListProgress, ansi: bool) -> String {
    let filled = usize::from(entry.percent) * BAR_WIDTH / 100;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
    format!(
        "{}{} [{bar}] {}% ({}/{})",
        swatch(&entry.color, ansi),
        entry.name,
        entry.percent,
        entry.completed,
        entry.total
    )
}

fn swatch(color: &str, ansi: bool) -> String {
    match Rgb::from_hex(color) {
        Some(rgb) if ansi => format!("\x1b[38;2;{};{};{}m\u{25a0}\x1b[0m ", rgb.r, rgb.g, rgb.b),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{alert, board, colors, progress_line};
    use tasklane_core::ordering::ListProgress;
    use tasklane_core::registry::ColorAvailability;
    use tasklane_core::view::{AlertView, Board, TaskRow};

    fn progress(percent: u8, completed: usize, total: usize) -> ListProgress {
        ListProgress {
            list_id: "list-1".to_string(),
            name: "Work".to_string(),
            color: "#ff4d6d".to_string(),
            shade: "rgb(102,31,44)".to_string(),
            completed,
            total,
            percent,
        }
    }

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>),
    {
        let mut out = Vec::new();
        write(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn progress_line_draws_bar() {
        assert_eq!(progress_line(&progress(50, 1, 2), false), "Work [#####-----] 50% (1/2)");
        assert_eq!(progress_line(&progress(0, 0, 0), false), "Work [----------] 0% (0/0)");
        assert_eq!(progress_line(&progress(100, 3, 3), false), "Work [##########] 100% (3/3)");
    }

    #[test]
    fn progress_line_colors_marker_on_terminals() {
        let line = progress_line(&progress(50, 1, 2), true);
        assert!(line.starts_with("\x1b[38;2;255;77;109m"));
    }

    #[test]
    fn empty_board_says_so() {
        let text = render(|out| {
            board(
                out,
                &Board {
                    tasks: Vec::new(),
                    progress: vec![progress(0, 0, 0)],
                },
                false,
            )
            .unwrap()
        });

        assert!(text.contains("Work [----------] 0%"));
        assert!(text.contains("No tasks yet."));
    }

    #[test]
    fn board_lists_rows_in_given_order() {
        let row = |id: &str, name: &str, completed: bool| TaskRow {
            id: id.to_string(),
            name: name.to_string(),
            due: "2024-01-01 08:00".to_string(),
            reminder: None,
            list_name: Some("Work".to_string()),
            color: "#ff4d6d".to_string(),
            completed,
        };
        let text = render(|out| {
            board(
                out,
                &Board {
                    tasks: vec![row("task-2", "Email", false), row("task-1", "Report", true)],
                    progress: Vec::new(),
                },
                false,
            )
            .unwrap()
        });

        let email = text.find("Email").unwrap();
        let report = text.find("Report").unwrap();
        assert!(email < report);
        assert!(text.contains("open"));
        assert!(text.contains("done"));
    }

    #[test]
    fn alert_and_colors_render_plain_text() {
        let text = render(|out| {
            alert(
                out,
                &AlertView {
                    task_id: "task-1".to_string(),
                    name: "Report".to_string(),
                    due: "2024-01-01 09:00".to_string(),
                    list_name: None,
                    color: "#555555".to_string(),
                },
            )
            .unwrap();
            colors(
                out,
                &ColorAvailability {
                    used: vec!["#ff4d6d"],
                    available: Vec::new(),
                },
                false,
            )
            .unwrap();
        });

        assert_eq!(text, "ALERT: Report (2024-01-01 09:00)\nused: #ff4d6d\navailable: -\n");
    }
}
