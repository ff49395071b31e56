//! Line-driven front end for a [`Tracker`].
//!
//! The shell owns all core state on one thread. Input lines arrive over a channel
//! from a reader thread; the gaps between lines are where the poll timer fires.

use crate::cli::{Command, ShellLine};
use crate::render;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;
use tasklane_core::AppError;
use tasklane_core::monitor::AlertDecision;
use tasklane_core::notify::Notifier;
use tasklane_core::store::TaskDraft;
use tasklane_core::timer::PollTimer;
use tasklane_core::tracker::Tracker;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Line(String),
    ReadFailed(String),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Forwards lines from `reader` until it ends or the receiver goes away.
///
/// Bytes that are not UTF-8 are replaced rather than ending the session.
pub fn spawn_line_reader<R>(mut reader: R, events: Sender<Event>) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let event = match reader.read_until(b'\n', &mut buf) {
                Ok(0) => Event::Closed,
                Ok(_) => Event::Line(decode_line(&buf)),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => Event::ReadFailed(err.to_string()),
            };
            let last = !matches!(event, Event::Line(_));
            if events.send(event).is_err() || last {
                return;
            }
        }
    })
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = String::from_utf8_lossy(raw);
    if let Cow::Owned(_) = line {
        warn!("input line was not valid UTF-8; invalid bytes replaced");
    }
    line.into_owned()
}

pub struct Shell<W: Write> {
    tracker: Tracker,
    notifier: Box<dyn Notifier>,
    timer: PollTimer,
    out: W,
    ansi: bool,
    alert_visible: bool,
}

impl<W: Write> Shell<W> {
    pub fn new(tracker: Tracker, notifier: Box<dyn Notifier>, timer: PollTimer, out: W) -> Self {
        Self {
            tracker,
            notifier,
            timer,
            out,
            ansi: false,
            alert_visible: false,
        }
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Makes sure a list exists and shows the initial board.
    pub fn boot(&mut self) -> Result<(), AppError> {
        self.tracker.ensure_default_list();
        self.show_board()
    }

    /// Runs until input closes or the user exits.
    pub fn run(&mut self, events: &Receiver<Event>) -> Result<(), AppError> {
        self.boot()?;
        info!(interval_secs = self.timer.interval().as_secs(), "shell started");

        loop {
            if self.timer.fire(Instant::now()) {
                self.tick(OffsetDateTime::now_utc())?;
            }

            match events.recv_timeout(self.timer.remaining(Instant::now())) {
                Ok(Event::Line(line)) => {
                    if self.handle_line(&line, OffsetDateTime::now_utc())? == Flow::Exit {
                        break;
                    }
                }
                Ok(Event::ReadFailed(err)) => return Err(AppError::io(err)),
                Ok(Event::Closed) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }

        debug!("shell stopped");
        Ok(())
    }

    /// Timer entry point.
    pub fn tick(&mut self, now: OffsetDateTime) -> Result<(), AppError> {
        let decision = self.tracker.poll(now);
        self.apply_decision(&decision)
    }

    /// Executes one input line. Command failures are reported to the user; only
    /// output failures propagate.
    pub fn handle_line(&mut self, line: &str, now: OffsetDateTime) -> Result<Flow, AppError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return Ok(Flow::Exit);
        }
        if line == "help" || line == "?" {
            let help = ShellLine::command().render_help();
            writeln!(self.out, "{help}")?;
            return Ok(Flow::Continue);
        }

        let result = match split_command_line(line) {
            Ok(args) => match ShellLine::try_parse_from(args) {
                Ok(shell_line) => self.run_command(shell_line.command, now),
                Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp) => {
                    writeln!(self.out, "{}", err.render())?;
                    Ok(())
                }
                Err(err) => Err(normalize_parse_error(err)),
            },
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {}
            Err(err) if err.is_user_facing() || matches!(err, AppError::InvalidData(_)) => {
                writeln!(self.out, "ERROR: {err}")?;
            }
            Err(err) => return Err(err),
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    fn run_command(&mut self, command: Command, now: OffsetDateTime) -> Result<(), AppError> {
        match command {
            Command::List { name, color } => {
                let list = self.tracker.create_list(&name, color.as_deref())?;
                writeln!(self.out, "Created list: {} ({}) {}", list.name, list.id, list.color)?;
                self.show_board()?;
            }
            Command::Add {
                name,
                due,
                reminder,
                list_id,
            } => {
                let draft = TaskDraft {
                    name: &name,
                    due: &due,
                    reminder: reminder.as_deref(),
                    list_id: list_id.as_deref(),
                };
                let change = self.tracker.create_task(draft, now)?;
                writeln!(self.out, "Added task: {} ({})", change.task.name, change.task.id)?;
                self.show_board()?;
                self.apply_decision(&change.decision)?;
            }
            Command::Toggle { id } => {
                let change = self.tracker.toggle_completion(&id, now)?;
                let verb = if change.task.completed {
                    "Completed"
                } else {
                    "Reopened"
                };
                writeln!(self.out, "{verb} task: {} ({})", change.task.name, change.task.id)?;
                self.show_board()?;
                self.apply_decision(&change.decision)?;
            }
            Command::Ack => {
                self.tracker.acknowledge();
                if self.alert_visible {
                    self.alert_visible = false;
                    writeln!(self.out, "Alert dismissed.")?;
                } else {
                    writeln!(self.out, "No alert to dismiss.")?;
                }
            }
            Command::Board { json } => {
                if json {
                    render::board_json(&mut self.out, &self.tracker.board())?;
                } else {
                    self.show_board()?;
                }
            }
            Command::Colors => {
                render::colors(&mut self.out, &self.tracker.available_colors(), self.ansi)?;
            }
            Command::Progress { list_id } => {
                let percent = self.tracker.progress_for(&list_id)?;
                writeln!(self.out, "{}: {percent}%", list_id.trim())?;
            }
        }
        Ok(())
    }

    fn show_board(&mut self) -> Result<(), AppError> {
        let board = self.tracker.board();
        render::board(&mut self.out, &board, self.ansi)?;
        self.out.flush()?;
        Ok(())
    }

    fn apply_decision(&mut self, decision: &AlertDecision) -> Result<(), AppError> {
        match self.tracker.alert_view(decision) {
            Some(view) => {
                render::alert(&mut self.out, &view)?;
                self.alert_visible = true;
                if let Err(err) = self.notifier.notify(&view) {
                    warn!(task_id = %view.task_id, error = %err, "desktop notification failed");
                }
            }
            None => {
                if self.alert_visible {
                    self.alert_visible = false;
                    writeln!(self.out, "Alert cleared.")?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::validation(message)
}

/// Splits a line into arguments. Single or double quotes group words; a backslash
/// escapes the next character inside double quotes.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut has_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match quote {
            Some('"') if ch == '\\' => match chars.next() {
                Some(next) => current.push(next),
                None => current.push(ch),
            },
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                has_token = true;
            }
            None if ch.is_whitespace() => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            None => {
                current.push(ch);
                has_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(AppError::validation("unterminated quote in command"));
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}
