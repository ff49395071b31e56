use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tasklane_core::config::{ConfigOverrides, canonical_log_level};

/// Process-level flags for the interactive shell.
#[derive(Parser, Debug)]
#[command(name = "tasklane", author, version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON config file (defaults to TASKLANE_CONFIG_PATH or the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,

    /// More log output on stderr (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output on stderr (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

/// One line typed into the shell.
#[derive(Parser, Debug)]
#[command(name = "tasklane", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a list
    ///
    /// Example: list Work --color "#4db8ff"
    List {
        name: String,
        /// Palette color; the first unused one when omitted
        #[arg(long)]
        color: Option<String>,
    },
    /// Add a task
    ///
    /// Example: add "Send report" --due 2024-01-01T09:00 --list list-2
    Add {
        name: String,
        #[arg(long)]
        due: String,
        #[arg(long)]
        reminder: Option<String>,
        #[arg(long = "list", value_name = "LIST_ID")]
        list_id: Option<String>,
    },
    /// Mark a task completed, or reopen it
    ///
    /// Example: toggle task-1
    Toggle { id: String },
    /// Dismiss the alert on screen
    Ack,
    /// Show ordered tasks and list progress
    Board {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which palette colors are taken
    Colors,
    /// Show completion percentage for one list
    ///
    /// Example: progress list-1
    Progress { list_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    PollIntervalSecs,
    ProgressLists,
    Notifications,
    LogLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let key = canonicalize_flag_name(key_raw)
        .ok_or_else(|| "override key cannot be empty".to_string())?;
    let target = match key.as_str() {
        "poll_interval_secs" | "poll_interval" => ConfigOverrideTarget::PollIntervalSecs,
        "progress_lists" => ConfigOverrideTarget::ProgressLists,
        "notifications" => ConfigOverrideTarget::Notifications,
        "log_level" => ConfigOverrideTarget::LogLevel,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride {
        target,
        value: value_raw.trim().to_string(),
    })
}

/// Folds every `--config-override` into one set of overrides; later entries win.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::PollIntervalSecs => {
                let secs = parsed
                    .value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        format!(
                            "poll_interval_secs must be a positive integer, got '{}'",
                            parsed.value
                        )
                    })?;
                overrides.poll_interval_secs = Some(secs);
            }
            ConfigOverrideTarget::ProgressLists => {
                let count = parsed.value.parse::<usize>().map_err(|_| {
                    format!("progress_lists must be an integer, got '{}'", parsed.value)
                })?;
                overrides.progress_lists = Some(count);
            }
            ConfigOverrideTarget::Notifications => {
                overrides.notifications = Some(parse_bool(&parsed.value)?);
            }
            ConfigOverrideTarget::LogLevel => {
                let level = canonical_log_level(&parsed.value)
                    .ok_or_else(|| format!("unknown log_level '{}'", parsed.value))?;
                overrides.log_level = Some(level);
            }
        }
    }
    Ok(overrides)
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{other}'")),
    }
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
