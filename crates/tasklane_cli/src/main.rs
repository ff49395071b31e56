use clap::Parser;
use std::io::{self, IsTerminal};
use std::sync::mpsc;
use std::time::Instant;
use tasklane_cli::cli::{Args, collect_overrides};
use tasklane_cli::logging::init_tracing;
use tasklane_cli::shell::{Shell, spawn_line_reader};
use tasklane_core::AppError;
use tasklane_core::config::{load_config_with_fallback, merge_overrides};
use tasklane_core::due::local_offset;
use tasklane_core::notify::notifier_from_env;
use tasklane_core::timer::PollTimer;
use tasklane_core::tracker::Tracker;
use tracing::warn;

fn run(args: Args) -> Result<(), AppError> {
    // Must run before any thread is spawned.
    let offset = local_offset();

    let overrides = collect_overrides(&args.config_override).map_err(AppError::validation)?;
    let load = load_config_with_fallback(args.config.as_deref());
    let config = merge_overrides(&load.config, &overrides);

    init_tracing(args.verbose, args.quiet, config.log_level.as_deref())?;
    if let Some(err) = &load.error {
        warn!(error = %err, "config could not be loaded; using defaults");
    }

    let notifier = notifier_from_env(config.notifications_enabled())?;
    let tracker = Tracker::from_config(&config, offset);
    let timer = PollTimer::new(config.poll_interval(), Instant::now());

    let (events, inbox) = mpsc::channel();
    spawn_line_reader(io::BufReader::new(io::stdin()), events);

    let stdout = io::stdout();
    let ansi = stdout.is_terminal();
    let mut shell = Shell::new(tracker, notifier, timer, stdout.lock()).with_ansi(ansi);
    shell.run(&inbox)
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
