#![forbid(unsafe_code)]

//! keynav demo binary entry point.
//!
//! Narration goes to stdout as `(priority) text`, cues as `[tick]` and
//! `[reject]`. Logs go to stderr, filtered by `RUST_LOG`.

mod cli;
mod sample;

use keynav::prelude::*;
use keynav::Event;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Prints narration on its own line. Raw mode needs explicit carriage returns.
struct StdoutNarrator;

impl Narrator for StdoutNarrator {
    fn speak(&mut self, text: &str, priority: Priority) {
        let _ = write!(io::stdout(), "({priority}) {text}\r\n");
        let _ = io::stdout().flush();
    }
}

struct StdoutFeedback;

impl Feedback for StdoutFeedback {
    fn play_tick(&mut self) {
        let _ = write!(io::stdout(), "[tick]\r\n");
    }

    fn play_reject(&mut self) {
        let _ = write!(io::stdout(), "[reject]\r\n");
    }
}

/// Raw mode for the lifetime of the guard.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
        tracing::info!("terminal raw mode disabled");
    }
}

fn main() {
    let opts = cli::Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&opts) {
        eprintln!("keynav-demo: {err}");
        std::process::exit(1);
    }
}

fn run(opts: &cli::Opts) -> keynav::Result<()> {
    let config = NavConfig::from_env()?;
    let mut session = Session::new(config, StdoutNarrator, StdoutFeedback);
    let architect = session.register(sample::architect_menu());
    let zones = session.register(sample::zone_mode(opts.grid));

    let _raw = RawMode::enable()?;
    session.announce(&Announcement::high(
        "F1 architect menu, F2 zone selection, Ctrl+C to quit",
    ));

    loop {
        let Some(Event::Key(key)) = Event::from_crossterm(crossterm::event::read()?) else {
            continue;
        };
        if !key.is_actionable() {
            continue;
        }
        if key.ctrl() && key.is_char('c') {
            break;
        }
        match key.code {
            KeyCode::F(1) => {
                session.open(architect)?;
            }
            KeyCode::F(2) => {
                session.open(zones)?;
            }
            _ => {
                let disposition = session.dispatch(&key);
                tracing::debug!(code = ?key.code, ?disposition, "key dispatched");
                if disposition == KeyDisposition::Ignored && !session.has_focus() {
                    session.announce(&Announcement::low("No menu open, press F1 or F2"));
                }
            }
        }
    }
    session.close_active();
    Ok(())
}
