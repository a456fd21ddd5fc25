#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. `KEYNAV_DEMO_GRID`
//! overrides the default grid size; flags override the environment.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest accepted grid side. A full-grid preview holds side² cells.
const MAX_GRID: u32 = 1024;

const HELP_TEXT: &str = "\
keynav demo: narrated keyboard menus in the terminal

USAGE:
    keynav-demo [OPTIONS]

OPTIONS:
    --grid=N        Zone grid side length in cells, 1 to 1024 (default: 32)
    --help, -h      Show this help message
    --version, -V   Show version

KEYBINDINGS:
    F1              Architect menu
    F2              Zone selection
    Ctrl+C          Quit

ENVIRONMENT VARIABLES:
    KEYNAV_DEMO_GRID        Override --grid
    KEYNAV_WRAP             Wrap Up/Down at list ends (default: on)
    KEYNAV_ANNOUNCE_LEVEL   Speak the nesting level (default: off)
    KEYNAV_CURSOR_ECHO      Speak the zone cursor after each move (default: on)
    KEYNAV_DEBUG_TRACE      Print one stderr line per dispatched key
    RUST_LOG                tracing filter for stderr logs";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Side length of the square zone grid.
    pub grid: u32,
}

impl Default for Opts {
    fn default() -> Self {
        Self { grid: 32 }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    pub fn parse() -> Self {
        let env_grid = env::var("KEYNAV_DEMO_GRID").ok();
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(env_grid.as_deref(), &args) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("keynav-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Try --help");
                process::exit(2);
            }
        }
    }

    fn parse_from(env_grid: Option<&str>, args: &[String]) -> Result<Parsed, String> {
        let mut opts = Self::default();
        if let Some(grid) = env_grid.and_then(|v| parse_grid(v).ok()) {
            opts.grid = grid;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                other => {
                    let Some(value) = other.strip_prefix("--grid=") else {
                        return Err(format!("Unknown argument: {other}"));
                    };
                    opts.grid = parse_grid(value)?;
                }
            }
        }
        Ok(Parsed::Run(opts))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Parsed {
    Run(Opts),
    Help,
    Version,
}

fn parse_grid(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(n) if (1..=MAX_GRID).contains(&n) => Ok(n),
        Ok(_) => Err(format!("Grid size must be between 1 and {MAX_GRID}: {value}")),
        Err(_) => Err(format!("Invalid grid size: {value}")),
    }
}
