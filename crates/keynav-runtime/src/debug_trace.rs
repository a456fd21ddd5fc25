#![forbid(unsafe_code)]

//! Per-key dispatch trace on stderr.
//!
//! With `KEYNAV_DEBUG_TRACE` set to `1`, `true`, `yes` or `on`, the session
//! prints one line per routed key:
//!
//! ```text
//! [keynav     1234ms] Architect Down -> Consumed
//! ```
//!
//! The variable is read once. Afterwards each check is a plain bool load.

use std::sync::LazyLock;
use std::time::Instant;

/// Environment variable that turns the trace on.
pub const ENV_VAR: &str = "KEYNAV_DEBUG_TRACE";

static ENABLED: LazyLock<bool> =
    LazyLock::new(|| flag_enabled(std::env::var(ENV_VAR).ok().as_deref()));

static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);

fn flag_enabled(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

/// Whether the trace is on.
#[inline]
pub fn is_enabled() -> bool {
    *ENABLED
}

/// Milliseconds since the first timestamp was taken.
#[inline]
pub fn elapsed_ms() -> u64 {
    u64::try_from(EPOCH.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// `eprintln!` with a timestamp prefix, only when the trace is on.
#[macro_export]
macro_rules! debug_trace {
    ($($arg:tt)*) => {
        if $crate::debug_trace::is_enabled() {
            eprintln!(
                "[keynav {:>8}ms] {}",
                $crate::debug_trace::elapsed_ms(),
                format_args!($($arg)*)
            );
        }
    };
}
