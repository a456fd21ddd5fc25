#![forbid(unsafe_code)]

//! Core: key events, grid geometry, narration sinks and logging macros.

pub mod announce;
pub mod event;
pub mod geometry;
pub mod logging;

#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace};
