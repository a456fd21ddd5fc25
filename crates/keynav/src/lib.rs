#![forbid(unsafe_code)]

//! keynav public facade crate.
//!
//! Re-exports the common types from the internal crates and offers a
//! prelude for hosts wiring menus into a session.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use keynav_core::announce::{Announcement, Cue, Feedback, Narrator, Priority, Silent};
pub use keynav_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use keynav_core::geometry::{CellRect, GridCell};

// --- Widget re-exports -----------------------------------------------------

pub use keynav_widgets::{
    Forest, ForestError, NavResponse, NodeKind, RectSelectOptions, RectangleSelection, StateKey,
    Stateful, TreeAction, TreeNavOptions, TreeNavigator, TreeNode, TypeaheadSearch,
};

// --- Runtime re-exports ----------------------------------------------------

pub use keynav_runtime::{
    Activation, ActivationHandler, ConfigError, ContentProvider, KeyDisposition, Menu, MenuHandle,
    NavConfig, Output, RectSelectMode, Session, SessionError, TreeMenu, handler_fn, provider_fn,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for keynav hosts.
#[derive(Debug)]
pub enum Error {
    /// I/O failure in the host's input or output.
    Io(std::io::Error),
    /// A content provider built an invalid forest.
    Forest(ForestError),
    /// A session operation failed.
    Session(SessionError),
    /// Malformed configuration.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Forest(err) => write!(f, "{err}"),
            Self::Session(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Forest(err) => Some(err),
            Self::Session(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ForestError> for Error {
    fn from(err: ForestError) -> Self {
        Self::Forest(err)
    }
}

impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for keynav APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Activation, Announcement, CellRect, Cue, Error, Feedback, GridCell, KeyCode,
        KeyDisposition, KeyEvent, Modifiers, Narrator, NavConfig, NodeKind, Output, Priority,
        RectSelectMode, Result, Session, TreeMenu, TreeNode, handler_fn, provider_fn,
    };

    pub use crate::{core, runtime, widgets};
}

pub use keynav_core as core;
pub use keynav_runtime as runtime;
pub use keynav_widgets as widgets;
