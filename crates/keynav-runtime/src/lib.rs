#![forbid(unsafe_code)]

//! Session layer: the activation registry, menu adapters over the widget
//! state machines, and configuration.
//!
//! ```ignore
//! let mut session = Session::new(NavConfig::from_env()?, narrator, feedback);
//! let quests = session.register(TreeMenu::new("Quests", provider, handler));
//! session.open(quests)?;
//! session.dispatch(&KeyEvent::new(KeyCode::Down));
//! ```

pub mod config;
pub mod debug_trace;
pub mod rect_menu;
pub mod session;
pub mod tree_menu;

pub use config::{ConfigError, NavConfig};
pub use rect_menu::RectSelectMode;
pub use session::{KeyDisposition, Menu, MenuHandle, Output, Session, SessionError};
pub use tree_menu::{
    Activation, ActivationHandler, ContentProvider, TreeMenu, handler_fn, provider_fn,
};
