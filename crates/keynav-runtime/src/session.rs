#![forbid(unsafe_code)]

//! Activation registry.
//!
//! A [`Session`] owns the narration and feedback sinks and every registered
//! [`Menu`]. At most one menu is active at a time: opening a menu closes the
//! active one first, and keys are routed to the active menu only.
//!
//! # Lifecycle
//!
//! ```text
//! register ──▶ closed ──open──▶ active ──Escape / Close──▶ closed
//!                 ▲               │
//!                 └── open(other) ┘
//! ```
//!
//! A menu that has nothing to show narrates the configured empty message on
//! open and never becomes active.

use crate::config::NavConfig;
use crate::debug_trace;
use keynav_core::announce::{Announcement, Cue, Feedback, Narrator, Priority, Silent};
use keynav_core::event::KeyEvent;
use keynav_widgets::tree::ForestError;
use keynav_widgets::tree_nav::NavResponse;
use std::fmt;

/// Borrowed narration and feedback sinks handed to menus.
pub struct Output<'a> {
    narrator: &'a mut dyn Narrator,
    feedback: &'a mut dyn Feedback,
}

impl<'a> Output<'a> {
    /// Wrap a pair of sinks.
    pub fn new(narrator: &'a mut dyn Narrator, feedback: &'a mut dyn Feedback) -> Self {
        Self { narrator, feedback }
    }

    /// Speak at the given priority.
    pub fn speak(&mut self, text: &str, priority: Priority) {
        self.narrator.speak(text, priority);
    }

    /// Speak at normal priority.
    pub fn say(&mut self, text: &str) {
        self.speak(text, Priority::Normal);
    }

    /// Speak an announcement.
    pub fn announce(&mut self, announcement: &Announcement) {
        self.narrator.announce(announcement);
    }

    /// Play a cue.
    pub fn cue(&mut self, cue: Cue) {
        self.feedback.play(cue);
    }

    /// Play the cue, then speak the announcement, of a navigator response.
    pub fn deliver(&mut self, response: &NavResponse) {
        if let Some(cue) = response.cue {
            self.cue(cue);
        }
        if let Some(announcement) = &response.announcement {
            self.announce(announcement);
        }
    }
}

impl fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

/// What happened to a routed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDisposition {
    /// The active menu handled the key.
    Consumed,
    /// No menu is active, or the active menu does not bind the key.
    Ignored,
    /// The active menu finished and has been closed.
    Closed,
}

/// A keyboard-driven mode that can own focus.
pub trait Menu {
    /// Name used in logs and the state key.
    fn name(&self) -> &str;

    /// Build content and announce the initial position.
    ///
    /// Returns `Ok(false)` when there is nothing to navigate; the menu must
    /// then have narrated the empty message and stay closed.
    fn open(&mut self, config: &NavConfig, out: &mut Output<'_>) -> Result<bool, SessionError>;

    /// Drop all navigation state. Idempotent.
    fn close(&mut self);

    /// Whether the menu holds navigation state.
    fn is_open(&self) -> bool;

    /// Handle one key while active.
    fn handle_key(&mut self, key: &KeyEvent, out: &mut Output<'_>) -> KeyDisposition;
}

/// Handle to a registered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuHandle(usize);

impl MenuHandle {
    /// Registration index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MenuHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu#{}", self.0)
    }
}

/// Errors raised by the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The handle was not issued by this session.
    UnknownMenu(MenuHandle),
    /// A content provider produced an invalid forest.
    Forest {
        /// Menu whose provider failed.
        menu: String,
        /// What was wrong.
        source: ForestError,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMenu(handle) => write!(f, "unknown menu handle {handle}"),
            Self::Forest { menu, source } => write!(f, "menu '{menu}' built an invalid tree: {source}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownMenu(_) => None,
            Self::Forest { source, .. } => Some(source),
        }
    }
}

/// Owner of the sinks and the activation registry.
pub struct Session {
    config: NavConfig,
    narrator: Box<dyn Narrator>,
    feedback: Box<dyn Feedback>,
    menus: Vec<Box<dyn Menu>>,
    active: Option<MenuHandle>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.menus.iter().map(|m| m.name()).collect();
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("menus", &names)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session speaking through the given sinks.
    pub fn new(
        config: NavConfig,
        narrator: impl Narrator + 'static,
        feedback: impl Feedback + 'static,
    ) -> Self {
        Self {
            config,
            narrator: Box::new(narrator),
            feedback: Box::new(feedback),
            menus: Vec::new(),
            active: None,
        }
    }

    /// A session with silent sinks.
    #[must_use]
    pub fn silent(config: NavConfig) -> Self {
        Self::new(config, Silent, Silent)
    }

    /// The configuration menus are opened with.
    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next open.
    pub fn set_config(&mut self, config: NavConfig) {
        self.config = config;
    }

    /// Add a menu to the registry. It starts closed.
    pub fn register(&mut self, menu: impl Menu + 'static) -> MenuHandle {
        let handle = MenuHandle(self.menus.len());
        tracing::debug!(menu = menu.name(), %handle, "menu registered");
        self.menus.push(Box::new(menu));
        handle
    }

    /// Number of registered menus.
    #[must_use]
    pub fn menu_count(&self) -> usize {
        self.menus.len()
    }

    /// Name of a registered menu.
    #[must_use]
    pub fn menu_name(&self, handle: MenuHandle) -> Option<&str> {
        self.menus.get(handle.0).map(|m| m.name())
    }

    /// The active menu, if any.
    #[must_use]
    pub fn active(&self) -> Option<MenuHandle> {
        self.active
    }

    /// Whether `handle` is the active menu.
    #[must_use]
    pub fn is_active(&self, handle: MenuHandle) -> bool {
        self.active == Some(handle)
    }

    /// Whether any menu owns focus.
    #[must_use]
    pub fn has_focus(&self) -> bool {
        self.active.is_some()
    }

    /// Open a menu, closing the active one first.
    ///
    /// Returns `Ok(true)` when the menu became active, `Ok(false)` when it had
    /// nothing to show.
    pub fn open(&mut self, handle: MenuHandle) -> Result<bool, SessionError> {
        if handle.0 >= self.menus.len() {
            return Err(SessionError::UnknownMenu(handle));
        }
        self.close_active();

        let menu = &mut self.menus[handle.0];
        let mut out = Output::new(self.narrator.as_mut(), self.feedback.as_mut());
        let opened = match menu.open(&self.config, &mut out) {
            Ok(opened) => opened,
            Err(err) => {
                tracing::warn!(menu = menu.name(), error = %err, "menu failed to open");
                menu.close();
                return Err(err);
            }
        };

        if opened {
            self.active = Some(handle);
            tracing::info!(menu = menu.name(), "menu activated");
        } else {
            menu.close();
            tracing::debug!(menu = menu.name(), "menu empty, not activated");
        }
        Ok(opened)
    }

    /// Route a key to the active menu.
    pub fn dispatch(&mut self, key: &KeyEvent) -> KeyDisposition {
        if !key.is_actionable() {
            return KeyDisposition::Ignored;
        }
        let Some(handle) = self.active else {
            return KeyDisposition::Ignored;
        };
        let Some(menu) = self.menus.get_mut(handle.0) else {
            self.active = None;
            return KeyDisposition::Ignored;
        };

        let mut out = Output::new(self.narrator.as_mut(), self.feedback.as_mut());
        let disposition = menu.handle_key(key, &mut out);
        debug_trace!("{} {:?} -> {:?}", menu.name(), key.code, disposition);

        if disposition == KeyDisposition::Closed {
            menu.close();
            self.active = None;
            tracing::info!(menu = menu.name(), "menu closed by key");
        }
        disposition
    }

    /// Close the active menu. Returns false if none was active.
    pub fn close_active(&mut self) -> bool {
        let Some(handle) = self.active.take() else {
            return false;
        };
        if let Some(menu) = self.menus.get_mut(handle.0) {
            menu.close();
            tracing::info!(menu = menu.name(), "menu closed");
        }
        true
    }

    /// Speak outside any menu, e.g. host status messages.
    pub fn announce(&mut self, announcement: &Announcement) {
        self.narrator.announce(announcement);
    }
}
