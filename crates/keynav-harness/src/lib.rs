#![forbid(unsafe_code)]

//! Scripted end-to-end testing for keynav sessions.
//!
//! - **Recording sinks**: [`Transcript`] captures speech and cues in order.
//! - **Key scripts**: [`keys`] turns `"right down 'ap' enter"` into events.
//! - **Session driver**: [`SessionHarness`] wires both into a [`Session`].
//!
//! # Quick Start
//!
//! ```ignore
//! use keynav_harness::SessionHarness;
//!
//! let mut h = SessionHarness::new(NavConfig::default());
//! let menu = h.register(TreeMenu::new("Quests", provider, handler));
//! h.open(menu)?;
//! h.press("right down enter")?;
//! assert_eq!(h.take_spoken(), vec!["Active, expanded, 1 of 1", "Hunt, 1 of 2"]);
//! ```

pub mod keys;
pub mod transcript;

pub use keys::{KeyScriptError, key, keys};
pub use transcript::{Line, RecordingFeedback, RecordingNarrator, Transcript};

use keynav_runtime::config::NavConfig;
use keynav_runtime::session::{KeyDisposition, Menu, MenuHandle, Session, SessionError};

/// A [`Session`] speaking into a [`Transcript`].
#[derive(Debug)]
pub struct SessionHarness {
    session: Session,
    transcript: Transcript,
}

impl SessionHarness {
    /// A session over recording sinks.
    pub fn new(config: NavConfig) -> Self {
        let transcript = Transcript::new();
        let session = Session::new(config, transcript.narrator(), transcript.feedback());
        Self {
            session,
            transcript,
        }
    }

    /// The wrapped session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The wrapped session, mutably.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The shared transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Register a menu.
    pub fn register(&mut self, menu: impl Menu + 'static) -> MenuHandle {
        self.session.register(menu)
    }

    /// Open a menu.
    pub fn open(&mut self, handle: MenuHandle) -> Result<bool, SessionError> {
        self.session.open(handle)
    }

    /// Dispatch every key in `script`, returning each disposition.
    pub fn press(&mut self, script: &str) -> Result<Vec<KeyDisposition>, KeyScriptError> {
        let events = keys(script)?;
        Ok(events.iter().map(|key| self.session.dispatch(key)).collect())
    }

    /// Remove and return spoken text, dropping cues.
    pub fn take_spoken(&mut self) -> Vec<String> {
        let spoken = self.transcript.spoken();
        self.transcript.clear();
        spoken
    }

    /// Remove and return every line rendered as text.
    pub fn take_rendered(&mut self) -> Vec<String> {
        self.transcript.take_rendered()
    }
}
