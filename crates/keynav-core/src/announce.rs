#![forbid(unsafe_code)]

//! Narration and audio-cue output.
//!
//! State machines never talk to a speech engine directly. They return
//! [`Announcement`]s and [`Cue`]s, and the session layer forwards them to the
//! host's [`Narrator`] and [`Feedback`] sinks. Both sinks are fire-and-forget.

use std::fmt;

/// Coarse narration priority.
///
/// `Low` marks chatter (live rectangle sizes, cursor echo) that a speech
/// engine may drop or interrupt in favor of explicit user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Priority {
    /// Suppressible background chatter.
    Low,
    /// Response to a user action.
    #[default]
    Normal,
    /// Must be heard (errors, mode changes).
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

/// One narrated string with its priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Text handed to the speech sink.
    pub text: String,
    /// Interruption priority.
    pub priority: Priority,
}

impl Announcement {
    /// Normal-priority announcement.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            priority: Priority::Normal,
        }
    }

    /// Low-priority announcement.
    pub fn low(text: impl Into<String>) -> Self {
        Self::new(text).with_priority(Priority::Low)
    }

    /// High-priority announcement.
    pub fn high(text: impl Into<String>) -> Self {
        Self::new(text).with_priority(Priority::High)
    }

    /// Set the priority (builder).
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Short non-speech audio feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// The action succeeded.
    Tick,
    /// The action was rejected in the current state.
    Reject,
}

/// Speech output sink.
pub trait Narrator {
    /// Speak `text` at the given priority.
    fn speak(&mut self, text: &str, priority: Priority);

    /// Speak an announcement.
    fn announce(&mut self, announcement: &Announcement) {
        self.speak(&announcement.text, announcement.priority);
    }
}

/// Audio cue sink.
pub trait Feedback {
    /// Play the success tick.
    fn play_tick(&mut self);

    /// Play the rejection tone.
    fn play_reject(&mut self);

    /// Play a cue.
    fn play(&mut self, cue: Cue) {
        match cue {
            Cue::Tick => self.play_tick(),
            Cue::Reject => self.play_reject(),
        }
    }
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Narrator for Silent {
    fn speak(&mut self, _text: &str, _priority: Priority) {}
}

impl Feedback for Silent {
    fn play_tick(&mut self) {}

    fn play_reject(&mut self) {}
}

impl<F> Narrator for F
where
    F: FnMut(&str, Priority),
{
    fn speak(&mut self, text: &str, priority: Priority) {
        self(text, priority)
    }
}
