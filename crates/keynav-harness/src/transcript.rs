#![forbid(unsafe_code)]

//! Recording narration and feedback sinks.
//!
//! Both sinks append to one shared [`Transcript`], so speech and cues stay in
//! the order the session produced them.

use keynav_core::announce::{Cue, Feedback, Narrator, Priority};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One recorded output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Spoken text.
    Speech {
        /// Text.
        text: String,
        /// Priority it was spoken at.
        priority: Priority,
    },
    /// Audio cue.
    Cue(Cue),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Speech {
                text,
                priority: Priority::Normal,
            } => f.write_str(text),
            Self::Speech { text, priority } => write!(f, "({priority}) {text}"),
            Self::Cue(Cue::Tick) => f.write_str("[tick]"),
            Self::Cue(Cue::Reject) => f.write_str("[reject]"),
        }
    }
}

/// Shared, clonable output log.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Arc<Mutex<Vec<Line>>>,
}

impl Transcript {
    /// An empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Line>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a line.
    pub fn push(&self, line: Line) {
        self.lock().push(line);
    }

    /// A copy of every line so far.
    #[must_use]
    pub fn lines(&self) -> Vec<Line> {
        self.lock().clone()
    }

    /// Remove and return every line so far.
    pub fn take(&self) -> Vec<Line> {
        std::mem::take(&mut *self.lock())
    }

    /// Remove every line and render each with [`Line`]'s `Display`.
    pub fn take_rendered(&self) -> Vec<String> {
        self.take().iter().map(Line::to_string).collect()
    }

    /// Spoken text only, in order.
    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|line| match line {
                Line::Speech { text, .. } => Some(text.clone()),
                Line::Cue(_) => None,
            })
            .collect()
    }

    /// Cues only, in order.
    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.lock()
            .iter()
            .filter_map(|line| match line {
                Line::Cue(cue) => Some(*cue),
                Line::Speech { .. } => None,
            })
            .collect()
    }

    /// The most recent spoken text.
    #[must_use]
    pub fn last_spoken(&self) -> Option<String> {
        self.lock().iter().rev().find_map(|line| match line {
            Line::Speech { text, .. } => Some(text.clone()),
            Line::Cue(_) => None,
        })
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// A narrator writing into this transcript.
    #[must_use]
    pub fn narrator(&self) -> RecordingNarrator {
        RecordingNarrator(self.clone())
    }

    /// A feedback sink writing into this transcript.
    #[must_use]
    pub fn feedback(&self) -> RecordingFeedback {
        RecordingFeedback(self.clone())
    }
}

/// [`Narrator`] that records into a [`Transcript`].
#[derive(Debug, Clone)]
pub struct RecordingNarrator(Transcript);

impl Narrator for RecordingNarrator {
    fn speak(&mut self, text: &str, priority: Priority) {
        self.0.push(Line::Speech {
            text: text.to_string(),
            priority,
        });
    }
}

/// [`Feedback`] that records into a [`Transcript`].
#[derive(Debug, Clone)]
pub struct RecordingFeedback(Transcript);

impl Feedback for RecordingFeedback {
    fn play_tick(&mut self) {
        self.0.push(Line::Cue(Cue::Tick));
    }

    fn play_reject(&mut self) {
        self.0.push(Line::Cue(Cue::Reject));
    }
}
