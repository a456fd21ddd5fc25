#![forbid(unsafe_code)]

//! Opt-in trait for navigators whose state survives a content rebuild.
//!
//! When a menu's content provider produces a fresh forest (after an action
//! changed the world), the navigator must keep the user's place: what was
//! expanded, which child was last visited, where the cursor was. [`Stateful`]
//! is the contract for extracting that state and reapplying it to new content.
//!
//! # Invariants
//!
//! 1. **Round trip**: `restore_state(save_state())` on unchanged content
//!    yields the same observable state.
//! 2. **Clamping**: `restore_state` validates everything against the current
//!    content and silently drops ids that no longer apply.
//! 3. **Key uniqueness**: two distinct navigator instances produce distinct
//!    [`StateKey`]s.
//! 4. **No side effects**: `save_state` is a pure read.

use core::fmt;

/// Identifier for a navigator's persisted state.
///
/// ```
/// # use keynav_widgets::stateful::StateKey;
/// let key = StateKey::new("TreeNavigator", "building-menu");
/// assert_eq!(key.canonical(), "TreeNavigator::building-menu");
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StateKey {
    /// The navigator type name.
    pub widget_type: &'static str,
    /// Instance-unique identifier, usually the menu name.
    pub instance_id: String,
}

impl StateKey {
    /// Create a key from a type name and instance id.
    #[must_use]
    pub fn new(widget_type: &'static str, id: impl Into<String>) -> Self {
        Self {
            widget_type,
            instance_id: id.into(),
        }
    }

    /// Canonical string form: `"widget_type::instance_id"`.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.widget_type, self.instance_id)
    }
}

/// Save and restore the user-facing part of a navigator's state.
pub trait Stateful: Sized {
    /// Snapshot type. `Default` is the state of a freshly opened navigator.
    type State: Default;

    /// Unique key identifying this instance.
    fn state_key(&self) -> StateKey;

    /// Extract the current state.
    fn save_state(&self) -> Self::State;

    /// Reapply a snapshot, clamping it to the current content.
    fn restore_state(&mut self, state: Self::State);
}
