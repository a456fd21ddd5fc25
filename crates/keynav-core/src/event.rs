#![forbid(unsafe_code)]

//! Keyboard input as the navigation state machines see it.
//!
//! Hosts translate whatever they receive (game key codes, terminal events)
//! into [`KeyEvent`]s. The `crossterm` feature ships that translation for
//! crossterm via [`Event::from_crossterm`].
//!
//! Release events are representable so hosts can forward everything, but
//! only presses and auto-repeats are [actionable](KeyEvent::is_actionable).

use bitflags::bitflags;
#[cfg(feature = "crossterm")]
use crossterm::event as cte;

/// Input that may reach a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press, repeat or release.
    Key(KeyEvent),
    /// The host window gained (`true`) or lost (`false`) focus.
    Focus(bool),
}

impl Event {
    /// The key event, if this is one.
    #[must_use]
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) => Some(key),
            Self::Focus(_) => None,
        }
    }

    /// Translate a crossterm event. Mouse, paste, resize and keys with no
    /// [`KeyCode`] counterpart yield `None`.
    #[cfg(feature = "crossterm")]
    #[must_use]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) => {
                let code = crossterm_code(key.code)?;
                Some(Self::Key(KeyEvent {
                    code,
                    modifiers: crossterm_modifiers(key.modifiers),
                    kind: match key.kind {
                        cte::KeyEventKind::Press => KeyEventKind::Press,
                        cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
                        cte::KeyEventKind::Release => KeyEventKind::Release,
                    },
                }))
            }
            cte::Event::FocusGained => Some(Self::Focus(true)),
            cte::Event::FocusLost => Some(Self::Focus(false)),
            _ => None,
        }
    }
}

/// One key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key.
    pub code: KeyCode,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Press, repeat or release.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// An unmodified press of `code`.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Replace the modifiers (builder).
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the kind (builder).
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is the character key `c`, ignoring modifiers.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }

    /// Whether Ctrl is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Whether Alt is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Whether Shift is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Presses and repeats drive navigation; releases do not.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(self.kind, KeyEventKind::Release)
    }

    /// The character this key contributes to a typeahead query.
    ///
    /// Control characters and chords with Ctrl, Alt or Super contribute
    /// nothing. Shift is fine: it only picks the case.
    #[must_use]
    pub fn typed_char(&self) -> Option<char> {
        let KeyCode::Char(c) = self.code else {
            return None;
        };
        let chord = Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER;
        if c.is_control() || self.modifiers.intersects(chord) {
            return None;
        }
        Some(c)
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

/// Keys the navigation layer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable or control character.
    Char(char),
    /// Enter or Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
    /// Tab.
    Tab,
    /// Shift+Tab as reported by terminals.
    BackTab,
    /// Forward delete.
    Delete,
    /// Home.
    Home,
    /// End.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Function key `F1` through `F24`.
    F(u8),
}

/// Phase of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key went down. Sources that cannot tell report this.
    #[default]
    Press,
    /// Auto-repeat while held.
    Repeat,
    /// Key went up.
    Release,
}

bitflags! {
    /// Held modifier keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const NONE  = 0;
        const SHIFT = 1;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
        /// Super, Meta, Hyper or Command.
        const SUPER = 1 << 3;
    }
}

#[cfg(feature = "crossterm")]
fn crossterm_code(code: cte::KeyCode) -> Option<KeyCode> {
    use cte::KeyCode as C;
    Some(match code {
        C::Char(c) => KeyCode::Char(c),
        C::Enter => KeyCode::Enter,
        C::Esc => KeyCode::Escape,
        C::Backspace => KeyCode::Backspace,
        C::Tab => KeyCode::Tab,
        C::BackTab => KeyCode::BackTab,
        C::Delete => KeyCode::Delete,
        C::Home => KeyCode::Home,
        C::End => KeyCode::End,
        C::PageUp => KeyCode::PageUp,
        C::PageDown => KeyCode::PageDown,
        C::Up => KeyCode::Up,
        C::Down => KeyCode::Down,
        C::Left => KeyCode::Left,
        C::Right => KeyCode::Right,
        C::F(n) => KeyCode::F(n),
        _ => return None,
    })
}

#[cfg(feature = "crossterm")]
fn crossterm_modifiers(held: cte::KeyModifiers) -> Modifiers {
    use cte::KeyModifiers as M;
    [
        (M::SHIFT, Modifiers::SHIFT),
        (M::ALT, Modifiers::ALT),
        (M::CONTROL, Modifiers::CTRL),
        (M::SUPER, Modifiers::SUPER),
        (M::HYPER, Modifiers::SUPER),
        (M::META, Modifiers::SUPER),
    ]
    .into_iter()
    .filter(|(from, _)| held.contains(*from))
    .fold(Modifiers::NONE, |acc, (_, to)| acc | to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_and_modifier_queries() {
        let key = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        assert!(key.is_char('c'));
        assert!(key.ctrl() && key.shift() && !key.alt());
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert_eq!(KeyEventKind::default(), KeyEventKind::Press);

        let from_code: KeyEvent = KeyCode::Home.into();
        assert_eq!(from_code, KeyEvent::new(KeyCode::Home));
    }

    #[test]
    fn release_is_not_actionable() {
        let press = KeyEvent::new(KeyCode::Down);
        assert!(press.is_actionable());
        assert!(press.with_kind(KeyEventKind::Repeat).is_actionable());
        assert!(!press.with_kind(KeyEventKind::Release).is_actionable());
    }

    #[test]
    fn typed_char_allows_shift_only() {
        let with = |c: char, m: Modifiers| KeyEvent::new(KeyCode::Char(c)).with_modifiers(m);
        assert_eq!(with('a', Modifiers::NONE).typed_char(), Some('a'));
        assert_eq!(with('A', Modifiers::SHIFT).typed_char(), Some('A'));
        assert_eq!(with('a', Modifiers::CTRL).typed_char(), None);
        assert_eq!(with('a', Modifiers::ALT).typed_char(), None);
        assert_eq!(with('a', Modifiers::SUPER).typed_char(), None);
        assert_eq!(with('\u{7f}', Modifiers::NONE).typed_char(), None);
        assert_eq!(KeyEvent::new(KeyCode::Enter).typed_char(), None);
    }

    #[test]
    fn event_as_key() {
        let key = KeyEvent::new(KeyCode::Left);
        assert_eq!(Event::Key(key).as_key(), Some(&key));
        assert_eq!(Event::Focus(true).as_key(), None);
    }

    #[cfg(feature = "crossterm")]
    mod crossterm_input {
        use super::super::*;

        #[test]
        fn modifiers_fold() {
            let held = cte::KeyModifiers::CONTROL | cte::KeyModifiers::META;
            assert_eq!(crossterm_modifiers(held), Modifiers::CTRL | Modifiers::SUPER);
            assert_eq!(crossterm_modifiers(cte::KeyModifiers::NONE), Modifiers::NONE);
        }

        #[test]
        fn codes() {
            assert_eq!(crossterm_code(cte::KeyCode::Esc), Some(KeyCode::Escape));
            assert_eq!(crossterm_code(cte::KeyCode::F(5)), Some(KeyCode::F(5)));
            assert_eq!(crossterm_code(cte::KeyCode::Insert), None);
        }

        #[test]
        fn key_press_and_release() {
            let press = cte::KeyEvent::new(cte::KeyCode::Char('x'), cte::KeyModifiers::SHIFT);
            assert_eq!(
                Event::from_crossterm(cte::Event::Key(press)),
                Some(Event::Key(
                    KeyEvent::new(KeyCode::Char('x')).with_modifiers(Modifiers::SHIFT)
                ))
            );

            let release = cte::KeyEvent::new_with_kind(
                cte::KeyCode::Down,
                cte::KeyModifiers::NONE,
                cte::KeyEventKind::Release,
            );
            let mapped = Event::from_crossterm(cte::Event::Key(release));
            assert_eq!(
                mapped.as_ref().and_then(Event::as_key).map(|k| k.kind),
                Some(KeyEventKind::Release)
            );
        }

        #[test]
        fn non_key_events() {
            assert_eq!(Event::from_crossterm(cte::Event::Resize(80, 24)), None);
            assert_eq!(
                Event::from_crossterm(cte::Event::FocusLost),
                Some(Event::Focus(false))
            );
        }
    }
}
