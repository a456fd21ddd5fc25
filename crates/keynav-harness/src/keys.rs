#![forbid(unsafe_code)]

//! Key scripts: compact, readable key sequences for tests.
//!
//! A script is a whitespace-separated list of tokens:
//!
//! | Token | Key |
//! |---|---|
//! | `up` `down` `left` `right` | arrows |
//! | `enter` `esc` `tab` `backtab` `space` | the named key |
//! | `bs` / `backspace`, `del` / `delete` | editing keys |
//! | `home` `end` `pgup` `pgdn` | paging keys |
//! | `f1` .. `f24` | function keys |
//! | any single character | that character |
//! | `'text'` | each character of `text`, spaces included |
//!
//! Names are case-insensitive. Prefix a token with `ctrl+`, `alt+`,
//! `shift+` or `super+` to add modifiers, e.g. `ctrl+c`.
//!
//! ```
//! use keynav_harness::keys;
//! use keynav_core::event::KeyCode;
//!
//! let script = keys("right down 'ap' enter").unwrap();
//! assert_eq!(script.len(), 5);
//! assert_eq!(script[2].code, KeyCode::Char('a'));
//! ```

use keynav_core::event::{KeyCode, KeyEvent, Modifiers};
use std::fmt;

/// A malformed key script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyScriptError {
    /// A token that names no key.
    UnknownKey(String),
    /// A quoted run with no closing quote.
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        offset: usize,
    },
}

impl fmt::Display for KeyScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(token) => write!(f, "unknown key '{token}'"),
            Self::UnterminatedQuote { offset } => {
                write!(f, "unterminated quote starting at byte {offset}")
            }
        }
    }
}

impl std::error::Error for KeyScriptError {}

/// Parse a key script into press events.
pub fn keys(script: &str) -> Result<Vec<KeyEvent>, KeyScriptError> {
    let mut events = Vec::new();
    let mut rest = script;
    let mut offset = 0;

    loop {
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();
        rest = trimmed;
        if rest.is_empty() {
            return Ok(events);
        }

        if let Some(quoted) = rest.strip_prefix('\'') {
            let Some(end) = quoted.find('\'') else {
                return Err(KeyScriptError::UnterminatedQuote { offset });
            };
            events.extend(quoted[..end].chars().map(|c| KeyEvent::new(KeyCode::Char(c))));
            let consumed = end + 2;
            rest = &rest[consumed..];
            offset += consumed;
            continue;
        }

        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        events.push(key(&rest[..end])?);
        rest = &rest[end..];
        offset += end;
    }
}

/// Parse one token, modifiers included.
pub fn key(token: &str) -> Result<KeyEvent, KeyScriptError> {
    let mut modifiers = Modifiers::NONE;
    let mut base = token;
    while let Some((prefix, rest)) = base.split_once('+') {
        if rest.is_empty() {
            break;
        }
        let modifier = match prefix.to_ascii_lowercase().as_str() {
            "ctrl" => Modifiers::CTRL,
            "alt" => Modifiers::ALT,
            "shift" => Modifiers::SHIFT,
            "super" => Modifiers::SUPER,
            _ => break,
        };
        modifiers |= modifier;
        base = rest;
    }

    let code = key_code(base).ok_or_else(|| KeyScriptError::UnknownKey(token.to_string()))?;
    Ok(KeyEvent::new(code).with_modifiers(modifiers))
}

fn key_code(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Escape,
        "bs" | "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "del" | "delete" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" | "pageup" => KeyCode::PageUp,
        "pgdn" | "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        _ => {
            let n: u8 = lower.strip_prefix('f')?.parse().ok()?;
            if !(1..=24).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
    };
    Some(code)
}
