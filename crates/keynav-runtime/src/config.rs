#![forbid(unsafe_code)]

//! Session configuration.
//!
//! [`NavConfig`] gathers the navigator and rectangle options plus the
//! session-level strings. Defaults match the stock behavior; hosts override
//! them with the builder methods or from the environment:
//!
//! | Variable | Field | Format |
//! |---|---|---|
//! | `KEYNAV_WRAP` | `tree.wrap` | bool |
//! | `KEYNAV_ANNOUNCE_LEVEL` | `tree.announce_level` | bool |
//! | `KEYNAV_RECT_SIZE_THRESHOLD` | `rect.size_threshold` | integer ≥ 1 |
//! | `KEYNAV_RECT_MIN_COUNT` | `rect.min_count_narration` | integer |
//! | `KEYNAV_CURSOR_ECHO` | `cursor_echo` | bool |
//!
//! Booleans accept `1/0`, `true/false`, `yes/no`, `on/off` (any case).

use keynav_widgets::rect_select::RectSelectOptions;
use keynav_widgets::tree_nav::TreeNavOptions;
use std::fmt;

/// Environment variable names read by [`NavConfig::from_env`].
pub mod env_keys {
    /// Wrap Up/Down at the list ends.
    pub const WRAP: &str = "KEYNAV_WRAP";
    /// Append the nesting level to descriptions.
    pub const ANNOUNCE_LEVEL: &str = "KEYNAV_ANNOUNCE_LEVEL";
    /// Width/height from which rectangles are narrated as "W by H".
    pub const RECT_SIZE_THRESHOLD: &str = "KEYNAV_RECT_SIZE_THRESHOLD";
    /// Smallest cell count narrated below the size threshold.
    pub const RECT_MIN_COUNT: &str = "KEYNAV_RECT_MIN_COUNT";
    /// Speak the map cursor position in rectangle mode.
    pub const CURSOR_ECHO: &str = "KEYNAV_CURSOR_ECHO";
}

/// Default narration for a menu with nothing in it.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No items available";

/// A malformed configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Expected a boolean.
    InvalidBool {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
    /// Expected an integer in range.
    InvalidNumber {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBool { key, value } => {
                write!(f, "{key}: expected a boolean, got '{value}'")
            }
            Self::InvalidNumber { key, value } => {
                write!(f, "{key}: expected a positive integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for a [`Session`](crate::session::Session) and its menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavConfig {
    /// Tree navigator options.
    pub tree: TreeNavOptions,
    /// Rectangle selection thresholds.
    pub rect: RectSelectOptions,
    /// Spoken when a menu opens with no content.
    pub empty_message: String,
    /// Speak the cursor cell after each move in rectangle mode.
    pub cursor_echo: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            tree: TreeNavOptions::default(),
            rect: RectSelectOptions::default(),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            cursor_echo: true,
        }
    }
}

impl NavConfig {
    /// Defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set tree options.
    #[must_use]
    pub fn with_tree(mut self, tree: TreeNavOptions) -> Self {
        self.tree = tree;
        self
    }

    /// Set rectangle options.
    #[must_use]
    pub fn with_rect(mut self, rect: RectSelectOptions) -> Self {
        self.rect = rect;
        self
    }

    /// Set the empty-menu narration.
    #[must_use]
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Enable or disable cursor echo.
    #[must_use]
    pub fn with_cursor_echo(mut self, echo: bool) -> Self {
        self.cursor_echo = echo;
        self
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Unset keys keep their
    /// defaults; malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup(env_keys::WRAP) {
            config.tree.wrap = parse_bool(env_keys::WRAP, &v)?;
        }
        if let Some(v) = lookup(env_keys::ANNOUNCE_LEVEL) {
            config.tree.announce_level = parse_bool(env_keys::ANNOUNCE_LEVEL, &v)?;
        }
        if let Some(v) = lookup(env_keys::RECT_SIZE_THRESHOLD) {
            let threshold: u32 = parse_number(env_keys::RECT_SIZE_THRESHOLD, &v)?;
            if threshold == 0 {
                return Err(ConfigError::InvalidNumber {
                    key: env_keys::RECT_SIZE_THRESHOLD,
                    value: v,
                });
            }
            config.rect.size_threshold = threshold;
        }
        if let Some(v) = lookup(env_keys::RECT_MIN_COUNT) {
            config.rect.min_count_narration = parse_number(env_keys::RECT_MIN_COUNT, &v)?;
        }
        if let Some(v) = lookup(env_keys::CURSOR_ECHO) {
            config.cursor_echo = parse_bool(env_keys::CURSOR_ECHO, &v)?;
        }
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = NavConfig::default();
        assert!(config.tree.wrap);
        assert!(!config.tree.announce_level);
        assert_eq!(config.rect.size_threshold, 5);
        assert_eq!(config.rect.min_count_narration, 4);
        assert_eq!(config.empty_message, "No items available");
        assert!(config.cursor_echo);
    }

    #[test]
    fn empty_lookup_is_default() {
        assert_eq!(NavConfig::from_lookup(|_| None).unwrap(), NavConfig::default());
    }

    #[test]
    fn overlays_all_keys() {
        let config = NavConfig::from_lookup(lookup(&[
            ("KEYNAV_WRAP", "off"),
            ("KEYNAV_ANNOUNCE_LEVEL", "YES"),
            ("KEYNAV_RECT_SIZE_THRESHOLD", " 8 "),
            ("KEYNAV_RECT_MIN_COUNT", "2"),
            ("KEYNAV_CURSOR_ECHO", "0"),
        ]))
        .unwrap();
        assert!(!config.tree.wrap);
        assert!(config.tree.announce_level);
        assert_eq!(config.rect.size_threshold, 8);
        assert_eq!(config.rect.min_count_narration, 2);
        assert!(!config.cursor_echo);
    }

    #[test]
    fn malformed_bool() {
        let err = NavConfig::from_lookup(lookup(&[("KEYNAV_WRAP", "maybe")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBool {
                key: "KEYNAV_WRAP",
                value: "maybe".into()
            }
        );
        assert_eq!(err.to_string(), "KEYNAV_WRAP: expected a boolean, got 'maybe'");
    }

    #[test]
    fn malformed_and_zero_threshold() {
        assert!(matches!(
            NavConfig::from_lookup(lookup(&[("KEYNAV_RECT_SIZE_THRESHOLD", "-1")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            NavConfig::from_lookup(lookup(&[("KEYNAV_RECT_SIZE_THRESHOLD", "0")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            NavConfig::from_lookup(lookup(&[("KEYNAV_RECT_MIN_COUNT", "lots")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn builders() {
        let config = NavConfig::new()
            .with_empty_message("Nothing here")
            .with_cursor_echo(false)
            .with_tree(TreeNavOptions::default().with_wrap(false))
            .with_rect(RectSelectOptions::default().with_size_threshold(3));
        assert_eq!(config.empty_message, "Nothing here");
        assert!(!config.cursor_echo);
        assert!(!config.tree.wrap);
        assert_eq!(config.rect.size_threshold, 3);
    }
}
