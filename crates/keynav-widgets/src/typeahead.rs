#![forbid(unsafe_code)]

//! Incremental typeahead search over a list of labels.
//!
//! Typed characters accumulate into a case-folded buffer. A label matches when
//! it *starts with* the buffer, compared case-insensitively; there is no infix
//! or fuzzy matching. A character that would leave no matches is rejected and
//! the buffer rolls back, while the attempted text stays available through
//! [`TypeaheadSearch::last_failed_search`] for the "no matches" announcement.
//!
//! The engine owns no labels. Callers pass the current label list on every
//! call, so it never goes stale when the underlying list is rebuilt.
//!
//! # Invariants
//!
//! 1. `matches` is non-empty whenever the buffer is non-empty.
//! 2. A rejected character leaves the buffer and matches untouched.
//! 3. Shrinking the buffer never removes a match.
//!
//! # Example
//!
//! ```
//! use keynav_widgets::typeahead::TypeaheadSearch;
//!
//! let labels = ["Apple", "Apricot", "Banana"];
//! let mut search = TypeaheadSearch::new();
//! assert_eq!(search.process_char('a', &labels, 0), Some(0));
//! assert_eq!(search.process_char('p', &labels, 0), Some(0));
//! assert_eq!(search.process_char('r', &labels, 0), Some(1));
//! assert_eq!(search.process_char('x', &labels, 1), None);
//! assert_eq!(search.query(), "apr");
//! assert_eq!(search.last_failed_search(), Some("aprx"));
//! ```

/// Typeahead search state.
#[derive(Debug, Clone, Default)]
pub struct TypeaheadSearch {
    /// Case-folded query.
    buffer: String,
    /// Byte length each accepted keystroke added to `buffer`.
    typed: Vec<usize>,
    /// Indices of labels starting with `buffer`, ascending.
    matches: Vec<usize>,
    /// Position of the selected match within `matches`.
    cursor: usize,
    /// The attempted buffer of the most recent rejected keystroke.
    last_failed: Option<String>,
}

impl TypeaheadSearch {
    /// Create an empty, inactive search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a query is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// The current case-folded query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.buffer
    }

    /// Indices of the labels matching the current query.
    #[must_use]
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    /// Number of labels matching the current query.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// One-based position of the selected match, if a search is active.
    #[must_use]
    pub fn match_position(&self) -> Option<usize> {
        if self.is_active() && !self.matches.is_empty() {
            Some(self.cursor + 1)
        } else {
            None
        }
    }

    /// The attempted (rejected) query from the last failed keystroke.
    ///
    /// Cleared by the next accepted keystroke, backspace, or [`clear`](Self::clear).
    #[must_use]
    pub fn last_failed_search(&self) -> Option<&str> {
        self.last_failed.as_deref()
    }

    /// Append `c` to the query and jump to a match.
    ///
    /// Returns the index of the first match at or after `current`, wrapping
    /// to the first match overall. Returns `None` if no label starts with the
    /// extended query; the query is then left as it was.
    pub fn process_char<S: AsRef<str>>(
        &mut self,
        c: char,
        labels: &[S],
        current: usize,
    ) -> Option<usize> {
        let mark = self.buffer.len();
        self.buffer.extend(c.to_lowercase());
        let matches = prefix_matches(&self.buffer, labels);

        if matches.is_empty() {
            self.last_failed = Some(self.buffer.clone());
            self.buffer.truncate(mark);
            return None;
        }

        self.typed.push(self.buffer.len() - mark);
        self.last_failed = None;
        self.matches = matches;
        Some(self.select_from(current))
    }

    /// Remove the last typed character.
    ///
    /// Returns the newly selected index, or `None` when the query became
    /// empty (the search is then cleared) or no search was active.
    pub fn process_backspace<S: AsRef<str>>(
        &mut self,
        labels: &[S],
        current: usize,
    ) -> Option<usize> {
        let Some(len) = self.typed.pop() else {
            self.clear();
            return None;
        };
        let keep = self.buffer.len().saturating_sub(len);
        self.buffer.truncate(keep);
        self.last_failed = None;

        if self.buffer.is_empty() {
            self.clear();
            return None;
        }

        self.matches = prefix_matches(&self.buffer, labels);
        if self.matches.is_empty() {
            // Labels changed underneath the query.
            self.clear();
            return None;
        }
        Some(self.select_from(current))
    }

    /// The next match after `current`, wrapping to the first.
    ///
    /// Returns `None` when no search is active.
    pub fn next_match(&mut self, current: usize) -> Option<usize> {
        if !self.is_active() || self.matches.is_empty() {
            return None;
        }
        self.cursor = self
            .matches
            .iter()
            .position(|&i| i > current)
            .unwrap_or(0);
        Some(self.matches[self.cursor])
    }

    /// The previous match before `current`, wrapping to the last.
    ///
    /// Returns `None` when no search is active.
    pub fn previous_match(&mut self, current: usize) -> Option<usize> {
        if !self.is_active() || self.matches.is_empty() {
            return None;
        }
        self.cursor = self
            .matches
            .iter()
            .rposition(|&i| i < current)
            .unwrap_or(self.matches.len() - 1);
        Some(self.matches[self.cursor])
    }

    /// Reset to the inactive state. Idempotent.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.typed.clear();
        self.matches.clear();
        self.cursor = 0;
        self.last_failed = None;
    }

    fn select_from(&mut self, current: usize) -> usize {
        self.cursor = self
            .matches
            .iter()
            .position(|&i| i >= current)
            .unwrap_or(0);
        self.matches[self.cursor]
    }
}

/// Indices of labels whose case-folded text starts with `folded_query`.
fn prefix_matches<S: AsRef<str>>(folded_query: &str, labels: &[S]) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| starts_with_folded(label.as_ref(), folded_query))
        .map(|(i, _)| i)
        .collect()
}

fn starts_with_folded(label: &str, folded_query: &str) -> bool {
    let mut folded = label.chars().flat_map(char::to_lowercase);
    folded_query.chars().all(|q| folded.next() == Some(q))
}
