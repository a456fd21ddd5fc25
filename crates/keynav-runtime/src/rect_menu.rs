#![forbid(unsafe_code)]

//! Keyboard rectangle selection over a bounded cell grid.
//!
//! Keys:
//!
//! | Key | Effect |
//! |---|---|
//! | Arrows | move the cursor; extend the preview when a start is set |
//! | Space | set the start corner, or confirm the pending rectangle |
//! | Enter | hand every confirmed cell to the commit handler and close |
//! | Escape | drop the pending rectangle, or leave the mode |
//!
//! Confirmed rectangles accumulate, so several overlapping rectangles can be
//! combined before committing. Overlap is counted once.

use crate::config::NavConfig;
use crate::session::{KeyDisposition, Menu, Output, SessionError};
use keynav_core::announce::{Cue, Priority};
use keynav_core::event::{KeyCode, KeyEvent};
use keynav_core::geometry::{CellRect, GridCell};
use keynav_widgets::rect_select::RectangleSelection;
use rustc_hash::FxHashSet;
use std::fmt;

/// Rectangle selection mode.
pub struct RectSelectMode<H> {
    name: String,
    bounds: CellRect,
    home: GridCell,
    cursor: GridCell,
    selection: RectangleSelection,
    accumulated: FxHashSet<GridCell>,
    cursor_echo: bool,
    open: bool,
    on_commit: H,
}

impl<H> fmt::Debug for RectSelectMode<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RectSelectMode")
            .field("name", &self.name)
            .field("bounds", &self.bounds)
            .field("cursor", &self.cursor)
            .field("selected", &self.accumulated.len())
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl<H> RectSelectMode<H>
where
    H: FnMut(Vec<GridCell>, &mut Output<'_>),
{
    /// Create a closed mode over `bounds`. The cursor starts at `home`
    /// (clamped into the bounds) each time the mode opens.
    pub fn new(name: impl Into<String>, bounds: CellRect, home: GridCell, on_commit: H) -> Self {
        let home = bounds.clamp(home);
        Self {
            name: name.into(),
            bounds,
            home,
            cursor: home,
            selection: RectangleSelection::new(),
            accumulated: FxHashSet::default(),
            cursor_echo: true,
            open: false,
            on_commit,
        }
    }

    /// Cursor position.
    #[must_use]
    pub fn cursor(&self) -> GridCell {
        self.cursor
    }

    /// Number of confirmed cells.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.accumulated.len()
    }

    /// The pending rectangle state.
    #[must_use]
    pub fn selection(&self) -> &RectangleSelection {
        &self.selection
    }

    fn move_cursor(&mut self, dx: i32, dy: i32, out: &mut Output<'_>) {
        let next = self.cursor.offset(dx, dy);
        if !self.bounds.contains(next) {
            out.cue(Cue::Reject);
            return;
        }
        self.cursor = next;
        // One utterance per key: preview narration wins over the echo.
        let mut narration = None;
        if let Some(change) = self.selection.update_preview(next) {
            out.cue(Cue::Tick);
            narration = change.narration;
        }
        match narration {
            Some(narration) => out.announce(&narration),
            None if self.cursor_echo => out.speak(&next.to_string(), Priority::Low),
            None => {}
        }
    }

    fn start_or_confirm(&mut self, out: &mut Output<'_>) {
        if !self.selection.is_active() {
            self.selection.set_start(self.cursor);
            // A start without movement is a one-cell rectangle.
            let _ = self.selection.update_preview(self.cursor);
            out.say(&format!("Start at {}", self.cursor));
            return;
        }

        let added = self.selection.confirm(&self.accumulated);
        let count = added.len();
        self.accumulated.extend(added);
        tracing::debug!(mode = %self.name, added = count, total = self.accumulated.len(), "rectangle added");
        out.cue(Cue::Tick);
        out.say(&format!(
            "Added {} {}, {} total",
            count,
            if count == 1 { "cell" } else { "cells" },
            self.accumulated.len()
        ));
    }

    fn commit(&mut self, out: &mut Output<'_>) -> KeyDisposition {
        if self.accumulated.is_empty() {
            out.cue(Cue::Reject);
            out.say("No cells selected");
            return KeyDisposition::Consumed;
        }
        let mut cells: Vec<GridCell> = self.accumulated.drain().collect();
        cells.sort_by_key(|c| (c.y, c.x));
        tracing::info!(mode = %self.name, cells = cells.len(), "selection committed");
        (self.on_commit)(cells, out);
        KeyDisposition::Closed
    }
}

impl<H> Menu for RectSelectMode<H>
where
    H: FnMut(Vec<GridCell>, &mut Output<'_>),
{
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self, config: &NavConfig, out: &mut Output<'_>) -> Result<bool, SessionError> {
        self.selection = RectangleSelection::new().with_options(config.rect);
        self.cursor_echo = config.cursor_echo;
        self.accumulated.clear();
        self.cursor = self.home;
        self.open = true;
        out.say(&format!("{}, cursor at {}", self.name, self.cursor));
        Ok(true)
    }

    fn close(&mut self) {
        self.open = false;
        self.selection.cancel();
        self.accumulated.clear();
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn handle_key(&mut self, key: &KeyEvent, out: &mut Output<'_>) -> KeyDisposition {
        if !self.open || key.ctrl() || key.alt() {
            return KeyDisposition::Ignored;
        }
        match key.code {
            KeyCode::Up => self.move_cursor(0, -1, out),
            KeyCode::Down => self.move_cursor(0, 1, out),
            KeyCode::Left => self.move_cursor(-1, 0, out),
            KeyCode::Right => self.move_cursor(1, 0, out),
            KeyCode::Char(' ') => self.start_or_confirm(out),
            KeyCode::Enter => return self.commit(out),
            KeyCode::Escape => {
                if !self.selection.cancel() {
                    return KeyDisposition::Closed;
                }
                out.say("Rectangle cancelled");
            }
            _ => return KeyDisposition::Ignored,
        }
        KeyDisposition::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keynav_core::announce::{Feedback, Narrator};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl Narrator for Log {
        fn speak(&mut self, text: &str, priority: Priority) {
            self.0.push(format!("{priority}: {text}"));
        }
    }

    #[derive(Default)]
    struct Cues(Vec<Cue>);

    impl Feedback for Cues {
        fn play_tick(&mut self) {
            self.0.push(Cue::Tick);
        }

        fn play_reject(&mut self) {
            self.0.push(Cue::Reject);
        }
    }

    type Committed = Rc<RefCell<Vec<Vec<GridCell>>>>;

    fn mode(
        committed: &Committed,
    ) -> RectSelectMode<impl FnMut(Vec<GridCell>, &mut Output<'_>) + use<>> {
        let sink = Rc::clone(committed);
        RectSelectMode::new(
            "zone",
            CellRect::from_origin(GridCell::new(0, 0), 8, 8),
            GridCell::new(0, 0),
            move |cells: Vec<GridCell>, out: &mut Output<'_>| {
                out.say(&format!("Painted {} cells", cells.len()));
                sink.borrow_mut().push(cells);
            },
        )
    }

    fn drive<H>(
        mode: &mut RectSelectMode<H>,
        config: &NavConfig,
        codes: &[KeyCode],
    ) -> (Vec<String>, Vec<Cue>, Vec<KeyDisposition>)
    where
        H: FnMut(Vec<GridCell>, &mut Output<'_>),
    {
        let mut log = Log::default();
        let mut cues = Cues::default();
        let mut dispositions = Vec::new();
        {
            let mut out = Output::new(&mut log, &mut cues);
            if !mode.is_open() {
                mode.open(config, &mut out).unwrap();
            }
            for code in codes {
                dispositions.push(mode.handle_key(&KeyEvent::new(*code), &mut out));
            }
        }
        (log.0, cues.0, dispositions)
    }

    #[test]
    fn drag_confirm_commit() {
        let committed = Committed::default();
        let mut m = mode(&committed);
        let quiet = NavConfig::default().with_cursor_echo(false);
        let (spoken, cues, _) = drive(
            &mut m,
            &quiet,
            &[
                KeyCode::Char(' '),
                KeyCode::Right,
                KeyCode::Right,
                KeyCode::Right,
                KeyCode::Down,
                KeyCode::Down,
                KeyCode::Char(' '),
            ],
        );
        assert_eq!(
            spoken,
            vec![
                "normal: zone, cursor at 0, 0",
                "normal: Start at 0, 0",
                "low: 4",
                "low: 8",
                "low: 12",
                "normal: Added 12 cells, 12 total",
            ]
        );
        // One tick per count change (2, 3, 4, 8, 12) plus the confirm.
        assert_eq!(cues, vec![Cue::Tick; 6]);

        let (spoken, _, dispositions) = drive(&mut m, &quiet, &[KeyCode::Enter]);
        assert_eq!(spoken, vec!["normal: Painted 12 cells"]);
        assert_eq!(dispositions, vec![KeyDisposition::Closed]);
        let cells = committed.borrow()[0].clone();
        assert_eq!(cells.len(), 12);
        assert_eq!(cells[0], GridCell::new(0, 0));
        assert_eq!(cells[1], GridCell::new(1, 0));
        assert_eq!(cells[11], GridCell::new(3, 2));
    }

    #[test]
    fn overlapping_rectangles_count_once() {
        let committed = Committed::default();
        let mut m = mode(&committed);
        let quiet = NavConfig::default().with_cursor_echo(false);
        let (spoken, _, _) = drive(
            &mut m,
            &quiet,
            &[
                KeyCode::Char(' '),
                KeyCode::Right,
                KeyCode::Char(' '),
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Char(' '),
            ],
        );
        assert_eq!(spoken.last().unwrap(), "normal: Added 1 cell, 3 total");
        assert_eq!(m.selected_count(), 3);
    }

    #[test]
    fn cursor_echo_and_edge_reject() {
        let committed = Committed::default();
        let mut m = mode(&committed);
        let (spoken, cues, dispositions) =
            drive(&mut m, &NavConfig::default(), &[KeyCode::Left, KeyCode::Right]);
        assert_eq!(spoken, vec!["normal: zone, cursor at 0, 0", "low: 1, 0"]);
        assert_eq!(cues, vec![Cue::Reject]);
        assert_eq!(dispositions, vec![KeyDisposition::Consumed; 2]);
        assert_eq!(m.cursor(), GridCell::new(1, 0));
    }

    #[test]
    fn echo_yields_to_preview_narration() {
        let committed = Committed::default();
        let mut m = mode(&committed);
        let config = NavConfig::default();
        drive(&mut m, &config, &[KeyCode::Char(' ')]);

        let mut per_key = Vec::new();
        for code in [KeyCode::Right, KeyCode::Down, KeyCode::Right, KeyCode::Left] {
            let (spoken, _, _) = drive(&mut m, &config, &[code]);
            assert_eq!(spoken.len(), 1, "{code:?} spoke {spoken:?}");
            per_key.extend(spoken);
        }
        // Two cells is below the count threshold, so the cursor is echoed.
        assert_eq!(per_key, vec!["low: 1, 0", "low: 4", "low: 6", "low: 4"]);
    }

    #[test]
    fn enter_with_nothing_selected_rejects() {
        let committed = Committed::default();
        let mut m = mode(&committed);
        let (spoken, cues, dispositions) = drive(&mut m, &NavConfig::default(), &[KeyCode::Enter]);
        assert_eq!(spoken.last().unwrap(), "normal: No cells selected");
        assert_eq!(cues, vec![Cue::Reject]);
        assert_eq!(dispositions, vec![KeyDisposition::Consumed]);
        assert!(committed.borrow().is_empty());
    }

    #[test]
    fn escape_cancels_then_exits() {
        let committed = Committed::default();
        let mut m = mode(&committed);
        let (spoken, _, dispositions) = drive(
            &mut m,
            &NavConfig::default(),
            &[KeyCode::Char(' '), KeyCode::Escape, KeyCode::Escape],
        );
        assert_eq!(spoken.last().unwrap(), "normal: Rectangle cancelled");
        assert_eq!(
            dispositions,
            vec![
                KeyDisposition::Consumed,
                KeyDisposition::Consumed,
                KeyDisposition::Closed
            ]
        );
    }

    #[test]
    fn reopen_starts_clean() {
        let committed = Committed::default();
        let mut m = mode(&committed);
        drive(
            &mut m,
            &NavConfig::default(),
            &[KeyCode::Right, KeyCode::Char(' '), KeyCode::Char(' ')],
        );
        assert_eq!(m.selected_count(), 1);
        m.close();
        assert!(!m.is_open());
        drive(&mut m, &NavConfig::default(), &[]);
        assert_eq!(m.selected_count(), 0);
        assert_eq!(m.cursor(), GridCell::new(0, 0));
        assert!(!m.selection().is_active());
    }
}
