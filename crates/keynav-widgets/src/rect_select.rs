#![forbid(unsafe_code)]

//! Two-corner rectangle selection over grid cells.
//!
//! ```text
//! Idle ──set_start──▶ StartSet ──update_preview──▶ Previewing
//!   ▲                    │                            │
//!   └──── cancel ────────┴──── confirm / cancel ──────┘
//! ```
//!
//! Preview changes are debounced on the cell count: moving the end corner
//! without changing how many cells are covered produces no signal, so the
//! caller does not re-narrate on every cursor step.

use keynav_core::announce::Announcement;
use keynav_core::geometry::{CellRect, GridCell};
use std::collections::HashSet;
use std::hash::BuildHasher;

/// Narration thresholds for preview changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectSelectOptions {
    /// Narrate "W by H" once width or height reaches this.
    pub size_threshold: u32,
    /// Below the size threshold, narrate the bare count from this many cells.
    pub min_count_narration: u64,
}

impl Default for RectSelectOptions {
    fn default() -> Self {
        Self {
            size_threshold: 5,
            min_count_narration: 4,
        }
    }
}

impl RectSelectOptions {
    /// Set the size threshold (builder).
    #[must_use]
    pub fn with_size_threshold(mut self, threshold: u32) -> Self {
        self.size_threshold = threshold;
        self
    }

    /// Set the minimum narrated count (builder).
    #[must_use]
    pub fn with_min_count_narration(mut self, count: u64) -> Self {
        self.min_count_narration = count;
        self
    }

    /// Narration for a rectangle, or `None` when it is too small to mention.
    #[must_use]
    pub fn narrate(&self, rect: &CellRect) -> Option<Announcement> {
        if rect.width() >= self.size_threshold || rect.height() >= self.size_threshold {
            Some(Announcement::low(format!(
                "{} by {}",
                rect.width(),
                rect.height()
            )))
        } else if rect.area() >= self.min_count_narration {
            Some(Announcement::low(rect.area().to_string()))
        } else {
            None
        }
    }
}

/// Signal that the preview now covers a different number of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewChange {
    /// The new preview rectangle.
    pub rect: CellRect,
    /// Cells covered.
    pub cell_count: u64,
    /// Low-priority narration, if the rectangle is large enough.
    pub narration: Option<Announcement>,
}

/// Rectangle selection state.
#[derive(Debug, Clone, Default)]
pub struct RectangleSelection {
    start: Option<GridCell>,
    end: Option<GridCell>,
    preview: Vec<GridCell>,
    last_cell_count: u64,
    options: RectSelectOptions,
}

impl RectangleSelection {
    /// Create an idle selection with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set thresholds (builder).
    #[must_use]
    pub fn with_options(mut self, options: RectSelectOptions) -> Self {
        self.options = options;
        self
    }

    /// Start corner, if set.
    #[must_use]
    pub fn start(&self) -> Option<GridCell> {
        self.start
    }

    /// End corner, if set.
    #[must_use]
    pub fn end(&self) -> Option<GridCell> {
        self.end
    }

    /// Whether a start corner is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Preview cells in row-major order.
    #[must_use]
    pub fn preview_cells(&self) -> &[GridCell] {
        &self.preview
    }

    /// Current preview rectangle.
    #[must_use]
    pub fn bounds(&self) -> Option<CellRect> {
        Some(CellRect::from_corners(self.start?, self.end?))
    }

    /// Record the start corner and drop any previous preview.
    pub fn set_start(&mut self, cell: GridCell) {
        self.start = Some(cell);
        self.end = None;
        self.preview.clear();
        self.last_cell_count = 0;
    }

    /// Move the end corner. Returns a change signal when the covered cell
    /// count differs from the last one; `None` without a start corner.
    pub fn update_preview(&mut self, end: GridCell) -> Option<PreviewChange> {
        let start = self.start?;
        let rect = CellRect::from_corners(start, end);
        self.end = Some(end);
        self.preview.clear();
        self.preview.extend(rect.cells());

        let cell_count = rect.area();
        if cell_count == self.last_cell_count {
            return None;
        }
        self.last_cell_count = cell_count;
        keynav_core::trace!(count = cell_count, "rectangle preview changed");
        Some(PreviewChange {
            rect,
            cell_count,
            narration: self.options.narrate(&rect),
        })
    }

    /// Take the preview cells not already in `existing`, in row-major order,
    /// and reset for the next rectangle. `existing` is not modified.
    ///
    /// Without a preview this returns nothing, and the start corner is
    /// dropped all the same.
    pub fn confirm<S: BuildHasher>(&mut self, existing: &HashSet<GridCell, S>) -> Vec<GridCell> {
        if self.preview.is_empty() {
            self.reset();
            return Vec::new();
        }
        let added: Vec<GridCell> = self
            .preview
            .iter()
            .copied()
            .filter(|cell| !existing.contains(cell))
            .collect();
        keynav_core::debug!(
            previewed = self.preview.len(),
            added = added.len(),
            "rectangle confirmed"
        );
        self.reset();
        added
    }

    /// Drop the pending rectangle. Returns false if nothing was pending.
    pub fn cancel(&mut self) -> bool {
        if self.start.is_none() {
            return false;
        }
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.start = None;
        self.end = None;
        self.preview.clear();
        self.last_cell_count = 0;
    }
}
