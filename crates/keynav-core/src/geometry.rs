#![forbid(unsafe_code)]

//! Grid geometry for map cursors and rectangle selection.
//!
//! Map grids are addressed by signed cell coordinates so that hosts can pass
//! their own coordinate space through unchanged. Rectangles are inclusive on
//! every edge: a rectangle whose corners coincide covers exactly one cell.

use std::fmt;

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridCell {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl GridCell {
    /// Create a new cell.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this cell by `(dx, dy)`, saturating at the `i32` range.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

impl From<(i32, i32)> for GridCell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned rectangle of cells, inclusive on all edges.
///
/// # Invariants
///
/// `min.x <= max.x` and `min.y <= max.y` always hold; every constructor
/// normalizes its corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    min: GridCell,
    max: GridCell,
}

impl CellRect {
    /// Bounding rectangle of two corners, in any order.
    #[inline]
    pub fn from_corners(a: GridCell, b: GridCell) -> Self {
        Self {
            min: GridCell::new(a.x.min(b.x), a.y.min(b.y)),
            max: GridCell::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Rectangle with its top-left corner at `origin` spanning `width` by
    /// `height` cells. Zero dimensions are treated as one.
    pub fn from_origin(origin: GridCell, width: u32, height: u32) -> Self {
        let w = width.max(1).min(i32::MAX as u32) as i32;
        let h = height.max(1).min(i32::MAX as u32) as i32;
        Self::from_corners(origin, origin.offset(w - 1, h - 1))
    }

    /// Top-left (minimum) corner.
    #[inline]
    pub const fn min(&self) -> GridCell {
        self.min
    }

    /// Bottom-right (maximum) corner.
    #[inline]
    pub const fn max(&self) -> GridCell {
        self.max
    }

    /// Width in cells (always at least 1, saturating at `u32::MAX`).
    #[inline]
    pub const fn width(&self) -> u32 {
        self.max.x.abs_diff(self.min.x).saturating_add(1)
    }

    /// Height in cells (always at least 1).
    #[inline]
    pub const fn height(&self) -> u32 {
        self.max.y.abs_diff(self.min.y).saturating_add(1)
    }

    /// Number of cells covered.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Check if a cell lies inside the rectangle.
    #[inline]
    pub const fn contains(&self, cell: GridCell) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }

    /// Clamp a cell to the nearest cell inside the rectangle.
    #[inline]
    pub fn clamp(&self, cell: GridCell) -> GridCell {
        GridCell::new(
            cell.x.clamp(self.min.x, self.max.x),
            cell.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Iterate all cells in row-major order (top row first, left to right).
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| GridCell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_normalizes() {
        let r = CellRect::from_corners(GridCell::new(3, 2), GridCell::new(0, 0));
        assert_eq!(r.min(), GridCell::new(0, 0));
        assert_eq!(r.max(), GridCell::new(3, 2));
    }

    #[test]
    fn dimensions_are_inclusive() {
        let r = CellRect::from_corners(GridCell::new(0, 0), GridCell::new(3, 2));
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 3);
        assert_eq!(r.area(), 12);
    }

    #[test]
    fn single_cell_rect() {
        let c = GridCell::new(-5, 7);
        let r = CellRect::from_corners(c, c);
        assert_eq!(r.area(), 1);
        assert_eq!(r.cells().collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn cells_are_row_major() {
        let r = CellRect::from_corners(GridCell::new(1, 1), GridCell::new(2, 2));
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(
            cells,
            vec![
                GridCell::new(1, 1),
                GridCell::new(2, 1),
                GridCell::new(1, 2),
                GridCell::new(2, 2),
            ]
        );
    }

    #[test]
    fn contains_edges() {
        let r = CellRect::from_corners(GridCell::new(0, 0), GridCell::new(2, 2));
        assert!(r.contains(GridCell::new(0, 0)));
        assert!(r.contains(GridCell::new(2, 2)));
        assert!(!r.contains(GridCell::new(3, 2)));
        assert!(!r.contains(GridCell::new(-1, 0)));
    }

    #[test]
    fn clamp_pulls_inside() {
        let r = CellRect::from_origin(GridCell::new(0, 0), 10, 5);
        assert_eq!(r.clamp(GridCell::new(-3, 9)), GridCell::new(0, 4));
        assert_eq!(r.clamp(GridCell::new(4, 2)), GridCell::new(4, 2));
    }

    #[test]
    fn from_origin_zero_size_is_one_cell() {
        let r = CellRect::from_origin(GridCell::new(2, 2), 0, 0);
        assert_eq!(r.area(), 1);
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let r = CellRect::from_corners(GridCell::new(i32::MIN, 0), GridCell::new(i32::MAX, 0));
        assert_eq!(r.width(), u32::MAX);
        assert_eq!(r.area(), u32::MAX as u64);
    }

    #[test]
    fn display_cell() {
        assert_eq!(GridCell::new(4, -2).to_string(), "4, -2");
    }
}
