//! The [`GridGraph`] type: blocked/free cells plus corner visibility.
//!
//! Cells outside the grid count as blocked, so the map border behaves like a
//! wall: a segment may run along the border only where the cell on its inner
//! side is free.

use std::fmt;

use crate::geom::{Point, Range};

/// A `width × height` grid of cells, each either blocked or free.
///
/// Vertices are the `(width + 1) × (height + 1)` cell corners. A corner's
/// dense index is `y * (width + 1) + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridGraph {
    tiles: Vec<bool>,
    width: i32,
    height: i32,
}

impl GridGraph {
    /// Create an obstacle-free grid of the given number of cells.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            tiles: vec![false; (width * height) as usize],
            width,
            height,
        }
    }

    /// Create a grid whose cell `p` is blocked iff `blocked(p)`.
    pub fn from_fn(width: i32, height: i32, mut blocked: impl FnMut(Point) -> bool) -> Self {
        let mut grid = Self::new(width, height);
        for p in grid.cells() {
            let i = grid.tile_index(p);
            grid.tiles[i] = blocked(p);
        }
        grid
    }

    /// Number of cells as a `Point` (width, height).
    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Range of cell coordinates.
    #[inline]
    pub fn cells(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Range of corner coordinates (one larger than [`cells`](Self::cells)
    /// on each axis).
    #[inline]
    pub fn corners(&self) -> Range {
        Range::new(0, 0, self.width + 1, self.height + 1)
    }

    #[inline]
    fn tile_index(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// Block or unblock cell `p`. No-op outside the grid.
    pub fn set_blocked(&mut self, p: Point, blocked: bool) {
        if self.cells().contains(p) {
            let i = self.tile_index(p);
            self.tiles[i] = blocked;
        }
    }

    /// Block or unblock every cell of `r` that lies inside the grid.
    pub fn fill(&mut self, r: Range, blocked: bool) {
        for p in r.intersect(self.cells()) {
            self.set_blocked(p, blocked);
        }
    }

    /// Whether cell `p` is blocked. Cells outside the grid are blocked.
    #[inline]
    pub fn is_blocked(&self, p: Point) -> bool {
        self.blocked(p.x, p.y)
    }

    #[inline]
    fn blocked(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return true;
        }
        self.tiles[(y * self.width + x) as usize]
    }

    /// Number of blocked cells inside the grid.
    pub fn blocked_count(&self) -> usize {
        self.tiles.iter().filter(|&&b| b).count()
    }

    // -----------------------------------------------------------------------
    // Corners
    // -----------------------------------------------------------------------

    /// Whether `p` is a corner of the grid (`0..=width`, `0..=height`).
    #[inline]
    pub fn is_valid_coordinate(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x <= self.width && p.y <= self.height
    }

    /// Number of corners, i.e. the size of a dense per-vertex array.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.corners().len()
    }

    /// Dense index of corner `p`. Returns `None` for invalid coordinates.
    #[inline]
    pub fn to_index(&self, p: Point) -> Option<usize> {
        if !self.is_valid_coordinate(p) {
            return None;
        }
        Some((p.y * (self.width + 1) + p.x) as usize)
    }

    /// Corner for a dense index produced by [`to_index`](Self::to_index).
    #[inline]
    pub fn from_index(&self, idx: usize) -> Point {
        let stride = (self.width + 1) as usize;
        Point::new((idx % stride) as i32, (idx / stride) as i32)
    }

    /// Whether at least one of the four cells around corner `p` is free, so
    /// that a path can actually reach it.
    pub fn is_unblocked_corner(&self, p: Point) -> bool {
        !self.blocked(p.x - 1, p.y - 1)
            || !self.blocked(p.x, p.y - 1)
            || !self.blocked(p.x - 1, p.y)
            || !self.blocked(p.x, p.y)
    }

    /// Whether corner `p` is convex with respect to the surrounding
    /// obstacles: some cell around it is blocked, yet a diagonal pair of
    /// cells around it is free.
    ///
    /// Two blocked cells touching only at `p` also count, since a path may
    /// bend around either of them there.
    pub fn is_outer_corner(&self, p: Point) -> bool {
        let a = self.blocked(p.x - 1, p.y - 1);
        let b = self.blocked(p.x, p.y - 1);
        let c = self.blocked(p.x, p.y);
        let d = self.blocked(p.x - 1, p.y);
        ((!a && !c) || (!d && !b)) && (a || b || c || d)
    }

    // -----------------------------------------------------------------------
    // Distance and visibility
    // -----------------------------------------------------------------------

    /// Euclidean distance between two corners.
    pub fn distance(&self, a: Point, b: Point) -> f32 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dx == 0 {
            return dy.abs() as f32;
        }
        if dy == 0 {
            return dx.abs() as f32;
        }
        if dx == dy || dx == -dy {
            return std::f32::consts::SQRT_2 * dx.abs() as f32;
        }
        a.euclidean(b)
    }

    /// Visibility between two corners at most one step apart.
    ///
    /// A diagonal step crosses exactly one cell; an axis-aligned step runs
    /// along a cell edge and is blocked only when both cells beside it are.
    pub fn neighbour_line_of_sight(&self, a: Point, b: Point) -> bool {
        match (b.x - a.x, b.y - a.y) {
            (0, 0) => true,
            (0, _) => {
                let y = a.y.min(b.y);
                !(self.blocked(a.x - 1, y) && self.blocked(a.x, y))
            }
            (_, 0) => {
                let x = a.x.min(b.x);
                !(self.blocked(x, a.y - 1) && self.blocked(x, a.y))
            }
            _ => !self.blocked(a.x.min(b.x), a.y.min(b.y)),
        }
    }

    /// Whether the straight segment between two corners avoids every
    /// blocked cell.
    ///
    /// Integer-only walk over the cells the segment crosses. A segment lying
    /// on a grid line is blocked only where the cells on both sides are; a
    /// segment passing exactly through a corner may squeeze between two
    /// diagonally touching blocked cells.
    pub fn line_of_sight(&self, from: Point, to: Point) -> bool {
        let (mut x, mut y) = (from.x, from.y);
        let mut dx = to.x - from.x;
        let mut dy = to.y - from.y;
        let (mut sx, mut sy) = (1, 1);
        let (mut ox, mut oy) = (0, 0);
        if dy < 0 {
            dy = -dy;
            sy = -1;
            oy = -1;
        }
        if dx < 0 {
            dx = -dx;
            sx = -1;
            ox = -1;
        }

        let mut f = 0;
        if dx >= dy {
            while x != to.x {
                f += dy;
                if f >= dx {
                    if self.blocked(x + ox, y + oy) {
                        return false;
                    }
                    y += sy;
                    f -= dx;
                }
                if f != 0 && self.blocked(x + ox, y + oy) {
                    return false;
                }
                if dy == 0 && self.blocked(x + ox, y) && self.blocked(x + ox, y - 1) {
                    return false;
                }
                x += sx;
            }
        } else {
            while y != to.y {
                f += dx;
                if f >= dy {
                    if self.blocked(x + ox, y + oy) {
                        return false;
                    }
                    x += sx;
                    f -= dy;
                }
                if f != 0 && self.blocked(x + ox, y + oy) {
                    return false;
                }
                if dx == 0 && self.blocked(x, y + oy) && self.blocked(x - 1, y + oy) {
                    return false;
                }
                y += sy;
            }
        }
        true
    }
}

impl fmt::Display for GridGraph {
    /// One text row per cell row: `#` blocked, `.` free.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.blocked(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
