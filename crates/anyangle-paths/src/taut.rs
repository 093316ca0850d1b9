//! The taut-path test.
//!
//! A path `p → u → v` that bends at `u` is *taut* when it cannot be shortened
//! by moving the bend: either the three corners are collinear, or the bend
//! wraps around the blocked cell touching `u` on the inside of the turn.
//! Everything here is integer arithmetic.

use anyangle_core::Point;

use crate::traits::GridOracle;

/// Whether `a`, `b` and `c` lie on one line.
#[inline]
pub fn is_collinear(a: Point, b: Point, c: Point) -> bool {
    a.turn(b, c) == 0
}

// Cells touching corner `u`, named by their side of `u` (Y grows down).

#[inline]
fn up_left<G: GridOracle + ?Sized>(grid: &G, u: Point) -> bool {
    grid.is_blocked(u.shift(-1, -1))
}

#[inline]
fn up_right<G: GridOracle + ?Sized>(grid: &G, u: Point) -> bool {
    grid.is_blocked(u.shift(0, -1))
}

#[inline]
fn down_left<G: GridOracle + ?Sized>(grid: &G, u: Point) -> bool {
    grid.is_blocked(u.shift(-1, 0))
}

#[inline]
fn down_right<G: GridOracle + ?Sized>(grid: &G, u: Point) -> bool {
    grid.is_blocked(u)
}

/// Zero means straight; otherwise the sign picks which cell must be blocked.
#[inline]
fn by_sign(sign: i64, negative: bool, positive: bool) -> bool {
    match sign.signum() {
        -1 => negative,
        1 => positive,
        _ => true,
    }
}

/// Whether the path `p → u → v` is locally shortest at `u`.
///
/// The position of `v` relative to `u` picks one of eight cases. In each, a
/// `p` on the wrong side of `u` makes the path fold back on itself and the
/// answer is false. Otherwise a straight continuation is taut, and a real
/// bend is taut only if the cell it wraps around is blocked.
///
/// # Panics
///
/// Panics if `v == u`.
pub fn is_taut<G: GridOracle + ?Sized>(grid: &G, v: Point, u: Point, p: Point) -> bool {
    assert!(v != u, "is_taut: v and u are the same corner {v}");
    let dx = (v.x - u.x).signum();
    let dy = (v.y - u.y).signum();
    match (dx, dy) {
        // v up-left of u
        (-1, -1) => {
            if p.x < u.x || p.y < u.y {
                return false;
            }
            by_sign(v.turn(u, p), down_left(grid, u), up_right(grid, u))
        }
        // v down-left of u
        (-1, 1) => {
            if p.x < u.x || p.y > u.y {
                return false;
            }
            by_sign(v.turn(u, p), down_right(grid, u), up_left(grid, u))
        }
        // v up-right of u
        (1, -1) => {
            if p.x > u.x || p.y < u.y {
                return false;
            }
            by_sign(v.turn(u, p), up_left(grid, u), down_right(grid, u))
        }
        // v down-right of u
        (1, 1) => {
            if p.x > u.x || p.y > u.y {
                return false;
            }
            by_sign(v.turn(u, p), up_right(grid, u), down_left(grid, u))
        }
        // v left of u
        (-1, 0) => {
            if p.x < u.x {
                return false;
            }
            by_sign(i64::from(p.y - u.y), up_left(grid, u), down_left(grid, u))
        }
        // v right of u
        (1, 0) => {
            if p.x > u.x {
                return false;
            }
            by_sign(i64::from(p.y - u.y), up_right(grid, u), down_right(grid, u))
        }
        // v above u
        (0, -1) => {
            if p.y < u.y {
                return false;
            }
            by_sign(i64::from(p.x - u.x), up_left(grid, u), up_right(grid, u))
        }
        // v below u
        (0, 1) => {
            if p.y > u.y {
                return false;
            }
            by_sign(i64::from(p.x - u.x), down_left(grid, u), down_right(grid, u))
        }
        _ => unreachable!("v != u"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyangle_core::{GridGraph, Point};

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    /// 6×6 grid with the single cell (2, 2) blocked. Its corners are
    /// (2,2), (3,2), (2,3) and (3,3).
    fn block() -> GridGraph {
        let mut g = GridGraph::new(6, 6);
        g.set_blocked(p(2, 2), true);
        g
    }

    #[test]
    fn collinear_paths_are_taut() {
        let g = GridGraph::new(6, 6);
        assert!(is_taut(&g, p(4, 4), p(2, 2), p(0, 0)));
        assert!(is_taut(&g, p(0, 3), p(2, 3), p(5, 3)));
        assert!(is_taut(&g, p(1, 0), p(1, 2), p(1, 5)));
        assert!(is_collinear(p(0, 0), p(2, 1), p(4, 2)));
        assert!(!is_collinear(p(0, 0), p(2, 1), p(4, 3)));
    }

    #[test]
    fn bend_in_open_space_is_not_taut() {
        let g = GridGraph::new(6, 6);
        assert!(!is_taut(&g, p(5, 1), p(3, 3), p(0, 3)));
        assert!(!is_taut(&g, p(1, 0), p(2, 3), p(3, 5)));
    }

    #[test]
    fn fold_back_is_never_taut() {
        let g = block();
        // p beyond u on v's side.
        assert!(!is_taut(&g, p(1, 1), p(2, 2), p(0, 3)));
        assert!(!is_taut(&g, p(4, 2), p(3, 2), p(5, 2)));
    }

    #[test]
    fn bend_around_blocked_cell_is_taut() {
        let g = block();
        // (1,4) → (2,2) → (5,1) wraps the block's top-left corner.
        assert!(is_taut(&g, p(5, 1), p(2, 2), p(1, 4)));
        // Turning the other way at (2,2) would need cell (2,1) blocked.
        assert!(!is_taut(&g, p(1, 0), p(2, 2), p(5, 3)));
    }

    #[test]
    fn bend_around_each_corner_of_a_block() {
        let g = block();
        // top-right corner
        assert!(is_taut(&g, p(0, 1), p(3, 2), p(4, 5)));
        // bottom-left corner
        assert!(is_taut(&g, p(5, 4), p(2, 3), p(1, 0)));
        // bottom-right corner
        assert!(is_taut(&g, p(0, 4), p(3, 3), p(4, 0)));
    }

    #[test]
    fn axis_aligned_bends() {
        let g = block();
        // Leaving left from (2,2) after arriving from below-right needs cell
        // (1,2), which is free.
        assert!(!is_taut(&g, p(0, 2), p(2, 2), p(4, 4)));
        // Leaving up along the block's right edge wraps cell (2,2).
        assert!(is_taut(&g, p(3, 0), p(3, 3), p(1, 5)));
        // Arriving from the other side would wrap the free cell (3,2).
        assert!(!is_taut(&g, p(3, 0), p(3, 3), p(5, 5)));
    }

    #[test]
    #[should_panic]
    fn equal_v_and_u_panics() {
        let g = GridGraph::new(3, 3);
        is_taut(&g, p(1, 1), p(1, 1), p(0, 0));
    }

    #[test]
    fn trait_default_forwards() {
        let g = block();
        assert_eq!(
            GridOracle::is_taut(&g, p(5, 1), p(2, 2), p(1, 4)),
            is_taut(&g, p(5, 1), p(2, 2), p(1, 4))
        );
    }
}
