//! Text maps.
//!
//! One character per cell, one line per row:
//!
//! | Char | Cell |
//! |------|------|
//! | `#`  | blocked |
//! | `.`  | free |
//! | `S`  | free; its top-left corner is the start |
//! | `G`  | free; its top-left corner is the goal |
//!
//! Leading and trailing blank lines are ignored. Every row must have the same
//! width.

use anyangle_core::{GridGraph, Point};
use thiserror::Error;

/// Errors from [`parse_map`] and scenario construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map is empty")]
    Empty,
    #[error("row {row} has width {found}, expected {expected}")]
    InconsistentWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid character {ch:?} at {pos}")]
    InvalidChar { ch: char, pos: Point },
    #[error("marker {marker:?} appears more than once")]
    DuplicateMarker { marker: char },
    #[error("marker {marker:?} is missing")]
    MissingMarker { marker: char },
    #[error("corner {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Point, width: i32, height: i32 },
}

/// A parsed text map with its optional start and goal markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMap {
    pub grid: GridGraph,
    pub start: Option<Point>,
    pub goal: Option<Point>,
}

/// Parse a text map.
pub fn parse_map(s: &str) -> Result<ParsedMap, MapError> {
    let rows: Vec<&str> = s
        .lines()
        .map(str::trim_end)
        .skip_while(|l| l.is_empty())
        .collect();
    let len = rows.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);
    let rows = &rows[..len];
    let Some(first) = rows.first() else {
        return Err(MapError::Empty);
    };
    let width = first.chars().count();

    let mut blocked = Vec::with_capacity(width * rows.len());
    let mut start = None;
    let mut goal = None;
    for (y, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(MapError::InconsistentWidth {
                row: y,
                expected: width,
                found,
            });
        }
        for (x, ch) in row.chars().enumerate() {
            let pos = Point::new(x as i32, y as i32);
            let marker = match ch {
                '#' => {
                    blocked.push(true);
                    continue;
                }
                '.' => None,
                'S' => Some(&mut start),
                'G' => Some(&mut goal),
                _ => return Err(MapError::InvalidChar { ch, pos }),
            };
            blocked.push(false);
            if let Some(slot) = marker {
                if slot.replace(pos).is_some() {
                    return Err(MapError::DuplicateMarker { marker: ch });
                }
            }
        }
    }

    let w = width as i32;
    let grid = GridGraph::from_fn(w, rows.len() as i32, |p| {
        blocked[(p.y * w + p.x) as usize]
    });
    Ok(ParsedMap { grid, start, goal })
}

/// Draw `grid` with `path` on a canvas of twice the resolution, so that both
/// cells and corners get a character.
///
/// Cells show as `#` or `.`, the path's corners as `S`, `G` and `*`, and its
/// segments as `o`.
pub fn render(grid: &GridGraph, path: &[Point]) -> String {
    let cw = (2 * grid.width() + 1) as usize;
    let ch = (2 * grid.height() + 1) as usize;
    let mut canvas = vec![vec![' '; cw]; ch];
    for p in grid.cells() {
        canvas[(2 * p.y + 1) as usize][(2 * p.x + 1) as usize] =
            if grid.is_blocked(p) { '#' } else { '.' };
    }

    let mut put = |p: Point, c: char| {
        if p.x >= 0 && p.y >= 0 && (p.x as usize) < cw && (p.y as usize) < ch {
            canvas[p.y as usize][p.x as usize] = c;
        }
    };
    for w in path.windows(2) {
        let (a, b) = (w[0] * 2, w[1] * 2);
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs());
        for i in 1..steps {
            let t = i as f64 / steps as f64;
            let x = a.x as f64 + t * (b.x - a.x) as f64;
            let y = a.y as f64 + t * (b.y - a.y) as f64;
            put(Point::new(x.round() as i32, y.round() as i32), 'o');
        }
    }
    for (i, &p) in path.iter().enumerate() {
        let c = if i == 0 {
            'S'
        } else if i == path.len() - 1 {
            'G'
        } else {
            '*'
        };
        put(p * 2, c);
    }

    let mut out = String::with_capacity((cw + 1) * ch);
    for row in canvas {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_map() {
        let m = parse_map(
            "
            S.#.
            ..#G
            ....
            "
            .replace(' ', "")
            .as_str(),
        )
        .unwrap();
        assert_eq!(m.grid.size(), Point::new(4, 3));
        assert!(m.grid.is_blocked(Point::new(2, 0)));
        assert!(m.grid.is_blocked(Point::new(2, 1)));
        assert!(!m.grid.is_blocked(Point::new(2, 2)));
        assert_eq!(m.start, Some(Point::new(0, 0)));
        assert_eq!(m.goal, Some(Point::new(3, 1)));
    }

    #[test]
    fn markers_are_optional() {
        let m = parse_map("..\n#.\n").unwrap();
        assert_eq!(m.start, None);
        assert_eq!(m.goal, None);
        assert_eq!(m.grid.blocked_count(), 1);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse_map(""), Err(MapError::Empty));
        assert_eq!(parse_map("\n\n"), Err(MapError::Empty));
        assert_eq!(
            parse_map("...\n..\n"),
            Err(MapError::InconsistentWidth {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            parse_map("..x\n"),
            Err(MapError::InvalidChar {
                ch: 'x',
                pos: Point::new(2, 0)
            })
        );
        assert_eq!(
            parse_map("S.S\n"),
            Err(MapError::DuplicateMarker { marker: 'S' })
        );
    }

    #[test]
    fn error_messages() {
        let e = MapError::InvalidChar {
            ch: '?',
            pos: Point::new(1, 2),
        };
        assert_eq!(e.to_string(), "invalid character '?' at (1, 2)");
        assert_eq!(MapError::Empty.to_string(), "map is empty");
    }

    #[test]
    fn render_straight_path() {
        let g = GridGraph::new(2, 1);
        let s = render(&g, &[Point::new(0, 0), Point::new(2, 1)]);
        assert_eq!(s, "S\n oo.\n   oG\n");
    }

    #[test]
    fn render_blocked_cells() {
        let mut g = GridGraph::new(2, 2);
        g.set_blocked(Point::new(1, 0), true);
        let s = render(&g, &[]);
        assert_eq!(s, "\n . #\n\n . .\n\n");
    }
}
