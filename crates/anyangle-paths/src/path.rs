use anyangle_core::Point;

/// Sum of the Euclidean lengths of consecutive segments.
pub fn path_length(path: &[Point]) -> f32 {
    path.windows(2)
        .map(|w| (w[0].dist_sq(w[1]) as f64).sqrt())
        .sum::<f64>() as f32
}

/// Greedy line-of-sight smoothing.
///
/// From each kept waypoint, jump to the farthest later waypoint that is
/// visible from it. Endpoints are preserved and the result is never longer
/// than the input.
pub fn smooth_path(path: &[Point], mut visible: impl FnMut(Point, Point) -> bool) -> Vec<Point> {
    let Some(&first) = path.first() else {
        return Vec::new();
    };
    let mut out = vec![first];
    let last = path.len() - 1;
    let mut i = 0;
    while i < last {
        let mut j = last;
        while j > i + 1 && !visible(path[i], path[j]) {
            j -= 1;
        }
        out.push(path[j]);
        i = j;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyangle_core::{GridGraph, Range};

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().map(|&p| Point::from(p)).collect()
    }

    #[test]
    fn length_of_segments() {
        assert_eq!(path_length(&[]), 0.0);
        assert_eq!(path_length(&pts(&[(2, 2)])), 0.0);
        let len = path_length(&pts(&[(0, 0), (3, 4), (3, 6)]));
        assert!((len - 7.0).abs() < 1e-6);
    }

    #[test]
    fn smoothing_in_open_space_keeps_endpoints_only() {
        let g = GridGraph::new(6, 6);
        let path = pts(&[(0, 0), (1, 1), (2, 1), (3, 2), (5, 5)]);
        let smooth = smooth_path(&path, |a, b| g.line_of_sight(a, b));
        assert_eq!(smooth, pts(&[(0, 0), (5, 5)]));
    }

    #[test]
    fn smoothing_keeps_necessary_corners() {
        let mut g = GridGraph::new(5, 7);
        g.fill(Range::new(2, 0, 3, 5), true);
        let path = pts(&[(0, 2), (1, 4), (2, 5), (3, 5), (4, 3), (4, 2)]);
        let smooth = smooth_path(&path, |a, b| g.line_of_sight(a, b));
        assert_eq!(smooth, pts(&[(0, 2), (2, 5), (3, 5), (4, 2)]));
        assert!(path_length(&smooth) <= path_length(&path));
    }

    #[test]
    fn smoothing_trivial_paths() {
        assert!(smooth_path(&[], |_, _| true).is_empty());
        let one = pts(&[(1, 1)]);
        assert_eq!(smooth_path(&one, |_, _| true), one);
    }
}
