//! Distance-based vertex cleaning: removes near-duplicate vertices and
//! vertices within `distance` of the line joining their neighbours.

use crate::geometry::{Path, Paths};
use crate::math::predicates::{points_are_close, slopes_near_collinear};

/// A sensible default cleaning distance (√2, one diagonal rounding step).
pub const DEFAULT_CLEAN_DISTANCE: f64 = 1.415;

/// Removes vertices that are closer than `distance` to an adjacent vertex
/// or to the segment joining their two neighbours.
///
/// Returns an empty path when fewer than three vertices survive.
#[must_use]
pub fn clean_polygon(path: &Path, distance: f64) -> Path {
    let cnt = path.len();
    if cnt == 0 {
        return Vec::new();
    }

    // ring of (prev, next) cursors over the input indices
    let mut next: Vec<usize> = (0..cnt).map(|i| (i + 1) % cnt).collect();
    let mut prev: Vec<usize> = (0..cnt).map(|i| (i + cnt - 1) % cnt).collect();
    let mut alive = cnt;
    let mut visited = vec![false; cnt];
    let dist_sqrd = distance * distance;

    let mut op = 0usize;
    while !visited[op] {
        if alive < 3 {
            break;
        }
        let p = path[op];
        let p_prev = path[prev[op]];
        let p_next = path[next[op]];
        if points_are_close(p, p_prev, dist_sqrd) {
            op = exclude(op, &mut next, &mut prev, &mut visited);
            alive -= 1;
        } else if points_are_close(p_prev, p_next, dist_sqrd) {
            let n = next[op];
            exclude(n, &mut next, &mut prev, &mut visited);
            op = exclude(op, &mut next, &mut prev, &mut visited);
            alive -= 2;
        } else if slopes_near_collinear(p_prev, p, p_next, dist_sqrd) {
            op = exclude(op, &mut next, &mut prev, &mut visited);
            alive -= 1;
        } else {
            visited[op] = true;
            op = next[op];
        }
    }

    if alive < 3 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(alive);
    let start = op;
    loop {
        out.push(path[op]);
        op = next[op];
        if op == start {
            break;
        }
    }
    out
}

/// [`clean_polygon`] applied to every path in the set; paths that collapse
/// entirely are kept as empty entries, mirroring positional correspondence
/// with the input.
#[must_use]
pub fn clean_polygons(paths: &Paths, distance: f64) -> Paths {
    paths.iter().map(|p| clean_polygon(p, distance)).collect()
}

/// Unlinks `op` from the cursor ring and returns its predecessor, which is
/// unmarked so the pass revisits it.
fn exclude(op: usize, next: &mut [usize], prev: &mut [usize], visited: &mut [bool]) -> usize {
    let p = prev[op];
    let n = next[op];
    next[p] = n;
    prev[n] = p;
    visited[p] = false;
    p
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::IntPoint;

    fn p(x: i64, y: i64) -> IntPoint {
        IntPoint::new(x, y)
    }

    #[test]
    fn removes_near_duplicate_vertices() {
        let path = vec![p(0, 0), p(1, 0), p(100, 0), p(100, 100), p(0, 100)];
        let cleaned = clean_polygon(&path, DEFAULT_CLEAN_DISTANCE);
        assert_eq!(cleaned.len(), 4);
        assert!(!cleaned.contains(&p(1, 0)));
    }

    #[test]
    fn removes_near_collinear_vertices() {
        let path = vec![p(0, 0), p(50, 1), p(100, 0), p(100, 100), p(0, 100)];
        let cleaned = clean_polygon(&path, 2.0);
        assert_eq!(cleaned.len(), 4);
        assert!(!cleaned.contains(&p(50, 1)));
    }

    #[test]
    fn keeps_genuine_corners() {
        let path = vec![p(0, 0), p(50, 40), p(100, 0), p(100, 100), p(0, 100)];
        let cleaned = clean_polygon(&path, 2.0);
        assert_eq!(cleaned.len(), 5);
    }

    #[test]
    fn collapsing_path_returns_empty() {
        let path = vec![p(0, 0), p(1, 0), p(1, 1)];
        assert!(clean_polygon(&path, 5.0).is_empty());
        assert!(clean_polygon(&Vec::new(), 5.0).is_empty());
    }

    #[test]
    fn cleans_each_path_in_a_set() {
        let paths = vec![
            vec![p(0, 0), p(100, 0), p(100, 100), p(0, 100)],
            vec![p(0, 0), p(1, 0), p(1, 1)],
        ];
        let cleaned = clean_polygons(&paths, 2.0);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].len(), 4);
        assert!(cleaned[1].is_empty());
    }
}
