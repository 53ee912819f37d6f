//! Minkowski sums and differences, built as a fan of translated quads
//! unioned through the clipping engine.

use crate::error::Result;
use crate::geometry::{Path, Paths};
use crate::math::polygon::orientation;
use crate::math::IntPoint;
use crate::operations::boolean::{ClipType, Clipper, PolyFillType, PolyType};

fn minkowski(pattern: &Path, path: &Path, is_sum: bool, is_closed: bool) -> Paths {
    let delta = usize::from(is_closed);
    let poly_cnt = pattern.len();
    let path_cnt = path.len();

    // translate the pattern to every path vertex
    let mut translated: Vec<Path> = Vec::with_capacity(path_cnt);
    for anchor in path {
        let ring = pattern
            .iter()
            .map(|ip| {
                if is_sum {
                    IntPoint::new(anchor.x + ip.x, anchor.y + ip.y)
                } else {
                    IntPoint::new(anchor.x - ip.x, anchor.y - ip.y)
                }
            })
            .collect();
        translated.push(ring);
    }

    // quads bridging consecutive translations cover the swept region
    let mut quads: Paths = Vec::with_capacity((path_cnt + delta) * (poly_cnt + 1));
    let seg_cnt = if path_cnt == 0 {
        0
    } else {
        path_cnt - 1 + delta
    };
    for i in 0..seg_cnt {
        for j in 0..poly_cnt {
            let mut quad = vec![
                translated[i % path_cnt][j % poly_cnt],
                translated[(i + 1) % path_cnt][j % poly_cnt],
                translated[(i + 1) % path_cnt][(j + 1) % poly_cnt],
                translated[i % path_cnt][(j + 1) % poly_cnt],
            ];
            if !orientation(&quad) {
                quad.reverse();
            }
            quads.push(quad);
        }
    }
    quads
}

fn union_all(quads: &Paths) -> Result<Paths> {
    let mut clipper = Clipper::new();
    clipper.add_paths(quads, PolyType::Subject, true)?;
    clipper.execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
}

/// Minkowski sum of a pattern polygon swept along a path.
///
/// With `path_is_closed` the path's last vertex connects back to its first.
///
/// # Errors
///
/// Propagates engine failures from the final union.
pub fn minkowski_sum(pattern: &Path, path: &Path, path_is_closed: bool) -> Result<Paths> {
    let quads = minkowski(pattern, path, true, path_is_closed);
    union_all(&quads)
}

/// Minkowski difference of two polygons.
///
/// # Errors
///
/// Propagates engine failures from the final union.
pub fn minkowski_diff(poly1: &Path, poly2: &Path) -> Result<Paths> {
    let quads = minkowski(poly1, poly2, false, true);
    union_all(&quads)
}
