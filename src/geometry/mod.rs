use crate::math::IntPoint;

/// A closed contour: an ordered sequence of integer points.
pub type Path = Vec<IntPoint>;

/// A set of contours.
pub type Paths = Vec<Path>;

/// Axis-aligned integer bounding rectangle.
///
/// `top` carries the smallest y and `bottom` the largest, matching the
/// engine's sweep direction (the sweep runs from `bottom` up to `top`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntRect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

/// Computes the bounding rectangle of a set of paths.
///
/// Returns a zero rectangle when no points are present.
#[must_use]
pub fn bounds(paths: &Paths) -> IntRect {
    let mut pts = paths.iter().flatten();
    let Some(first) = pts.next() else {
        return IntRect::default();
    };
    let mut r = IntRect {
        left: first.x,
        top: first.y,
        right: first.x,
        bottom: first.y,
    };
    for pt in pts {
        r.left = r.left.min(pt.x);
        r.right = r.right.max(pt.x);
        r.top = r.top.min(pt.y);
        r.bottom = r.bottom.max(pt.y);
    }
    r
}

/// Reverses the vertex order of a path in place, flipping its orientation.
pub fn reverse_path(path: &mut Path) {
    path.reverse();
}

/// Reverses every path in the set.
pub fn reverse_paths(paths: &mut Paths) {
    for path in paths.iter_mut() {
        path.reverse();
    }
}
