use super::IntPoint;
use crate::geometry::Path;

/// Where a query point lies relative to a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Outside,
    Inside,
    OnBoundary,
}

/// Tests whether the segments `pt1→pt2` and `pt2→pt3` have equal slope.
///
/// When `use_full_range` is set the cross product is evaluated in 128-bit
/// arithmetic so coordinates up to the full supported range stay exact.
#[must_use]
pub fn slopes_equal3(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint, use_full_range: bool) -> bool {
    if pt1.y == pt2.y {
        return pt2.y == pt3.y;
    }
    if pt1.x == pt2.x {
        return pt2.x == pt3.x;
    }
    if use_full_range {
        i128::from(pt1.y - pt2.y) * i128::from(pt2.x - pt3.x)
            == i128::from(pt1.x - pt2.x) * i128::from(pt2.y - pt3.y)
    } else {
        (pt1.y - pt2.y) * (pt2.x - pt3.x) - (pt1.x - pt2.x) * (pt2.y - pt3.y) == 0
    }
}

/// Tests whether the segments `pt1→pt2` and `pt3→pt4` have equal slope.
#[must_use]
pub fn slopes_equal4(
    pt1: IntPoint,
    pt2: IntPoint,
    pt3: IntPoint,
    pt4: IntPoint,
    use_full_range: bool,
) -> bool {
    if pt1.y == pt2.y {
        return pt3.y == pt4.y;
    }
    if pt1.x == pt2.x {
        return pt3.x == pt4.x;
    }
    if use_full_range {
        i128::from(pt1.y - pt2.y) * i128::from(pt3.x - pt4.x)
            == i128::from(pt1.x - pt2.x) * i128::from(pt3.y - pt4.y)
    } else {
        (pt1.y - pt2.y) * (pt3.x - pt4.x) - (pt1.x - pt2.x) * (pt3.y - pt4.y) == 0
    }
}

/// Is `pt2` strictly between `pt1` and `pt3` on their common line?
///
/// Endpoints and coincident points do not count as between. The three points
/// are assumed collinear.
#[must_use]
pub fn pt2_is_between(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint) -> bool {
    if pt1 == pt3 || pt1 == pt2 || pt3 == pt2 {
        false
    } else if pt1.x != pt3.x {
        (pt2.x > pt1.x) == (pt2.x < pt3.x)
    } else {
        (pt2.y > pt1.y) == (pt2.y < pt3.y)
    }
}

/// Is `pt3` within the closed span of the collinear segment `pt1→pt2`?
///
/// Unlike [`pt2_is_between`], segment endpoints count as within.
#[must_use]
pub fn pt3_is_on_segment(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint) -> bool {
    if pt1 == pt3 || pt2 == pt3 {
        true
    } else if pt1.x != pt2.x {
        (pt1.x < pt3.x) == (pt3.x < pt2.x)
    } else {
        (pt1.y < pt3.y) == (pt3.y < pt2.y)
    }
}

/// Classifies a point against a closed polygon by winding-ray crossing.
///
/// Boundary detection is exact; the crossing tests fall back to `f64` cross
/// products only to pick the crossing side, mirroring the integer algorithm
/// this engine uses internally.
#[must_use]
pub fn point_in_polygon(pt: IntPoint, path: &Path) -> PointLocation {
    let cnt = path.len();
    if cnt < 3 {
        return PointLocation::Outside;
    }
    let mut inside = false;
    let mut ip = path[0];
    for i in 1..=cnt {
        let ip_next = if i == cnt { path[0] } else { path[i] };
        if ip_next.y == pt.y
            && (ip_next.x == pt.x || (ip.y == pt.y && ((ip_next.x > pt.x) == (ip.x < pt.x))))
        {
            return PointLocation::OnBoundary;
        }
        if (ip.y < pt.y) != (ip_next.y < pt.y) {
            if ip.x >= pt.x {
                if ip_next.x > pt.x {
                    inside = !inside;
                } else {
                    let d = i128::from(ip.x - pt.x) * i128::from(ip_next.y - pt.y)
                        - i128::from(ip_next.x - pt.x) * i128::from(ip.y - pt.y);
                    if d == 0 {
                        return PointLocation::OnBoundary;
                    }
                    if (d > 0) == (ip_next.y > ip.y) {
                        inside = !inside;
                    }
                }
            } else if ip_next.x > pt.x {
                let d = i128::from(ip.x - pt.x) * i128::from(ip_next.y - pt.y)
                    - i128::from(ip_next.x - pt.x) * i128::from(ip.y - pt.y);
                if d == 0 {
                    return PointLocation::OnBoundary;
                }
                if (d > 0) == (ip_next.y > ip.y) {
                    inside = !inside;
                }
            }
        }
        ip = ip_next;
    }
    if inside {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

/// Squared distance from `pt` to the infinite line through `ln1` and `ln2`.
#[must_use]
pub fn distance_from_line_sqrd(pt: IntPoint, ln1: IntPoint, ln2: IntPoint) -> f64 {
    let a = (ln1.y - ln2.y) as f64;
    let b = (ln2.x - ln1.x) as f64;
    let mut c = a * ln1.x as f64 + b * ln1.y as f64;
    c = a * pt.x as f64 + b * pt.y as f64 - c;
    (c * c) / (a * a + b * b)
}

/// Are two points within `dist_sqrd` (squared distance) of each other?
#[must_use]
pub fn points_are_close(pt1: IntPoint, pt2: IntPoint, dist_sqrd: f64) -> bool {
    let dx = (pt1.x - pt2.x) as f64;
    let dy = (pt1.y - pt2.y) as f64;
    dx * dx + dy * dy <= dist_sqrd
}

/// Is the corner `pt1→pt2→pt3` within `dist_sqrd` of being collinear?
///
/// The point tested against the base line is whichever of the three lies
/// between the other two on the dominant axis.
#[must_use]
pub fn slopes_near_collinear(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint, dist_sqrd: f64) -> bool {
    if (pt1.x - pt2.x).abs() > (pt1.y - pt2.y).abs() {
        if (pt1.x > pt2.x) == (pt1.x < pt3.x) {
            distance_from_line_sqrd(pt1, pt2, pt3) < dist_sqrd
        } else if (pt2.x > pt1.x) == (pt2.x < pt3.x) {
            distance_from_line_sqrd(pt2, pt1, pt3) < dist_sqrd
        } else {
            distance_from_line_sqrd(pt3, pt1, pt2) < dist_sqrd
        }
    } else if (pt1.y > pt2.y) == (pt1.y < pt3.y) {
        distance_from_line_sqrd(pt1, pt2, pt3) < dist_sqrd
    } else if (pt2.y > pt1.y) == (pt2.y < pt3.y) {
        distance_from_line_sqrd(pt2, pt1, pt3) < dist_sqrd
    } else {
        distance_from_line_sqrd(pt3, pt1, pt2) < dist_sqrd
    }
}
