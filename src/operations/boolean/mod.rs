//! Boolean operations on closed integer polygons.
//!
//! The engine sweeps the plane from the largest y down to the smallest,
//! maintaining an x-ordered list of the edges crossing the sweep line,
//! updating winding counts at every crossing, and stitching contributing
//! vertices into output rings. Subject and clip polygons may be concave,
//! self-intersecting, and may contain holes; each input set is interpreted
//! under its own fill rule.

mod active;
mod builder;
mod edge;
mod horizontal;
mod intersect;
mod joins;
mod output;
mod polytree;
mod sweep;

use std::collections::BinaryHeap;

use slotmap::SlotMap;

use crate::error::Result;
use crate::geometry::Paths;
use crate::math::IntPoint;

use edge::{Edge, EdgeId, OutPtId};
use joins::{HorzJoinRec, JoinRec};
use output::{OutPt, OutRec};

pub use polytree::{PolyNode, PolyTree};

/// The boolean operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipType {
    Intersection,
    Union,
    Difference,
    SymmetricDifference,
}

/// Which input set a polygon belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyType {
    Subject,
    Clip,
}

/// How winding counts decide inside/outside for an input set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolyFillType {
    /// Inside iff the crossing count is odd.
    #[default]
    EvenOdd,
    /// Inside iff the winding count is non-zero.
    NonZero,
    /// Inside iff the winding count is greater than zero.
    Positive,
    /// Inside iff the winding count is less than zero.
    Negative,
}

/// Which side of its bound an edge currently lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeSide {
    Left,
    Right,
}

/// Walking direction along a horizontal edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    LeftToRight,
    RightToLeft,
}

/// Flags preventing `intersect_edges` from terminating an edge that
/// continues beyond the event point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Protects {
    Neither,
    Left,
    Right,
    Both,
}

impl Protects {
    pub fn left(self) -> bool {
        matches!(self, Protects::Left | Protects::Both)
    }

    pub fn right(self) -> bool {
        matches!(self, Protects::Right | Protects::Both)
    }
}

/// A polygon local minimum with its two upward bounds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalMinima {
    pub y: i64,
    pub left_bound: EdgeId,
    pub right_bound: EdgeId,
}

/// A pending crossing of two active edges within the current scanbeam.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IntersectNode {
    pub edge1: EdgeId,
    pub edge2: EdgeId,
    pub pt: IntPoint,
}

/// The polygon clipping engine.
///
/// Register input polygons with [`add_path`](Clipper::add_path) /
/// [`add_paths`](Clipper::add_paths), then run
/// [`execute`](Clipper::execute) (or
/// [`execute_tree`](Clipper::execute_tree) for nested output). The engine
/// may be executed repeatedly with different operations or fill rules;
/// [`clear`](Clipper::clear) releases the registered paths.
#[derive(Debug, Default)]
pub struct Clipper {
    // registered input
    pub(crate) edges: SlotMap<EdgeId, Edge>,
    pub(crate) minima: Vec<LocalMinima>,
    pub(crate) current_lm: usize,
    pub(crate) use_full_range: bool,
    // sweep state
    pub(crate) scanbeam: BinaryHeap<i64>,
    pub(crate) active_edges: Option<EdgeId>,
    pub(crate) sorted_edges: Option<EdgeId>,
    pub(crate) intersect_nodes: Vec<IntersectNode>,
    pub(crate) out_pts: SlotMap<OutPtId, OutPt>,
    pub(crate) out_recs: Vec<OutRec>,
    pub(crate) joins: Vec<JoinRec>,
    pub(crate) horz_joins: Vec<HorzJoinRec>,
    pub(crate) clip_type: Option<ClipType>,
    pub(crate) subj_fill_type: PolyFillType,
    pub(crate) clip_fill_type: PolyFillType,
    /// Flip the orientation of returned polygons.
    pub reverse_solution: bool,
    /// Split output rings that revisit a vertex location.
    pub strictly_simple: bool,
    /// Retain collinear vertices that would otherwise be removed.
    pub preserve_collinear: bool,
}

impl Clipper {
    /// Creates a new, empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases all registered paths, making the engine empty again.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.minima.clear();
        self.current_lm = 0;
        self.use_full_range = false;
        self.discard_transient();
    }

    /// Runs the boolean operation over the registered paths and returns the
    /// resulting polygons.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteError::GeometricInconsistency` when the intersection
    /// ordering cannot be stabilised or a sweep invariant is violated. No
    /// partial output is produced; the engine stays usable.
    pub fn execute(
        &mut self,
        clip_type: ClipType,
        subj_fill_type: PolyFillType,
        clip_fill_type: PolyFillType,
    ) -> Result<Paths> {
        self.clip_type = Some(clip_type);
        self.subj_fill_type = subj_fill_type;
        self.clip_fill_type = clip_fill_type;
        match self.execute_internal() {
            Ok(()) => {
                let solution = self.build_result();
                self.clip_type = None;
                Ok(solution)
            }
            Err(err) => {
                self.discard_transient();
                Err(err.into())
            }
        }
    }

    /// Like [`execute`](Clipper::execute), but returns the solution as a
    /// tree whose nesting reflects the hole-of relation.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`execute`](Clipper::execute).
    pub fn execute_tree(
        &mut self,
        clip_type: ClipType,
        subj_fill_type: PolyFillType,
        clip_fill_type: PolyFillType,
    ) -> Result<PolyTree> {
        self.clip_type = Some(clip_type);
        self.subj_fill_type = subj_fill_type;
        self.clip_fill_type = clip_fill_type;
        match self.execute_internal() {
            Ok(()) => {
                let tree = self.build_tree();
                self.clip_type = None;
                Ok(tree)
            }
            Err(err) => {
                self.discard_transient();
                Err(err.into())
            }
        }
    }

    /// Drops everything belonging to a sweep in progress or completed,
    /// leaving only the registered input paths.
    pub(crate) fn discard_transient(&mut self) {
        self.scanbeam.clear();
        self.active_edges = None;
        self.sorted_edges = None;
        self.intersect_nodes.clear();
        self.out_pts.clear();
        self.out_recs.clear();
        self.joins.clear();
        self.horz_joins.clear();
        self.clip_type = None;
    }

    // --- shared helpers ---

    pub(crate) fn insert_scanbeam(&mut self, y: i64) {
        self.scanbeam.push(y);
    }

    /// Pops the largest pending event y, discarding duplicates.
    pub(crate) fn pop_scanbeam(&mut self) -> Option<i64> {
        let y = self.scanbeam.pop()?;
        while self.scanbeam.peek() == Some(&y) {
            self.scanbeam.pop();
        }
        Some(y)
    }

    pub(crate) fn top_x(&self, e: EdgeId, y: i64) -> i64 {
        self.edges[e].top_x(y)
    }

    pub(crate) fn fill_types_of(&self, e: EdgeId) -> (PolyFillType, PolyFillType) {
        match self.edges[e].poly_type {
            PolyType::Subject => (self.subj_fill_type, self.clip_fill_type),
            PolyType::Clip => (self.clip_fill_type, self.subj_fill_type),
        }
    }

    pub(crate) fn is_even_odd_fill_type(&self, e: EdgeId) -> bool {
        self.fill_types_of(e).0 == PolyFillType::EvenOdd
    }

    pub(crate) fn is_even_odd_alt_fill_type(&self, e: EdgeId) -> bool {
        self.fill_types_of(e).1 == PolyFillType::EvenOdd
    }

    /// Slope equality of two edges, honouring the extended-precision flag.
    pub(crate) fn slopes_equal_edges(&self, e1: EdgeId, e2: EdgeId) -> bool {
        let a = &self.edges[e1];
        let b = &self.edges[e2];
        if a.bot.y == a.top.y {
            return b.bot.y == b.top.y;
        }
        if a.bot.x == a.top.x {
            return b.bot.x == b.top.x;
        }
        if self.use_full_range {
            i128::from(a.top.y - a.bot.y) * i128::from(b.top.x - b.bot.x)
                == i128::from(a.top.x - a.bot.x) * i128::from(b.top.y - b.bot.y)
        } else {
            (a.top.y - a.bot.y) * (b.top.x - b.bot.x)
                - (a.top.x - a.bot.x) * (b.top.y - b.bot.y)
                == 0
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Path;
    use crate::math::polygon::{area, orientation, rotate_to_canonical_start};

    fn p(x: i64, y: i64) -> IntPoint {
        IntPoint::new(x, y)
    }

    /// Clockwise square with the given lower-left corner and side length.
    fn square(x: i64, y: i64, size: i64) -> Path {
        vec![
            p(x, y),
            p(x, y + size),
            p(x + size, y + size),
            p(x + size, y),
        ]
    }

    fn canon(path: &Path) -> Path {
        rotate_to_canonical_start(path)
    }

    /// Canonicalised paths sorted for order-independent comparison.
    fn canon_set(paths: &Paths) -> Vec<Path> {
        let mut out: Vec<Path> = paths.iter().map(canon).collect();
        out.sort_by_key(|path| (path[0].x, path[0].y, path.len()));
        out
    }

    fn run(
        subject: &[Path],
        clip: &[Path],
        op: ClipType,
        subj_fill: PolyFillType,
        clip_fill: PolyFillType,
    ) -> Paths {
        let mut c = Clipper::new();
        for path in subject {
            c.add_path(path, PolyType::Subject, true).unwrap();
        }
        for path in clip {
            c.add_path(path, PolyType::Clip, true).unwrap();
        }
        c.execute(op, subj_fill, clip_fill).unwrap()
    }

    fn run_nonzero(subject: &[Path], clip: &[Path], op: ClipType) -> Paths {
        run(subject, clip, op, PolyFillType::NonZero, PolyFillType::NonZero)
    }

    fn total_area(paths: &Paths) -> f64 {
        paths.iter().map(area).sum()
    }

    #[test]
    fn intersection_of_overlapping_squares() {
        let result = run_nonzero(
            &[square(0, 0, 100)],
            &[square(50, 50, 100)],
            ClipType::Intersection,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(
            canon(&result[0]),
            vec![p(50, 50), p(50, 100), p(100, 100), p(100, 50)]
        );
        assert_eq!(area(&result[0]), 2500.0);
        assert!(orientation(&result[0]));
    }

    #[test]
    fn union_of_overlapping_squares() {
        let result = run_nonzero(&[square(0, 0, 100)], &[square(50, 50, 100)], ClipType::Union);
        assert_eq!(result.len(), 1);
        assert_eq!(
            canon(&result[0]),
            vec![
                p(0, 0),
                p(0, 100),
                p(50, 100),
                p(50, 150),
                p(150, 150),
                p(150, 50),
                p(100, 50),
                p(100, 0),
            ]
        );
        assert_eq!(area(&result[0]), 17_500.0);
    }

    #[test]
    fn difference_of_overlapping_squares() {
        let result = run_nonzero(
            &[square(0, 0, 100)],
            &[square(50, 50, 100)],
            ClipType::Difference,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(
            canon(&result[0]),
            vec![p(0, 0), p(0, 100), p(50, 100), p(50, 50), p(100, 50), p(100, 0)]
        );
        assert_eq!(area(&result[0]), 7500.0);
    }

    #[test]
    fn square_with_hole_clipped_by_band() {
        let outer = square(0, 0, 100);
        let hole = vec![p(25, 25), p(75, 25), p(75, 75), p(25, 75)]; // counter-clockwise
        let band = vec![p(49, -10), p(49, 110), p(51, 110), p(51, -10)];
        let result = run(
            &[outer, hole],
            &[band],
            ClipType::Intersection,
            PolyFillType::EvenOdd,
            PolyFillType::EvenOdd,
        );
        assert_eq!(result.len(), 2);
        for ring in &result {
            assert_eq!(ring.len(), 4);
            assert_eq!(area(ring), 50.0);
        }
        let mut rings = canon_set(&result);
        rings.sort_by_key(|ring| ring[0].y);
        assert_eq!(rings[0], vec![p(49, 0), p(49, 25), p(51, 25), p(51, 0)]);
        assert_eq!(
            rings[1],
            vec![p(49, 75), p(49, 100), p(51, 100), p(51, 75)]
        );
    }

    #[test]
    fn bowtie_union_even_odd() {
        let bowtie = vec![p(0, 0), p(100, 100), p(0, 100), p(100, 0)];
        let result = run(
            &[bowtie],
            &[],
            ClipType::Union,
            PolyFillType::EvenOdd,
            PolyFillType::EvenOdd,
        );
        assert_eq!(result.len(), 2);
        for ring in &result {
            assert_eq!(ring.len(), 3);
            assert_eq!(area(ring), 2500.0);
        }
        assert_eq!(total_area(&result), 5000.0);
    }

    #[test]
    fn touching_rectangles_union_merges() {
        let result = run_nonzero(&[square(0, 0, 10)], &[square(10, 0, 10)], ClipType::Union);
        assert_eq!(result.len(), 1);
        assert_eq!(
            canon(&result[0]),
            vec![p(0, 0), p(0, 10), p(20, 10), p(20, 0)]
        );
    }

    #[test]
    fn identical_inputs_all_ops() {
        let sq = square(0, 0, 100);
        let inter = run_nonzero(&[sq.clone()], &[sq.clone()], ClipType::Intersection);
        assert_eq!(inter.len(), 1);
        assert_eq!(canon(&inter[0]), canon(&sq));

        let union = run_nonzero(&[sq.clone()], &[sq.clone()], ClipType::Union);
        assert_eq!(union.len(), 1);
        assert_eq!(canon(&union[0]), canon(&sq));

        let diff = run_nonzero(&[sq.clone()], &[sq.clone()], ClipType::Difference);
        assert!(diff.is_empty());

        let xor = run_nonzero(&[sq.clone()], &[sq], ClipType::SymmetricDifference);
        assert_eq!(total_area(&xor), 0.0);
    }

    #[test]
    fn disjoint_inputs() {
        let a = square(0, 0, 10);
        let b = square(100, 100, 10);
        assert!(run_nonzero(&[a.clone()], &[b.clone()], ClipType::Intersection).is_empty());

        let union = run_nonzero(&[a.clone()], &[b.clone()], ClipType::Union);
        assert_eq!(union.len(), 2);
        assert_eq!(total_area(&union), 200.0);

        let diff = run_nonzero(&[a.clone()], &[b], ClipType::Difference);
        assert_eq!(diff.len(), 1);
        assert_eq!(canon(&diff[0]), canon(&a));
    }

    #[test]
    fn contained_square_difference_produces_hole() {
        let result = run_nonzero(
            &[square(0, 0, 100)],
            &[square(25, 25, 50)],
            ClipType::Difference,
        );
        assert_eq!(result.len(), 2);
        let mut areas: Vec<f64> = result.iter().map(area).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(areas, vec![-2500.0, 10_000.0]);
        // hole is counter-clockwise, outer clockwise
        assert_eq!(total_area(&result), 7500.0);
    }

    #[test]
    fn contained_square_intersection_and_union() {
        let inter = run_nonzero(
            &[square(0, 0, 100)],
            &[square(25, 25, 50)],
            ClipType::Intersection,
        );
        assert_eq!(inter.len(), 1);
        assert_eq!(canon(&inter[0]), canon(&square(25, 25, 50)));

        let union = run_nonzero(
            &[square(0, 0, 100)],
            &[square(25, 25, 50)],
            ClipType::Union,
        );
        assert_eq!(union.len(), 1);
        assert_eq!(canon(&union[0]), canon(&square(0, 0, 100)));
    }

    #[test]
    fn reverse_solution_flips_orientation() {
        let mut c = Clipper::new();
        c.reverse_solution = true;
        c.add_path(&square(0, 0, 100), PolyType::Subject, true).unwrap();
        c.add_path(&square(50, 50, 100), PolyType::Clip, true).unwrap();
        let result = c
            .execute(
                ClipType::Intersection,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(area(&result[0]), -2500.0);
        assert!(!orientation(&result[0]));
    }

    #[test]
    fn positive_and_negative_fill_rules() {
        // clockwise ring: winding is negative along its interior
        let cw = square(0, 0, 100);
        let positive = run(
            &[cw.clone()],
            &[],
            ClipType::Union,
            PolyFillType::Positive,
            PolyFillType::Positive,
        );
        assert!(positive.is_empty());
        let negative = run(
            &[cw.clone()],
            &[],
            ClipType::Union,
            PolyFillType::Negative,
            PolyFillType::Negative,
        );
        assert_eq!(negative.len(), 1);
        assert_eq!(area(&negative[0]), 10_000.0);

        // counter-clockwise ring: winding is positive
        let mut ccw = cw;
        ccw.reverse();
        let positive = run(
            &[ccw.clone()],
            &[],
            ClipType::Union,
            PolyFillType::Positive,
            PolyFillType::Positive,
        );
        assert_eq!(positive.len(), 1);
        assert_eq!(area(&positive[0]), 10_000.0);
        let negative = run(
            &[ccw],
            &[],
            ClipType::Union,
            PolyFillType::Negative,
            PolyFillType::Negative,
        );
        assert!(negative.is_empty());
    }

    #[test]
    fn self_overlapping_subject_fill_rules() {
        // two overlapping squares in one subject set: the overlap has
        // winding 2 (or 0 crossings under even-odd)
        let subj = vec![square(0, 0, 100), square(50, 50, 100)];
        let even_odd = run(
            &subj,
            &[],
            ClipType::Union,
            PolyFillType::EvenOdd,
            PolyFillType::EvenOdd,
        );
        // even-odd: the doubly covered centre drops out as a hole
        assert_eq!(even_odd.len(), 2);
        assert_eq!(total_area(&even_odd), 17_500.0 - 2500.0);

        let non_zero = run(
            &subj,
            &[],
            ClipType::Union,
            PolyFillType::NonZero,
            PolyFillType::NonZero,
        );
        assert_eq!(non_zero.len(), 1);
        assert_eq!(total_area(&non_zero), 17_500.0);
    }

    #[test]
    fn preserve_collinear_keeps_midpoints() {
        let subj = vec![p(0, 0), p(0, 50), p(0, 100), p(100, 100), p(100, 0)];

        let plain = run_nonzero(&[subj.clone()], &[], ClipType::Union);
        assert_eq!(plain.len(), 1);
        assert_eq!(plain[0].len(), 4);

        let mut c = Clipper::new();
        c.preserve_collinear = true;
        c.add_path(&subj, PolyType::Subject, true).unwrap();
        let kept = c
            .execute(
                ClipType::Union,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].len(), 5);
        assert!(kept[0].contains(&p(0, 50)));
    }

    #[test]
    fn corner_touching_squares_stay_separate() {
        let mut c = Clipper::new();
        c.strictly_simple = true;
        c.add_path(&square(0, 0, 10), PolyType::Subject, true).unwrap();
        c.add_path(&square(10, 10, 10), PolyType::Clip, true).unwrap();
        let result = c
            .execute(
                ClipType::Union,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert_eq!(result.len(), 2);
        let mut areas: Vec<f64> = result.iter().map(area).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(areas, vec![100.0, 100.0]);
        for ring in &result {
            let mut pts = ring.clone();
            pts.sort_by_key(|q| (q.x, q.y));
            pts.dedup();
            assert_eq!(pts.len(), ring.len(), "ring revisits a vertex: {ring:?}");
        }
    }

    #[test]
    fn union_is_order_independent() {
        let a = square(0, 0, 100);
        let b = square(50, 50, 100);
        let ab = run_nonzero(&[a.clone()], &[b.clone()], ClipType::Union);
        let ba = run_nonzero(&[b], &[a], ClipType::Union);
        assert_eq!(canon_set(&ab), canon_set(&ba));
    }

    #[test]
    fn area_conservation() {
        let a = square(0, 0, 100);
        let b = square(50, 50, 100);
        let union = run_nonzero(&[a.clone()], &[b.clone()], ClipType::Union);
        let inter = run_nonzero(&[a.clone()], &[b.clone()], ClipType::Intersection);
        assert_eq!(
            total_area(&union) + total_area(&inter),
            area(&a) + area(&b)
        );
    }

    #[test]
    fn complementarity() {
        // Difference(A, B) ∪ Intersection(A, B) == A
        let a = square(0, 0, 100);
        let b = square(50, 50, 100);
        let diff = run_nonzero(&[a.clone()], &[b.clone()], ClipType::Difference);
        let inter = run_nonzero(&[a.clone()], &[b], ClipType::Intersection);
        let rejoined = run_nonzero(&diff, &inter, ClipType::Union);
        assert_eq!(rejoined.len(), 1);
        assert_eq!(canon(&rejoined[0]), canon(&a));
    }

    #[test]
    fn xor_matches_union_minus_intersection() {
        let a = square(0, 0, 100);
        let b = square(50, 50, 100);
        let xor = run_nonzero(&[a.clone()], &[b.clone()], ClipType::SymmetricDifference);
        let union = run_nonzero(&[a.clone()], &[b.clone()], ClipType::Union);
        let inter = run_nonzero(&[a], &[b], ClipType::Intersection);
        let subtracted = run_nonzero(&union, &inter, ClipType::Difference);
        assert_eq!(total_area(&xor), total_area(&subtracted));
        assert_eq!(total_area(&xor), 15_000.0);
    }

    #[test]
    fn empty_engine_executes_to_empty() {
        let mut c = Clipper::new();
        let result = c
            .execute(
                ClipType::Union,
                PolyFillType::EvenOdd,
                PolyFillType::EvenOdd,
            )
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn engine_is_reusable_across_executes() {
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 100), PolyType::Subject, true).unwrap();
        c.add_path(&square(50, 50, 100), PolyType::Clip, true).unwrap();
        let first = c
            .execute(
                ClipType::Intersection,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            )
            .unwrap();
        let second = c
            .execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert_eq!(total_area(&first), 2500.0);
        assert_eq!(total_area(&second), 17_500.0);

        c.clear();
        let empty = c
            .execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn horizontal_heavy_grid_union() {
        // a row of adjacent axis-aligned cells collapses into one rectangle
        let cells: Vec<Path> = (0..4).map(|i| square(i * 10, 0, 10)).collect();
        let result = run(
            &cells,
            &[],
            ClipType::Union,
            PolyFillType::NonZero,
            PolyFillType::NonZero,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(
            canon(&result[0]),
            vec![p(0, 0), p(0, 10), p(40, 10), p(40, 0)]
        );
    }
}
