//! Input registration: vertex cleanup, edge-ring construction and the
//! partitioning of each ring into left/right bounds hanging off local minima.

use crate::error::InputError;
use crate::geometry::{Path, Paths};
use crate::math::predicates::{pt2_is_between, slopes_equal3};
use crate::math::{IntPoint, HI_RANGE, LO_RANGE};

use super::edge::{is_horizontal, Edge, EdgeId, HORIZONTAL};
use super::{Clipper, EdgeSide, LocalMinima, PolyType};

impl Clipper {
    /// Registers one closed polygon.
    ///
    /// Duplicate consecutive vertices and (unless `preserve_collinear` is
    /// set) collinear vertices are removed before edges are built.
    ///
    /// # Errors
    ///
    /// - [`InputError::OpenPathsUnsupported`] when `closed` is false.
    /// - [`InputError::RangeExceeded`] when a coordinate magnitude exceeds
    ///   the supported range.
    /// - [`InputError::DegeneratePath`] when fewer than three distinct
    ///   vertices remain after cleanup; the engine state is unchanged.
    pub fn add_path(
        &mut self,
        path: &Path,
        poly_type: PolyType,
        closed: bool,
    ) -> Result<(), InputError> {
        if !closed {
            return Err(InputError::OpenPathsUnsupported);
        }
        if path.len() < 3 {
            return Err(InputError::DegeneratePath);
        }
        let mut use_full = self.use_full_range;
        for pt in path {
            use_full = range_test(*pt, use_full)?;
        }

        let p = self.clean_input_ring(path, use_full)?;
        self.use_full_range = use_full;

        // allocate the edge ring
        let n = p.len();
        let ids: Vec<EdgeId> = (0..n)
            .map(|_| self.edges.insert_with_key(Edge::placeholder))
            .collect();

        // link vertices into a circular doubly-linked edge list; the current
        // point of an edge's successor must be set before the edge itself
        self.edges[ids[0]].curr = p[0];
        self.init_edge(ids[n - 1], ids[0], ids[n - 2], p[n - 1], poly_type);
        for i in (1..n - 1).rev() {
            self.init_edge(ids[i], ids[i + 1], ids[i - 1], p[i], poly_type);
        }
        self.init_edge(ids[0], ids[1], ids[n - 1], p[0], poly_type);

        // reset curr and find the highest edge (smallest top y; the sweep's
        // y axis grows towards the bottom of the input)
        let mut e = ids[0];
        let mut e_highest = e;
        loop {
            let bot = self.edges[e].bot;
            self.edges[e].curr = bot;
            if self.edges[e].top.y < self.edges[e_highest].top.y {
                e_highest = e;
            }
            e = self.edges[e].next;
            if e == ids[0] {
                break;
            }
        }

        // position e_highest so the bound walk below terminates correctly
        if self.edges[e_highest].wind_delta > 0 {
            e_highest = self.edges[e_highest].next;
        }
        if is_horizontal(self.edges[e_highest].dx) {
            e_highest = self.edges[e_highest].next;
        }

        let mut e = e_highest;
        loop {
            e = self.add_bounds_to_lml(e);
            if e == e_highest {
                break;
            }
        }
        Ok(())
    }

    /// Registers a set of closed polygons.
    ///
    /// # Errors
    ///
    /// Succeeds when at least one path was registered; otherwise returns the
    /// last per-path error. Valid paths before an invalid one are kept.
    pub fn add_paths(
        &mut self,
        paths: &Paths,
        poly_type: PolyType,
        closed: bool,
    ) -> Result<(), InputError> {
        let mut added = false;
        let mut last_err = InputError::DegeneratePath;
        for path in paths {
            match self.add_path(path, poly_type, closed) {
                Ok(()) => added = true,
                Err(err) => last_err = err,
            }
        }
        if added || paths.is_empty() {
            Ok(())
        } else {
            Err(last_err)
        }
    }

    /// Strips duplicate and (optionally) collinear vertices, repeating until
    /// stable across the ring closure.
    fn clean_input_ring(&self, path: &Path, use_full: bool) -> Result<Vec<IntPoint>, InputError> {
        let len = path.len();
        let mut p: Vec<IntPoint> = Vec::with_capacity(len);
        p.push(path[0]);
        let mut j = 0usize;
        for &pt in &path[1..] {
            if p[j] == pt {
                continue;
            } else if j > 0
                && slopes_equal3(p[j - 1], p[j], pt, use_full)
                && !(self.preserve_collinear && pt2_is_between(p[j - 1], p[j], pt))
            {
                if p[j - 1] == pt {
                    j -= 1;
                }
            } else {
                j += 1;
            }
            if j < p.len() {
                p[j] = pt;
            } else {
                p.push(pt);
            }
        }
        if j < 2 {
            return Err(InputError::DegeneratePath);
        }

        // the ring closure may hide more duplicates and collinear runs
        let mut len2 = j + 1;
        loop {
            if p[j] == p[0] {
                j -= 1;
            } else if p[0] == p[1]
                || (slopes_equal3(p[j], p[0], p[1], use_full)
                    && !(self.preserve_collinear && pt2_is_between(p[j], p[0], p[1])))
            {
                p[0] = p[j];
                j -= 1;
            } else if slopes_equal3(p[j - 1], p[j], p[0], use_full)
                && !(self.preserve_collinear && pt2_is_between(p[j - 1], p[j], p[0]))
            {
                j -= 1;
            } else if slopes_equal3(p[0], p[1], p[2], use_full)
                && !(self.preserve_collinear && pt2_is_between(p[0], p[1], p[2]))
            {
                for i in 2..=j {
                    p[i - 1] = p[i];
                }
                j -= 1;
            }
            if j == len2 - 1 || j < 2 {
                break;
            }
            len2 = j + 1;
        }
        if j + 1 < 3 {
            return Err(InputError::DegeneratePath);
        }
        p.truncate(j + 1);
        Ok(p)
    }

    fn init_edge(
        &mut self,
        e: EdgeId,
        next: EdgeId,
        prev: EdgeId,
        pt: IntPoint,
        poly_type: PolyType,
    ) {
        let next_curr = self.edges[next].curr;
        let edge = &mut self.edges[e];
        edge.next = next;
        edge.prev = prev;
        edge.curr = pt;
        if edge.curr.y >= next_curr.y {
            edge.bot = edge.curr;
            edge.top = next_curr;
            edge.wind_delta = 1;
        } else {
            edge.top = edge.curr;
            edge.bot = next_curr;
            edge.wind_delta = -1;
        }
        edge.dx = if edge.bot.y == edge.top.y {
            HORIZONTAL
        } else {
            (edge.top.x - edge.bot.x) as f64 / (edge.top.y - edge.bot.y) as f64
        };
        edge.poly_type = poly_type;
        edge.out_idx = None;
    }

    /// Swaps a horizontal edge's top and bottom x so it follows the natural
    /// progression of its bound (its bot aligns with the adjoining lower
    /// edge), which the horizontal processing relies on.
    fn swap_x(&mut self, e: EdgeId) {
        let edge = &mut self.edges[e];
        edge.curr.x = edge.top.x;
        edge.top.x = edge.bot.x;
        edge.bot.x = edge.curr.x;
    }

    /// Starting at the top of one bound, descends to the local minimum below
    /// it, registers the minimum with its left and right bounds, then climbs
    /// the following bound. Returns the edge starting the next descent.
    fn add_bounds_to_lml(&mut self, mut e: EdgeId) -> EdgeId {
        self.edges[e].next_in_lml = None;
        e = self.edges[e].next;
        loop {
            if is_horizontal(self.edges[e].dx) {
                // proceed through horizontals when approaching from their
                // right, but break on horizontal minima approached from the
                // left, so local minima are always left of their horizontals
                let next = self.edges[e].next;
                let prev = self.edges[e].prev;
                if self.edges[next].top.y < self.edges[e].top.y
                    && self.edges[next].bot.x > self.edges[prev].bot.x
                {
                    break;
                }
                if self.edges[e].top.x != self.edges[prev].bot.x {
                    self.swap_x(e);
                }
                self.edges[e].next_in_lml = Some(prev);
            } else {
                let prev = self.edges[e].prev;
                if self.edges[e].curr.y == self.edges[prev].curr.y {
                    break;
                }
                self.edges[e].next_in_lml = Some(prev);
            }
            e = self.edges[e].next;
        }

        // e and e.prev now sit at a local minimum
        let prev = self.edges[e].prev;
        let (left, right) = if is_horizontal(self.edges[e].dx) {
            // horizontal edges never start a left bound
            if self.edges[e].bot.x != self.edges[prev].bot.x {
                self.swap_x(e);
            }
            (prev, e)
        } else if self.edges[e].dx < self.edges[prev].dx {
            (prev, e)
        } else {
            (e, prev)
        };
        self.edges[left].side = EdgeSide::Left;
        self.edges[right].side = EdgeSide::Right;
        let lm = LocalMinima {
            y: self.edges[prev].bot.y,
            left_bound: left,
            right_bound: right,
        };
        self.insert_local_minima(lm);

        // climb the right-hand bound to its top
        loop {
            let next = self.edges[e].next;
            if self.edges[next].top.y == self.edges[e].top.y && !is_horizontal(self.edges[next].dx)
            {
                break;
            }
            self.edges[e].next_in_lml = Some(next);
            e = next;
            let prev = self.edges[e].prev;
            if is_horizontal(self.edges[e].dx) && self.edges[e].bot.x != self.edges[prev].top.x {
                self.swap_x(e);
            }
        }
        self.edges[e].next
    }

    /// Inserts into the schedule keeping it sorted by descending y.
    fn insert_local_minima(&mut self, lm: LocalMinima) {
        let pos = self
            .minima
            .iter()
            .position(|m| m.y <= lm.y)
            .unwrap_or(self.minima.len());
        self.minima.insert(pos, lm);
    }

    /// Restores every registered edge to its pre-sweep state and reseeds the
    /// scanbeam queue from the minima schedule.
    pub(crate) fn reset(&mut self) {
        self.current_lm = 0;
        self.scanbeam.clear();
        self.active_edges = None;
        self.sorted_edges = None;
        self.intersect_nodes.clear();
        self.out_pts.clear();
        self.out_recs.clear();
        self.joins.clear();
        self.horz_joins.clear();

        for i in 0..self.minima.len() {
            let lm = self.minima[i];
            let mut bound = Some(lm.left_bound);
            while let Some(e) = bound {
                let bot = self.edges[e].bot;
                let edge = &mut self.edges[e];
                edge.curr = bot;
                edge.side = EdgeSide::Left;
                edge.out_idx = None;
                bound = edge.next_in_lml;
            }
            let mut bound = Some(lm.right_bound);
            while let Some(e) = bound {
                let bot = self.edges[e].bot;
                let edge = &mut self.edges[e];
                edge.curr = bot;
                edge.side = EdgeSide::Right;
                edge.out_idx = None;
                bound = edge.next_in_lml;
            }
            self.insert_scanbeam(lm.y);
            let top_y = self.edges[lm.left_bound].top.y;
            self.insert_scanbeam(top_y);
        }
    }
}

/// Validates a coordinate and reports whether extended-precision arithmetic
/// is needed from here on.
fn range_test(pt: IntPoint, use_full: bool) -> Result<bool, InputError> {
    if use_full {
        if pt.x.abs() > HI_RANGE || pt.y.abs() > HI_RANGE {
            Err(InputError::RangeExceeded)
        } else {
            Ok(true)
        }
    } else if pt.x.abs() > LO_RANGE || pt.y.abs() > LO_RANGE {
        range_test(pt, true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64) -> IntPoint {
        IntPoint::new(x, y)
    }

    #[test]
    fn rejects_open_paths() {
        let mut c = Clipper::new();
        let path = vec![p(0, 0), p(10, 0), p(10, 10)];
        assert_eq!(
            c.add_path(&path, PolyType::Subject, false),
            Err(InputError::OpenPathsUnsupported)
        );
    }

    #[test]
    fn rejects_too_few_points() {
        let mut c = Clipper::new();
        assert_eq!(
            c.add_path(&vec![p(0, 0), p(10, 0)], PolyType::Subject, true),
            Err(InputError::DegeneratePath)
        );
    }

    #[test]
    fn rejects_all_collinear() {
        let mut c = Clipper::new();
        let flat = vec![p(0, 0), p(50, 0), p(100, 0)];
        assert_eq!(
            c.add_path(&flat, PolyType::Subject, true),
            Err(InputError::DegeneratePath)
        );
    }

    #[test]
    fn rejects_duplicates_only() {
        let mut c = Clipper::new();
        let dup = vec![p(5, 5), p(5, 5), p(5, 5), p(5, 5)];
        assert_eq!(
            c.add_path(&dup, PolyType::Subject, true),
            Err(InputError::DegeneratePath)
        );
    }

    #[test]
    fn rejects_out_of_range() {
        let mut c = Clipper::new();
        let far = HI_RANGE + 1;
        let path = vec![p(0, 0), p(far, 0), p(far, far)];
        assert_eq!(
            c.add_path(&path, PolyType::Subject, true),
            Err(InputError::RangeExceeded)
        );
        // the failed add must leave the engine unchanged
        assert!(c.minima.is_empty());
        assert!(!c.use_full_range);
    }

    #[test]
    fn large_coordinates_enable_full_range() {
        let mut c = Clipper::new();
        let big = LO_RANGE + 1;
        let path = vec![p(0, 0), p(0, big), p(big, big), p(big, 0)];
        c.add_path(&path, PolyType::Subject, true).unwrap();
        assert!(c.use_full_range);
    }

    #[test]
    fn strips_duplicate_and_collinear_vertices() {
        let mut c = Clipper::new();
        let path = vec![
            p(0, 0),
            p(0, 0),
            p(0, 50),
            p(0, 100),
            p(100, 100),
            p(100, 0),
            p(50, 0),
        ];
        c.add_path(&path, PolyType::Subject, true).unwrap();
        // a square has exactly four edges left after cleanup
        assert_eq!(c.edges.len(), 4);
        assert_eq!(c.minima.len(), 1);
    }

    #[test]
    fn minima_schedule_is_sorted_descending() {
        let mut c = Clipper::new();
        c.add_path(
            &vec![p(0, 0), p(0, 10), p(10, 10), p(10, 0)],
            PolyType::Subject,
            true,
        )
        .unwrap();
        c.add_path(
            &vec![p(0, 50), p(0, 60), p(10, 60), p(10, 50)],
            PolyType::Subject,
            true,
        )
        .unwrap();
        let ys: Vec<i64> = c.minima.iter().map(|m| m.y).collect();
        assert_eq!(ys, vec![60, 10]);
    }

    #[test]
    fn add_paths_keeps_valid_entries() {
        let mut c = Clipper::new();
        let paths = vec![
            vec![p(0, 0), p(10, 0)], // degenerate
            vec![p(0, 0), p(0, 10), p(10, 10), p(10, 0)],
        ];
        c.add_paths(&paths, PolyType::Subject, true).unwrap();
        assert_eq!(c.minima.len(), 1);

        let all_bad = vec![vec![p(0, 0), p(1, 1)]];
        assert!(c.add_paths(&all_bad, PolyType::Clip, true).is_err());
    }
}
