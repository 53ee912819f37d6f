//! Output ring construction: doubly-linked point rings grown as contributing
//! edges cross events, spliced at local maxima, and tidied after the sweep.

use crate::geometry::{Path, Paths};
use crate::math::predicates::{pt2_is_between, slopes_equal3, PointLocation};
use crate::math::IntPoint;

use super::edge::{is_horizontal, EdgeId, OutPtId, HORIZONTAL};
use super::{Clipper, EdgeSide};

/// An in-progress output polygon ring.
#[derive(Debug, Clone)]
pub(crate) struct OutRec {
    pub idx: usize,
    pub is_hole: bool,
    /// The enclosing ring for hole nesting.
    pub first_left: Option<usize>,
    /// Set when this ring was absorbed into another during a splice.
    pub append_link: Option<usize>,
    /// Anchor into the circular point list, or `None` once absorbed.
    pub pts: Option<OutPtId>,
    /// The bottom-most (then left-most) point, used to pick hole state when
    /// rings merge.
    pub bottom_pt: Option<OutPtId>,
}

/// A node of a circular doubly-linked output point ring.
#[derive(Debug, Clone)]
pub(crate) struct OutPt {
    /// Back-reference to the owning ring's index.
    pub idx: usize,
    pub pt: IntPoint,
    pub next: OutPtId,
    pub prev: OutPtId,
}

impl Clipper {
    pub(crate) fn create_out_rec(&mut self) -> usize {
        let idx = self.out_recs.len();
        self.out_recs.push(OutRec {
            idx,
            is_hole: false,
            first_left: None,
            append_link: None,
            pts: None,
            bottom_pt: None,
        });
        idx
    }

    /// Appends `pt` to the ring the edge contributes to, creating a fresh
    /// ring when the edge has none. Left-side edges prepend, right-side
    /// edges append; an exact duplicate of the neighbouring point is
    /// suppressed.
    pub(crate) fn add_out_pt(&mut self, e: EdgeId, pt: IntPoint) {
        let to_front = self.edges[e].side == EdgeSide::Left;
        match self.edges[e].out_idx {
            None => {
                let idx = self.create_out_rec();
                self.edges[e].out_idx = Some(idx);
                let op = self.out_pts.insert_with_key(|k| OutPt {
                    idx,
                    pt,
                    next: k,
                    prev: k,
                });
                self.out_recs[idx].pts = Some(op);
                self.out_recs[idx].bottom_pt = Some(op);
                self.set_hole_state(e, idx);
            }
            Some(idx) => {
                let Some(front) = self.out_recs[idx].pts else {
                    return;
                };
                let back = self.out_pts[front].prev;
                if (to_front && pt == self.out_pts[front].pt)
                    || (!to_front && pt == self.out_pts[back].pt)
                {
                    return;
                }
                let op2 = self.out_pts.insert(OutPt {
                    idx,
                    pt,
                    next: front,
                    prev: back,
                });
                self.out_pts[back].next = op2;
                self.out_pts[front].prev = op2;
                if let Some(bp) = self.out_recs[idx].bottom_pt {
                    let bottom = self.out_pts[bp].pt;
                    if pt.y == bottom.y && pt.x < bottom.x {
                        self.out_recs[idx].bottom_pt = Some(op2);
                    }
                }
                if to_front {
                    self.out_recs[idx].pts = Some(op2);
                }
            }
        }
    }

    /// A freshly started ring is a hole iff an odd number of contributing
    /// edges lie to its left in the AEL; the nearest of them becomes its
    /// enclosing ring.
    fn set_hole_state(&mut self, e: EdgeId, out_idx: usize) {
        let mut is_hole = false;
        let mut first_left: Option<usize> = None;
        let mut e2 = self.edges[e].prev_in_ael;
        while let Some(id) = e2 {
            if let Some(oi) = self.edges[id].out_idx {
                is_hole = !is_hole;
                if first_left.is_none() {
                    first_left = Some(oi);
                }
            }
            e2 = self.edges[id].prev_in_ael;
        }
        self.out_recs[out_idx].first_left = first_left;
        if is_hole {
            self.out_recs[out_idx].is_hole = true;
        }
    }

    /// Starts an output ring at a local minimum shared by two edges.
    pub(crate) fn add_local_min_poly(&mut self, e1: EdgeId, e2: EdgeId, pt: IntPoint) {
        if is_horizontal(self.edges[e2].dx) || self.edges[e1].dx > self.edges[e2].dx {
            self.add_out_pt(e1, pt);
            let idx = self.edges[e1].out_idx;
            self.edges[e2].out_idx = idx;
            self.edges[e1].side = EdgeSide::Left;
            self.edges[e2].side = EdgeSide::Right;
        } else {
            self.add_out_pt(e2, pt);
            let idx = self.edges[e2].out_idx;
            self.edges[e1].out_idx = idx;
            self.edges[e1].side = EdgeSide::Right;
            self.edges[e2].side = EdgeSide::Left;
        }
    }

    /// Terminates output at a local maximum: either closes the ring both
    /// edges share, or splices their two rings into one.
    pub(crate) fn add_local_max_poly(&mut self, e1: EdgeId, e2: EdgeId, pt: IntPoint) {
        self.add_out_pt(e1, pt);
        let i1 = self.edges[e1].out_idx;
        let i2 = self.edges[e2].out_idx;
        if i1 == i2 {
            self.edges[e1].out_idx = None;
            self.edges[e2].out_idx = None;
        } else if i1 < i2 {
            self.append_polygon(e1, e2);
        } else {
            self.append_polygon(e2, e1);
        }
    }

    /// Splices `e2`'s ring onto `e1`'s, reversing one side as the four
    /// side-combinations require, and retires `e2`'s ring.
    pub(crate) fn append_polygon(&mut self, e1: EdgeId, e2: EdgeId) {
        let (Some(idx1), Some(idx2)) = (self.edges[e1].out_idx, self.edges[e2].out_idx) else {
            return;
        };

        // the fragment holding the bottom-most point dictates hole state
        let hole_state_is_rec2 = self.compare_bottom_points(idx1, idx2);
        if self.out_recs[idx1].is_hole != self.out_recs[idx2].is_hole {
            if hole_state_is_rec2 {
                self.out_recs[idx1].is_hole = self.out_recs[idx2].is_hole;
            } else {
                self.out_recs[idx2].is_hole = self.out_recs[idx1].is_hole;
            }
        }

        let (Some(p1_lft), Some(p2_lft)) = (self.out_recs[idx1].pts, self.out_recs[idx2].pts)
        else {
            return;
        };
        let p1_rt = self.out_pts[p1_lft].prev;
        let p2_rt = self.out_pts[p2_lft].prev;

        let side;
        if self.edges[e1].side == EdgeSide::Left {
            if self.edges[e2].side == EdgeSide::Left {
                // z y x a b c
                self.reverse_ring_links(p2_lft);
                self.out_pts[p2_lft].next = p1_lft;
                self.out_pts[p1_lft].prev = p2_lft;
                self.out_pts[p1_rt].next = p2_rt;
                self.out_pts[p2_rt].prev = p1_rt;
                self.out_recs[idx1].pts = Some(p2_rt);
            } else {
                // x y z a b c
                self.out_pts[p2_rt].next = p1_lft;
                self.out_pts[p1_lft].prev = p2_rt;
                self.out_pts[p2_lft].prev = p1_rt;
                self.out_pts[p1_rt].next = p2_lft;
                self.out_recs[idx1].pts = Some(p2_lft);
            }
            side = EdgeSide::Left;
        } else {
            if self.edges[e2].side == EdgeSide::Right {
                // a b c z y x
                self.reverse_ring_links(p2_lft);
                self.out_pts[p1_rt].next = p2_rt;
                self.out_pts[p2_rt].prev = p1_rt;
                self.out_pts[p2_lft].next = p1_lft;
                self.out_pts[p1_lft].prev = p2_lft;
            } else {
                // a b c x y z
                self.out_pts[p1_rt].next = p2_lft;
                self.out_pts[p2_lft].prev = p1_rt;
                self.out_pts[p1_lft].prev = p2_rt;
                self.out_pts[p2_rt].next = p1_lft;
            }
            side = EdgeSide::Right;
        }

        // the absorbed ring's points now belong to idx1
        self.renumber_ring(idx1);

        if hole_state_is_rec2 {
            let bp = self.out_recs[idx2].bottom_pt;
            self.out_recs[idx1].bottom_pt = bp;
        }
        self.out_recs[idx2].pts = None;
        self.out_recs[idx2].bottom_pt = None;
        self.out_recs[idx2].append_link = Some(idx1);

        self.edges[e1].out_idx = None;
        self.edges[e2].out_idx = None;

        // rewire any active edge still referring to the absorbed ring
        let mut e = self.active_edges;
        while let Some(id) = e {
            if self.edges[id].out_idx == Some(idx2) {
                self.edges[id].out_idx = Some(idx1);
                self.edges[id].side = side;
                break;
            }
            e = self.edges[id].next_in_ael;
        }

        for join in &mut self.joins {
            if join.poly1_idx == idx2 {
                join.poly1_idx = idx1;
            }
            if join.poly2_idx == idx2 {
                join.poly2_idx = idx1;
            }
        }
        for hj in &mut self.horz_joins {
            if hj.saved_idx == idx2 {
                hj.saved_idx = idx1;
            }
        }
    }

    /// True when rec2's bottom point is lower (or equally low but further
    /// left, or on the shallower pair of edges) than rec1's.
    fn compare_bottom_points(&self, idx1: usize, idx2: usize) -> bool {
        let (Some(b1), Some(b2)) = (self.out_recs[idx1].bottom_pt, self.out_recs[idx2].bottom_pt)
        else {
            return false;
        };
        let pt1 = self.out_pts[b1].pt;
        let pt2 = self.out_pts[b2].pt;
        if pt1.y > pt2.y {
            false
        } else if pt1.y < pt2.y {
            true
        } else if pt1.x < pt2.x {
            false
        } else if pt1.x > pt2.x {
            true
        } else {
            let Some(next1) = self.next_non_dup(b1) else {
                return true;
            };
            let Some(next2) = self.next_non_dup(b2) else {
                return false;
            };
            let prev1 = self.prev_non_dup(b1).unwrap_or(next1);
            let prev2 = self.prev_non_dup(b2).unwrap_or(next2);
            let mut dx1 = point_dx(pt1, self.out_pts[next1].pt);
            let dx = point_dx(pt1, self.out_pts[prev1].pt);
            if dx > dx1 {
                dx1 = dx;
            }
            let dx2 = point_dx(pt2, self.out_pts[next2].pt);
            if dx2 > dx1 {
                true
            } else {
                point_dx(pt2, self.out_pts[prev2].pt) > dx1
            }
        }
    }

    fn next_non_dup(&self, op: OutPtId) -> Option<OutPtId> {
        let pt = self.out_pts[op].pt;
        let mut next = self.out_pts[op].next;
        while next != op && self.out_pts[next].pt == pt {
            next = self.out_pts[next].next;
        }
        (next != op).then_some(next)
    }

    fn prev_non_dup(&self, op: OutPtId) -> Option<OutPtId> {
        let pt = self.out_pts[op].pt;
        let mut prev = self.out_pts[op].prev;
        while prev != op && self.out_pts[prev].pt == pt {
            prev = self.out_pts[prev].prev;
        }
        (prev != op).then_some(prev)
    }

    /// Rewrites the back-references of every point reachable from the
    /// ring's anchor.
    pub(crate) fn renumber_ring(&mut self, idx: usize) {
        let Some(start) = self.out_recs[idx].pts else {
            return;
        };
        let mut op = start;
        loop {
            self.out_pts[op].idx = idx;
            op = self.out_pts[op].next;
            if op == start {
                break;
            }
        }
    }

    /// Reverses traversal order by swapping every node's links.
    pub(crate) fn reverse_ring_links(&mut self, start: OutPtId) {
        let mut op = start;
        loop {
            let next = self.out_pts[op].next;
            let prev = self.out_pts[op].prev;
            self.out_pts[op].next = prev;
            self.out_pts[op].prev = next;
            op = next;
            if op == start {
                break;
            }
        }
    }

    /// Signed ring area in output traversal order; same sign convention as
    /// [`crate::math::polygon::area`].
    pub(crate) fn ring_area(&self, idx: usize) -> f64 {
        let Some(start) = self.out_recs[idx].pts else {
            return 0.0;
        };
        let mut a: i128 = 0;
        let mut op = start;
        loop {
            let cur = self.out_pts[op].pt;
            let next_id = self.out_pts[op].next;
            let next = self.out_pts[next_id].pt;
            a += i128::from(next.x) * i128::from(cur.y) - i128::from(cur.x) * i128::from(next.y);
            op = next_id;
            if op == start {
                break;
            }
        }
        a as f64 / 2.0
    }

    pub(crate) fn ring_point_count(&self, start: OutPtId) -> usize {
        let mut count = 1;
        let mut op = self.out_pts[start].next;
        while op != start {
            count += 1;
            op = self.out_pts[op].next;
        }
        count
    }

    /// Removes every node of a ring from the arena.
    pub(crate) fn dispose_ring(&mut self, start: OutPtId) {
        let mut op = start;
        loop {
            let next = self.out_pts[op].next;
            self.out_pts.remove(op);
            if next == start {
                break;
            }
            op = next;
        }
    }

    /// Removes duplicate points and collinear middle vertices from a ring;
    /// degenerate rings are discarded entirely.
    pub(crate) fn fixup_out_polygon(&mut self, idx: usize) {
        let Some(bottom) = self.out_recs[idx].bottom_pt else {
            return;
        };
        self.out_recs[idx].pts = Some(bottom);
        let mut last_ok: Option<OutPtId> = None;
        let mut pp = bottom;
        loop {
            let prev = self.out_pts[pp].prev;
            let next = self.out_pts[pp].next;
            if prev == pp || prev == next {
                self.dispose_ring(pp);
                self.out_recs[idx].pts = None;
                self.out_recs[idx].bottom_pt = None;
                return;
            }
            let pt = self.out_pts[pp].pt;
            let prev_pt = self.out_pts[prev].pt;
            let next_pt = self.out_pts[next].pt;
            let remove = pt == next_pt
                || (slopes_equal3(prev_pt, pt, next_pt, self.use_full_range)
                    && !(self.preserve_collinear && pt2_is_between(prev_pt, pt, next_pt)));
            if remove {
                last_ok = None;
                if self.out_recs[idx].bottom_pt == Some(pp) {
                    let new_bottom = if prev_pt.y > next_pt.y { prev } else { next };
                    self.out_recs[idx].bottom_pt = Some(new_bottom);
                    self.out_recs[idx].pts = Some(new_bottom);
                }
                self.out_pts[prev].next = next;
                self.out_pts[next].prev = prev;
                self.out_pts.remove(pp);
                pp = prev;
            } else if Some(pp) == last_ok {
                break;
            } else {
                if last_ok.is_none() {
                    last_ok = Some(pp);
                }
                pp = next;
            }
        }
    }

    /// Copies every surviving ring with at least three points out to
    /// caller-owned paths.
    pub(crate) fn build_result(&self) -> Paths {
        let mut solution = Vec::with_capacity(self.out_recs.len());
        for rec in &self.out_recs {
            let Some(start) = rec.pts else {
                continue;
            };
            let count = self.ring_point_count(start);
            if count < 3 {
                continue;
            }
            let mut path: Path = Vec::with_capacity(count);
            let mut op = start;
            loop {
                path.push(self.out_pts[op].pt);
                op = self.out_pts[op].next;
                if op == start {
                    break;
                }
            }
            solution.push(path);
        }
        solution
    }

    /// The bottom-most then left-most point of a ring.
    pub(crate) fn ring_bottom(&self, start: OutPtId) -> OutPtId {
        let mut result = start;
        let mut op = self.out_pts[start].next;
        while op != start {
            let pt = self.out_pts[op].pt;
            let best = self.out_pts[result].pt;
            if pt.y > best.y || (pt.y == best.y && pt.x < best.x) {
                result = op;
            }
            op = self.out_pts[op].next;
        }
        result
    }

    /// Even-odd membership of a point against an output ring.
    pub(crate) fn point_in_ring(&self, pt: IntPoint, start: OutPtId) -> bool {
        let mut inside = false;
        let mut op = start;
        loop {
            let cur = self.out_pts[op].pt;
            let prev = self.out_pts[self.out_pts[op].prev].pt;
            if (cur.y <= pt.y && pt.y < prev.y) || (prev.y <= pt.y && pt.y < cur.y) {
                let crossed = if self.use_full_range {
                    i128::from(pt.x - cur.x) * i128::from(prev.y - cur.y)
                        < i128::from(prev.x - cur.x) * i128::from(pt.y - cur.y)
                } else {
                    (pt.x - cur.x) * (prev.y - cur.y) < (prev.x - cur.x) * (pt.y - cur.y)
                };
                if crossed {
                    inside = !inside;
                }
            }
            op = self.out_pts[op].next;
            if op == start {
                break;
            }
        }
        inside
    }

    /// Three-state membership of a point against an output ring.
    pub(crate) fn point_in_ring3(&self, pt: IntPoint, start: OutPtId) -> PointLocation {
        let mut inside = false;
        let mut op = start;
        loop {
            let ip = self.out_pts[op].pt;
            let ip_next = self.out_pts[self.out_pts[op].next].pt;
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
            op = self.out_pts[op].next;
            if op == start {
                break;
            }
        }
        if inside {
            PointLocation::Inside
        } else {
            PointLocation::Outside
        }
    }

    /// Does ring 1 lie inside ring 2? Points exactly on the boundary are
    /// skipped; a ring entirely on the boundary counts as inside.
    pub(crate) fn ring_contains_ring(&self, inner: OutPtId, outer: OutPtId) -> bool {
        let mut op = inner;
        loop {
            match self.point_in_ring3(self.out_pts[op].pt, outer) {
                PointLocation::Inside => return true,
                PointLocation::Outside => return false,
                PointLocation::OnBoundary => {}
            }
            op = self.out_pts[op].next;
            if op == inner {
                break;
            }
        }
        true
    }

    /// Splits rings that revisit a vertex location into separate rings,
    /// fixing hole state by containment.
    pub(crate) fn do_simple_polygons(&mut self) {
        let mut i = 0;
        while i < self.out_recs.len() {
            let idx = i;
            i += 1;
            let Some(mut op) = self.out_recs[idx].pts else {
                continue;
            };
            let anchor = op;
            loop {
                let mut op2 = self.out_pts[op].next;
                let stop = self.out_recs[idx].pts.unwrap_or(anchor);
                let mut split_happened = false;
                while op2 != stop {
                    let same_pt = self.out_pts[op].pt == self.out_pts[op2].pt;
                    if same_pt
                        && self.out_pts[op2].next != op
                        && self.out_pts[op2].prev != op
                    {
                        // split the ring in two at the shared location
                        let op3 = self.out_pts[op].prev;
                        let op4 = self.out_pts[op2].prev;
                        self.out_pts[op].prev = op4;
                        self.out_pts[op4].next = op;
                        self.out_pts[op2].prev = op3;
                        self.out_pts[op3].next = op2;

                        self.out_recs[idx].pts = Some(op);
                        self.out_recs[idx].bottom_pt = Some(self.ring_bottom(op));
                        let idx2 = self.create_out_rec();
                        self.out_recs[idx2].pts = Some(op2);
                        self.out_recs[idx2].bottom_pt = Some(self.ring_bottom(op2));
                        self.renumber_ring(idx2);
                        self.renumber_ring(idx);

                        if self.ring_contains_ring(op2, op) {
                            // the new ring is nested inside the old one
                            let hole = !self.out_recs[idx].is_hole;
                            self.out_recs[idx2].is_hole = hole;
                            self.out_recs[idx2].first_left = Some(idx);
                            if hole == (self.ring_area(idx2) > 0.0) {
                                self.reverse_ring_links(op2);
                            }
                        } else if self.ring_contains_ring(op, op2) {
                            let hole = self.out_recs[idx].is_hole;
                            self.out_recs[idx2].is_hole = hole;
                            self.out_recs[idx].is_hole = !hole;
                            let fl = self.out_recs[idx].first_left;
                            self.out_recs[idx2].first_left = fl;
                            self.out_recs[idx].first_left = Some(idx2);
                            if self.out_recs[idx].is_hole == (self.ring_area(idx) > 0.0) {
                                self.reverse_ring_links(op);
                            }
                        } else {
                            let hole = self.out_recs[idx].is_hole;
                            self.out_recs[idx2].is_hole = hole;
                            let fl = self.out_recs[idx].first_left;
                            self.out_recs[idx2].first_left = fl;
                        }
                        split_happened = true;
                        break;
                    }
                    op2 = self.out_pts[op2].next;
                }
                if split_happened {
                    // rescan the (now smaller) ring from its new anchor
                    op = self.out_recs[idx].pts.unwrap_or(op);
                    continue;
                }
                op = self.out_pts[op].next;
                if Some(op) == self.out_recs[idx].pts {
                    break;
                }
            }
        }
    }
}

/// Inverse slope of the segment between two ring points.
fn point_dx(pt1: IntPoint, pt2: IntPoint) -> f64 {
    if pt1.y == pt2.y {
        HORIZONTAL
    } else {
        (pt2.x - pt1.x) as f64 / (pt2.y - pt1.y) as f64
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64) -> IntPoint {
        IntPoint::new(x, y)
    }

    /// Builds a circular output ring directly in the arena.
    fn make_ring(c: &mut Clipper, pts: &[IntPoint]) -> usize {
        let idx = c.create_out_rec();
        let ids: Vec<OutPtId> = pts
            .iter()
            .map(|&pt| {
                c.out_pts.insert_with_key(|k| OutPt {
                    idx,
                    pt,
                    next: k,
                    prev: k,
                })
            })
            .collect();
        let n = ids.len();
        for i in 0..n {
            c.out_pts[ids[i]].next = ids[(i + 1) % n];
            c.out_pts[ids[i]].prev = ids[(i + n - 1) % n];
        }
        c.out_recs[idx].pts = Some(ids[0]);
        let bottom = c.ring_bottom(ids[0]);
        c.out_recs[idx].bottom_pt = Some(bottom);
        idx
    }

    #[test]
    fn ring_area_matches_traversal_and_reversal_flips_it() {
        let mut c = Clipper::new();
        let idx = make_ring(&mut c, &[p(0, 0), p(0, 10), p(10, 10), p(10, 0)]);
        assert_eq!(c.ring_area(idx), 100.0);
        let start = c.out_recs[idx].pts.unwrap();
        c.reverse_ring_links(start);
        assert_eq!(c.ring_area(idx), -100.0);
    }

    #[test]
    fn fixup_removes_duplicates_and_collinear_points() {
        let mut c = Clipper::new();
        let idx = make_ring(
            &mut c,
            &[
                p(0, 0),
                p(0, 5),
                p(0, 10),
                p(10, 10),
                p(10, 10),
                p(10, 0),
            ],
        );
        c.fixup_out_polygon(idx);
        let start = c.out_recs[idx].pts.unwrap();
        assert_eq!(c.ring_point_count(start), 4);
        let paths = c.build_result();
        assert_eq!(paths.len(), 1);
        assert!(!paths[0].contains(&p(0, 5)));
    }

    #[test]
    fn fixup_discards_a_degenerate_ring() {
        let mut c = Clipper::new();
        let idx = make_ring(&mut c, &[p(0, 0), p(5, 0), p(10, 0)]);
        c.fixup_out_polygon(idx);
        assert!(c.out_recs[idx].pts.is_none());
        assert!(c.build_result().is_empty());
        assert!(c.out_pts.is_empty());
    }

    #[test]
    fn ring_bottom_prefers_lowest_then_leftmost() {
        let mut c = Clipper::new();
        let idx = make_ring(&mut c, &[p(5, 0), p(10, 10), p(0, 10)]);
        let bottom = c.out_recs[idx].bottom_pt.unwrap();
        // the sweep's bottom is the largest y, ties broken towards small x
        assert_eq!(c.out_pts[bottom].pt, p(0, 10));
    }

    #[test]
    fn point_in_ring_classification() {
        let mut c = Clipper::new();
        let idx = make_ring(&mut c, &[p(0, 0), p(0, 10), p(10, 10), p(10, 0)]);
        let start = c.out_recs[idx].pts.unwrap();
        assert_eq!(c.point_in_ring3(p(5, 5), start), PointLocation::Inside);
        assert_eq!(c.point_in_ring3(p(15, 5), start), PointLocation::Outside);
        assert_eq!(c.point_in_ring3(p(0, 5), start), PointLocation::OnBoundary);
        assert!(c.point_in_ring(p(5, 5), start));
        assert!(!c.point_in_ring(p(15, 5), start));
    }

    #[test]
    fn figure_eight_ring_splits_at_the_shared_vertex() {
        let mut c = Clipper::new();
        make_ring(
            &mut c,
            &[p(0, 0), p(0, 10), p(5, 5), p(10, 10), p(10, 0), p(5, 5)],
        );
        c.do_simple_polygons();
        let paths = c.build_result();
        assert_eq!(paths.len(), 2);
        for ring in &paths {
            assert_eq!(ring.len(), 3);
            assert!(ring.contains(&p(5, 5)));
        }
    }
}
