//! Deferred ring joins: when the sweep detects output polygons sharing a
//! collinear edge it records a join request; after all edges retire the
//! requests are verified and the rings spliced (or split, when a ring is
//! joined with itself).

use crate::math::predicates::{pt3_is_on_segment, slopes_equal3, slopes_equal4};
use crate::math::IntPoint;

use super::edge::{EdgeId, OutPtId};
use super::output::OutPt;
use super::Clipper;

/// A deferred request to splice two rings along a shared collinear segment.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JoinRec {
    pub pt1a: IntPoint,
    pub pt1b: IntPoint,
    pub poly1_idx: usize,
    pub pt2a: IntPoint,
    pub pt2b: IntPoint,
    pub poly2_idx: usize,
}

/// A horizontal edge remembered for overlap detection against later
/// horizontals at the same level.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HorzJoinRec {
    pub edge: EdgeId,
    pub saved_idx: usize,
}

/// Clamps two collinear segments to their common overlap, if any.
///
/// Returns the overlap endpoints ordered along the dominant axis.
pub(crate) fn get_overlap_segment(
    mut pt1a: IntPoint,
    mut pt1b: IntPoint,
    mut pt2a: IntPoint,
    mut pt2b: IntPoint,
) -> Option<(IntPoint, IntPoint)> {
    if pt1a.y == pt1b.y || ((pt1a.x - pt1b.x) / (pt1a.y - pt1b.y)).abs() > 1 {
        if pt1a.x > pt1b.x {
            std::mem::swap(&mut pt1a, &mut pt1b);
        }
        if pt2a.x > pt2b.x {
            std::mem::swap(&mut pt2a, &mut pt2b);
        }
        let pt1 = if pt1a.x > pt2a.x { pt1a } else { pt2a };
        let pt2 = if pt1b.x < pt2b.x { pt1b } else { pt2b };
        (pt1.x < pt2.x).then_some((pt1, pt2))
    } else {
        if pt1a.y < pt1b.y {
            std::mem::swap(&mut pt1a, &mut pt1b);
        }
        if pt2a.y < pt2b.y {
            std::mem::swap(&mut pt2a, &mut pt2b);
        }
        let pt1 = if pt1a.y < pt2a.y { pt1a } else { pt2a };
        let pt2 = if pt1b.y > pt2b.y { pt1b } else { pt2b };
        (pt1.y > pt2.y).then_some((pt1, pt2))
    }
}

impl Clipper {
    /// Records a join between the rings the two edges are contributing to.
    /// Explicit indices override the edges' current ring assignment (used
    /// when the ring index was captured before later splices).
    pub(crate) fn add_join(
        &mut self,
        e1: EdgeId,
        e2: EdgeId,
        e1_out_idx: Option<usize>,
        e2_out_idx: Option<usize>,
    ) {
        let Some(poly1_idx) = e1_out_idx.or(self.edges[e1].out_idx) else {
            return;
        };
        let Some(poly2_idx) = e2_out_idx.or(self.edges[e2].out_idx) else {
            return;
        };
        let jr = JoinRec {
            pt1a: self.edges[e1].curr,
            pt1b: self.edges[e1].top,
            poly1_idx,
            pt2a: self.edges[e2].curr,
            pt2b: self.edges[e2].top,
            poly2_idx,
        };
        self.joins.push(jr);
    }

    pub(crate) fn add_horz_join(&mut self, e: EdgeId, saved_idx: usize) {
        self.horz_joins.push(HorzJoinRec { edge: e, saved_idx });
    }

    /// Finds a ring segment collinear with `pt1→pt2` that overlaps it,
    /// returning the containing ring node and the clamped overlap.
    fn find_segment(
        &self,
        start: OutPtId,
        pt1: IntPoint,
        pt2: IntPoint,
    ) -> Option<(OutPtId, IntPoint, IntPoint)> {
        let mut pp = start;
        loop {
            let pp_pt = self.out_pts[pp].pt;
            let prev_pt = self.out_pts[self.out_pts[pp].prev].pt;
            if slopes_equal4(pt1, pt2, pp_pt, prev_pt, true) && slopes_equal3(pt1, pt2, pp_pt, true)
            {
                if let Some((a, b)) = get_overlap_segment(pt1, pt2, pp_pt, prev_pt) {
                    return Some((pp, a, b));
                }
            }
            pp = self.out_pts[pp].next;
            if pp == start {
                return None;
            }
        }
    }

    /// Inserts a new ring point carrying `pt` between two neighbouring
    /// nodes (in either link orientation).
    fn insert_ring_pt_between(&mut self, p1: OutPtId, p2: OutPtId, pt: IntPoint) -> OutPtId {
        let idx = self.out_pts[p1].idx;
        if p2 == self.out_pts[p1].next {
            let result = self.out_pts.insert(OutPt {
                idx,
                pt,
                next: p2,
                prev: p1,
            });
            self.out_pts[p1].next = result;
            self.out_pts[p2].prev = result;
            result
        } else {
            let result = self.out_pts.insert(OutPt {
                idx,
                pt,
                next: p1,
                prev: p2,
            });
            self.out_pts[p2].next = result;
            self.out_pts[p1].prev = result;
            result
        }
    }

    /// Locates (or inserts) the two ring nodes bounding the overlap
    /// `pt1→pt2` next to `pp`, returning them in ring order.
    fn overlap_nodes(
        &mut self,
        pp: OutPtId,
        pt1: IntPoint,
        pt2: IntPoint,
    ) -> (OutPtId, OutPtId) {
        let prev = self.out_pts[pp].prev;
        let pp_pt = self.out_pts[pp].pt;
        let prev_pt = self.out_pts[prev].pt;

        let p1 = if pp_pt == pt1 {
            pp
        } else if prev_pt == pt1 {
            prev
        } else {
            self.insert_ring_pt_between(pp, prev, pt1)
        };

        let p2 = if pp_pt == pt2 {
            pp
        } else if prev_pt == pt2 {
            prev
        } else if p1 == pp || p1 == prev {
            self.insert_ring_pt_between(pp, prev, pt2)
        } else if pt3_is_on_segment(pp_pt, self.out_pts[p1].pt, pt2) {
            self.insert_ring_pt_between(pp, p1, pt2)
        } else {
            self.insert_ring_pt_between(p1, prev, pt2)
        };
        (p1, p2)
    }

    fn point_is_ring_vertex(&self, pt: IntPoint, start: OutPtId) -> bool {
        let mut op = start;
        loop {
            if self.out_pts[op].pt == pt {
                return true;
            }
            op = self.out_pts[op].next;
            if op == start {
                return false;
            }
        }
    }

    /// Resolves every deferred join accumulated during the sweep.
    pub(crate) fn join_common_edges(&mut self) {
        for i in 0..self.joins.len() {
            let join = self.joins[i];
            let Some(pp1a_start) = self.out_recs[join.poly1_idx].pts else {
                continue;
            };
            let Some(pp2a_start) = self.out_recs[join.poly2_idx].pts else {
                continue;
            };

            // locate the two overlapping ring segments
            let Some((pp1a, mut pt1, mut pt2)) =
                self.find_segment(pp1a_start, join.pt2a, join.pt2b)
            else {
                continue;
            };
            let found2 = if join.poly1_idx == join.poly2_idx {
                // searching one ring for both segments: segment 2 must be a
                // different node than segment 1
                let from = self.out_pts[pp1a].next;
                match self.find_segment(from, join.pt1a, join.pt1b) {
                    Some((pp2a, pt3, pt4)) if pp2a != pp1a => Some((pp2a, pt3, pt4)),
                    _ => None,
                }
            } else {
                self.find_segment(pp2a_start, join.pt1a, join.pt1b)
            };
            let Some((pp2a, pt3, pt4)) = found2 else {
                continue;
            };
            let Some((a, b)) = get_overlap_segment(pt1, pt2, pt3, pt4) else {
                continue;
            };
            pt1 = a;
            pt2 = b;

            let (p1, p2) = self.overlap_nodes(pp1a, pt1, pt2);
            let (p3, p4) = self.overlap_nodes(pp2a, pt1, pt2);

            // p1.pt == p3.pt and p2.pt == p4.pt, so join p1→p3 and p2→p4
            if self.out_pts[p1].next == p2 && self.out_pts[p3].prev == p4 {
                self.out_pts[p1].next = p3;
                self.out_pts[p3].prev = p1;
                self.out_pts[p2].prev = p4;
                self.out_pts[p4].next = p2;
            } else if self.out_pts[p1].prev == p2 && self.out_pts[p3].next == p4 {
                self.out_pts[p1].prev = p3;
                self.out_pts[p3].next = p1;
                self.out_pts[p2].next = p4;
                self.out_pts[p4].prev = p2;
            } else {
                continue; // an orientation is probably wrong
            }

            if join.poly1_idx == join.poly2_idx {
                // the self-join split one ring into two; keep the longer
                // fragment on the original record (it may own holes)
                let idx1 = join.poly1_idx;
                let (keep, split) = if self.ring_point_count(p1) > self.ring_point_count(p2) {
                    (p1, p2)
                } else {
                    (p2, p1)
                };
                let keep_bottom = self.ring_bottom(keep);
                self.out_recs[idx1].pts = Some(keep_bottom);
                self.out_recs[idx1].bottom_pt = Some(keep_bottom);
                let idx2 = self.create_out_rec();
                let split_bottom = self.ring_bottom(split);
                self.out_recs[idx2].pts = Some(split_bottom);
                self.out_recs[idx2].bottom_pt = Some(split_bottom);
                self.renumber_ring(idx2);
                self.joins[i].poly2_idx = idx2;

                let ring1 = keep_bottom;
                let ring2 = split_bottom;
                let probe2 = self.out_pts[ring2].pt;
                let probe1 = self.out_pts[ring1].pt;
                if self.point_in_ring(probe2, ring1) {
                    // the split fragment nests inside the original
                    let hole = !self.out_recs[idx1].is_hole;
                    self.out_recs[idx2].is_hole = hole;
                    self.out_recs[idx2].first_left = Some(idx1);
                    if hole == (self.ring_area(idx2) > 0.0) {
                        self.reverse_ring_links(ring2);
                    }
                } else if self.point_in_ring(probe1, ring2) {
                    // the original nests inside the split fragment
                    let hole = self.out_recs[idx1].is_hole;
                    self.out_recs[idx2].is_hole = hole;
                    self.out_recs[idx1].is_hole = !hole;
                    let fl = self.out_recs[idx1].first_left;
                    self.out_recs[idx2].first_left = fl;
                    self.out_recs[idx1].first_left = Some(idx2);
                    if self.out_recs[idx1].is_hole == (self.ring_area(idx1) > 0.0) {
                        self.reverse_ring_links(ring1);
                    }
                } else {
                    let hole = self.out_recs[idx1].is_hole;
                    self.out_recs[idx2].is_hole = hole;
                    let fl = self.out_recs[idx1].first_left;
                    self.out_recs[idx2].first_left = fl;
                }

                // redirect later joins that referenced the split-off points
                for k in (i + 1)..self.joins.len() {
                    let other = self.joins[k];
                    if other.poly1_idx == idx1 && self.point_is_ring_vertex(other.pt1a, split) {
                        self.joins[k].poly1_idx = idx2;
                    }
                    if other.poly2_idx == idx1 && self.point_is_ring_vertex(other.pt2a, split) {
                        self.joins[k].poly2_idx = idx2;
                    }
                }
            } else {
                // two rings were joined; retire the absorbed record
                let idx1 = join.poly1_idx;
                let idx2 = join.poly2_idx;
                self.renumber_ring(idx1);
                self.out_recs[idx2].pts = None;
                self.out_recs[idx2].bottom_pt = None;
                self.out_recs[idx2].append_link = Some(idx1);
                if self.out_recs[idx1].is_hole && !self.out_recs[idx2].is_hole {
                    self.out_recs[idx1].is_hole = false;
                }
                for k in (i + 1)..self.joins.len() {
                    if self.joins[k].poly1_idx == idx2 {
                        self.joins[k].poly1_idx = idx1;
                    }
                    if self.joins[k].poly2_idx == idx2 {
                        self.joins[k].poly2_idx = idx1;
                    }
                }
                self.joins[i].poly2_idx = idx1;
            }

            // clean up redundant vertices introduced by the splice
            let idx1 = self.joins[i].poly1_idx;
            let idx2 = self.joins[i].poly2_idx;
            // re-anchor before fixup: the splice may have stranded anchors
            if let Some(pts) = self.out_recs[idx1].pts {
                let bottom = self.ring_bottom(pts);
                self.out_recs[idx1].bottom_pt = Some(bottom);
            }
            self.fixup_out_polygon(idx1);
            if idx2 != idx1 {
                if let Some(pts) = self.out_recs[idx2].pts {
                    let bottom = self.ring_bottom(pts);
                    self.out_recs[idx2].bottom_pt = Some(bottom);
                }
                self.fixup_out_polygon(idx2);
            }
        }
    }

    /// Walks append links to the surviving record of a chain of splices.
    pub(crate) fn find_append_link_end(&self, mut idx: usize) -> usize {
        while let Some(next) = self.out_recs[idx].append_link {
            idx = next;
        }
        idx
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
    fn overlap_of_horizontal_segments() {
        let overlap = get_overlap_segment(p(0, 0), p(10, 0), p(5, 0), p(20, 0)).unwrap();
        assert_eq!(overlap, (p(5, 0), p(10, 0)));
        assert!(get_overlap_segment(p(0, 0), p(4, 0), p(5, 0), p(20, 0)).is_none());
    }

    #[test]
    fn overlap_of_vertical_segments() {
        let overlap = get_overlap_segment(p(0, 0), p(0, 10), p(0, 5), p(0, 30)).unwrap();
        assert_eq!(overlap, (p(0, 10), p(0, 5)));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        assert!(get_overlap_segment(p(0, 0), p(5, 0), p(5, 0), p(9, 0)).is_none());
    }
}
