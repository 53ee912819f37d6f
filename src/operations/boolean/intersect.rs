//! Scanbeam intersection engine: finds every pairwise crossing of active
//! edges via a bubble sort over projected x positions, orders the crossings
//! bottom-to-top, and applies each one to the winding machinery.

use crate::error::ExecuteError;
use crate::math::IntPoint;

use super::edge::{is_horizontal, round_to_i64, EdgeId};
use super::{ClipType, Clipper, IntersectNode, PolyFillType, PolyType, Protects};

impl Clipper {
    pub(crate) fn process_intersections(&mut self, top_y: i64) -> Result<(), ExecuteError> {
        if self.active_edges.is_none() {
            return Ok(());
        }
        self.build_intersect_list(top_y);
        if self.intersect_nodes.is_empty() {
            return Ok(());
        }
        if self.fixup_intersections() {
            self.process_intersect_list();
            Ok(())
        } else {
            self.sorted_edges = None;
            self.intersect_nodes.clear();
            Err(ExecuteError::GeometricInconsistency(
                "intersection ordering could not be stabilised",
            ))
        }
    }

    /// Bubble-sorts the active edges by their x at the top of the scanbeam;
    /// every inversion encountered is a crossing within the beam.
    fn build_intersect_list(&mut self, top_y: i64) {
        let Some(first) = self.active_edges else {
            return;
        };

        // mirror the AEL into the SEL and project each edge to top_y
        self.sorted_edges = Some(first);
        let mut prev: Option<EdgeId> = None;
        let mut e = Some(first);
        while let Some(id) = e {
            self.edges[id].prev_in_sel = prev;
            if let Some(p) = prev {
                self.edges[p].next_in_sel = Some(id);
            }
            self.edges[id].next_in_sel = None;
            self.edges[id].sort_x = self.top_x(id, top_y);
            prev = Some(id);
            e = self.edges[id].next_in_ael;
        }

        let mut modified = true;
        while modified && self.sorted_edges.is_some() {
            modified = false;
            let Some(mut e) = self.sorted_edges else {
                break;
            };
            while let Some(next) = self.edges[e].next_in_sel {
                if self.edges[e].sort_x > self.edges[next].sort_x {
                    if let Some(pt) = self.intersect_point(e, next) {
                        self.add_intersect_node(e, next, pt);
                        self.swap_positions_in_sel(e, next);
                        modified = true;
                    } else {
                        e = next;
                    }
                } else {
                    e = next;
                }
            }
            // the largest element is in place; trim it off the scratch list
            match self.edges[e].prev_in_sel {
                Some(p) => self.edges[p].next_in_sel = None,
                None => break,
            }
        }
        self.sorted_edges = None;
    }

    /// Computes the crossing point of two non-parallel edges, rounding to
    /// integer coordinates. Returns `None` when the rounded point would fall
    /// outside the current scanbeam in a way that cannot be applied.
    fn intersect_point(&self, edge1: EdgeId, edge2: EdgeId) -> Option<IntPoint> {
        if self.slopes_equal_edges(edge1, edge2) {
            return None;
        }
        let e1 = &self.edges[edge1];
        let e2 = &self.edges[edge2];
        let x;
        let y;
        if e1.dx == 0.0 {
            x = e1.bot.x;
            if is_horizontal(e2.dx) {
                y = e2.bot.y;
            } else {
                let b2 = e2.bot.y as f64 - e2.bot.x as f64 / e2.dx;
                y = round_to_i64(x as f64 / e2.dx + b2);
            }
        } else if e2.dx == 0.0 {
            x = e2.bot.x;
            if is_horizontal(e1.dx) {
                y = e1.bot.y;
            } else {
                let b1 = e1.bot.y as f64 - e1.bot.x as f64 / e1.dx;
                y = round_to_i64(x as f64 / e1.dx + b1);
            }
        } else {
            let b1 = e1.bot.x as f64 - e1.bot.y as f64 * e1.dx;
            let b2 = e2.bot.x as f64 - e2.bot.y as f64 * e2.dx;
            let q = (b2 - b1) / (e1.dx - e2.dx);
            y = round_to_i64(q);
            x = round_to_i64(e1.dx * q + b1);
        }

        // rounding can land exactly on an edge top; accept only orderings
        // the sweep can still honour
        let ok = (y == e1.top.y && y >= e2.top.y && e1.sort_x > e2.sort_x)
            || (y == e2.top.y && y >= e1.top.y && e1.sort_x > e2.sort_x)
            || (y > e1.top.y && y > e2.top.y);
        ok.then_some(IntPoint::new(x, y))
    }

    /// Inserts a crossing into the pending list, keeping it ordered
    /// bottom-to-top with the sweep's tie-break rules.
    fn add_intersect_node(&mut self, e1: EdgeId, e2: EdgeId, pt: IntPoint) {
        let node = IntersectNode {
            edge1: e1,
            edge2: e2,
            pt,
        };
        if self.intersect_nodes.is_empty() {
            self.intersect_nodes.push(node);
            return;
        }
        if self.process1_before2(&node, &self.intersect_nodes[0]) {
            self.intersect_nodes.insert(0, node);
            return;
        }
        let mut i = 1;
        while i < self.intersect_nodes.len()
            && self.process1_before2(&self.intersect_nodes[i], &node)
        {
            i += 1;
        }
        self.intersect_nodes.insert(i, node);
    }

    fn process1_before2(&self, node1: &IntersectNode, node2: &IntersectNode) -> bool {
        if node1.pt.y == node2.pt.y {
            if node1.edge1 == node2.edge1 || node1.edge2 == node2.edge1 {
                let result = node2.pt.x > node1.pt.x;
                if self.edges[node2.edge1].dx > 0.0 {
                    !result
                } else {
                    result
                }
            } else if node1.edge1 == node2.edge2 || node1.edge2 == node2.edge2 {
                let result = node2.pt.x > node1.pt.x;
                if self.edges[node2.edge2].dx > 0.0 {
                    !result
                } else {
                    result
                }
            } else {
                node2.pt.x > node1.pt.x
            }
        } else {
            node1.pt.y > node2.pt.y
        }
    }

    /// Verifies that consecutive crossings always involve SEL neighbours,
    /// reordering the list where it can. Returns false when no consistent
    /// order exists (the caller aborts the sweep).
    fn fixup_intersections(&mut self) -> bool {
        let n = self.intersect_nodes.len();
        if n < 2 {
            return true;
        }
        self.copy_ael_to_sel();
        for i in 0..n - 1 {
            let e1 = self.intersect_nodes[i].edge1;
            let e2 = self.intersect_nodes[i].edge2;
            if self.edges[e1].prev_in_sel != Some(e2) && self.edges[e1].next_in_sel != Some(e2) {
                // out of order: look for a later crossing that is applicable
                let mut j = i + 1;
                loop {
                    if j >= n {
                        return false;
                    }
                    let cand = self.intersect_nodes[j];
                    if self.edges[cand.edge1].next_in_sel == Some(cand.edge2)
                        || self.edges[cand.edge1].prev_in_sel == Some(cand.edge2)
                    {
                        break;
                    }
                    j += 1;
                }
                self.intersect_nodes.swap(i, j);
            }
            let node = self.intersect_nodes[i];
            self.swap_positions_in_sel(node.edge1, node.edge2);
        }
        self.sorted_edges = None;
        let last = self.intersect_nodes[n - 1];
        self.edges[last.edge1].prev_in_sel == Some(last.edge2)
            || self.edges[last.edge1].next_in_sel == Some(last.edge2)
    }

    fn process_intersect_list(&mut self) {
        let nodes = std::mem::take(&mut self.intersect_nodes);
        for node in nodes {
            self.intersect_edges(node.edge1, node.edge2, node.pt, Protects::Both);
            self.swap_positions_in_ael(node.edge1, node.edge2);
        }
    }

    /// Applies one crossing: updates winding counts of both edges,
    /// re-evaluates their contribution, and emits/splices output vertices
    /// accordingly. `e1` must be left of `e2` below the intersection point.
    /// Unprotected edges terminating at `pt` are removed from the AEL.
    pub(crate) fn intersect_edges(&mut self, e1: EdgeId, e2: EdgeId, pt: IntPoint, protects: Protects) {
        let e1_stops = !protects.left()
            && self.edges[e1].next_in_lml.is_none()
            && self.edges[e1].top.x == pt.x
            && self.edges[e1].top.y == pt.y;
        let e2_stops = !protects.right()
            && self.edges[e2].next_in_lml.is_none()
            && self.edges[e2].top.x == pt.x
            && self.edges[e2].top.y == pt.y;
        let e1_contributing = self.edges[e1].out_idx.is_some();
        let e2_contributing = self.edges[e2].out_idx.is_some();

        // update winding counts; e1 will be right of e2 above the crossing
        if self.edges[e1].poly_type == self.edges[e2].poly_type {
            if self.is_even_odd_fill_type(e1) {
                let old = self.edges[e1].wind_cnt;
                self.edges[e1].wind_cnt = self.edges[e2].wind_cnt;
                self.edges[e2].wind_cnt = old;
            } else {
                let d2 = self.edges[e2].wind_delta;
                if self.edges[e1].wind_cnt + d2 == 0 {
                    self.edges[e1].wind_cnt = -self.edges[e1].wind_cnt;
                } else {
                    self.edges[e1].wind_cnt += d2;
                }
                let d1 = self.edges[e1].wind_delta;
                if self.edges[e2].wind_cnt - d1 == 0 {
                    self.edges[e2].wind_cnt = -self.edges[e2].wind_cnt;
                } else {
                    self.edges[e2].wind_cnt -= d1;
                }
            }
        } else {
            if !self.is_even_odd_fill_type(e2) {
                let d2 = self.edges[e2].wind_delta;
                self.edges[e1].wind_cnt2 += d2;
            } else {
                self.edges[e1].wind_cnt2 = i32::from(self.edges[e1].wind_cnt2 == 0);
            }
            if !self.is_even_odd_fill_type(e1) {
                let d1 = self.edges[e1].wind_delta;
                self.edges[e2].wind_cnt2 -= d1;
            } else {
                self.edges[e2].wind_cnt2 = i32::from(self.edges[e2].wind_cnt2 == 0);
            }
        }

        let (e1_pft, e1_pft2) = self.fill_types_of(e1);
        let (e2_pft, e2_pft2) = self.fill_types_of(e2);
        let e1_wc = directed_wind(self.edges[e1].wind_cnt, e1_pft);
        let e2_wc = directed_wind(self.edges[e2].wind_cnt, e2_pft);

        let clip_type = self.clip_type.unwrap_or(ClipType::Union);
        let same_poly_type = self.edges[e1].poly_type == self.edges[e2].poly_type;

        if e1_contributing && e2_contributing {
            if e1_stops
                || e2_stops
                || (e1_wc != 0 && e1_wc != 1)
                || (e2_wc != 0 && e2_wc != 1)
                || (!same_poly_type && clip_type != ClipType::SymmetricDifference)
            {
                self.add_local_max_poly(e1, e2, pt);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e1_contributing {
            // under Intersection a crossing with a clip edge only counts
            // where the other input set actually covers it
            let e2_covered = clip_type != ClipType::Intersection
                || self.edges[e2].poly_type == PolyType::Subject
                || self.edges[e2].wind_cnt2 != 0;
            if e2_covered && (e2_wc == 0 || e2_wc == 1) {
                self.add_out_pt(e1, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e2_contributing {
            let e1_covered = clip_type != ClipType::Intersection
                || self.edges[e1].poly_type == PolyType::Subject
                || self.edges[e1].wind_cnt2 != 0;
            if e1_covered && (e1_wc == 0 || e1_wc == 1) {
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if (e1_wc == 0 || e1_wc == 1) && (e2_wc == 0 || e2_wc == 1) {
            // neither edge is currently contributing
            let e1_wc2 = directed_wind(self.edges[e1].wind_cnt2, e1_pft2);
            let e2_wc2 = directed_wind(self.edges[e2].wind_cnt2, e2_pft2);
            if !same_poly_type {
                if !e1_stops && !e2_stops {
                    self.add_local_min_poly(e1, e2, pt);
                }
            } else if e1_wc == 1 && e2_wc == 1 {
                let start = match clip_type {
                    ClipType::Intersection => e1_wc2 > 0 && e2_wc2 > 0,
                    ClipType::Union => e1_wc2 <= 0 && e2_wc2 <= 0,
                    ClipType::Difference => {
                        let poly_type = self.edges[e1].poly_type;
                        (poly_type == PolyType::Clip && e1_wc2 > 0 && e2_wc2 > 0)
                            || (poly_type == PolyType::Subject && e1_wc2 <= 0 && e2_wc2 <= 0)
                    }
                    ClipType::SymmetricDifference => true,
                };
                if start && !e1_stops && !e2_stops {
                    self.add_local_min_poly(e1, e2, pt);
                }
            } else {
                self.swap_sides(e1, e2);
            }
        }

        // a stopping edge that still owns an output ring hands it to the
        // surviving edge
        if e1_stops != e2_stops
            && ((e1_stops && self.edges[e1].out_idx.is_some())
                || (e2_stops && self.edges[e2].out_idx.is_some()))
        {
            self.swap_sides(e1, e2);
            self.swap_poly_indexes(e1, e2);
        }

        if e1_stops {
            self.delete_from_ael(e1);
        }
        if e2_stops {
            self.delete_from_ael(e2);
        }
    }
}

/// The winding count as seen by a fill rule: absolute for the symmetric
/// rules, sign-sensitive for `Positive`/`Negative`.
fn directed_wind(wind_cnt: i32, fill: PolyFillType) -> i32 {
    match fill {
        PolyFillType::Positive => wind_cnt,
        PolyFillType::Negative => -wind_cnt,
        PolyFillType::EvenOdd | PolyFillType::NonZero => wind_cnt.abs(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::edge::{Edge, HORIZONTAL};
    use super::*;
    use crate::geometry::Path;
    use crate::math::polygon::{area, rotate_to_canonical_start};

    fn p(x: i64, y: i64) -> IntPoint {
        IntPoint::new(x, y)
    }

    fn square(x: i64, y: i64, size: i64) -> Path {
        vec![
            p(x, y),
            p(x, y + size),
            p(x + size, y + size),
            p(x + size, y),
        ]
    }

    /// A bare edge for the geometric helpers, outside any sweep.
    fn edge_between(c: &mut Clipper, bot: IntPoint, top: IntPoint) -> EdgeId {
        let id = c.edges.insert_with_key(Edge::placeholder);
        let edge = &mut c.edges[id];
        edge.bot = bot;
        edge.curr = bot;
        edge.top = top;
        edge.dx = if bot.y == top.y {
            HORIZONTAL
        } else {
            (top.x - bot.x) as f64 / (top.y - bot.y) as f64
        };
        id
    }

    #[test]
    fn intersect_point_of_crossing_edges() {
        let mut c = Clipper::new();
        let e1 = edge_between(&mut c, p(0, 10), p(10, 0));
        let e2 = edge_between(&mut c, p(10, 10), p(0, 0));
        assert_eq!(c.intersect_point(e1, e2), Some(p(5, 5)));
    }

    #[test]
    fn intersect_point_rejects_parallel_edges() {
        let mut c = Clipper::new();
        let e1 = edge_between(&mut c, p(10, 10), p(0, 0));
        let e2 = edge_between(&mut c, p(15, 10), p(5, 0));
        assert_eq!(c.intersect_point(e1, e2), None);
    }

    #[test]
    fn crossings_are_ordered_bottom_up() {
        let mut c = Clipper::new();
        let e1 = edge_between(&mut c, p(0, 20), p(10, 0));
        let e2 = edge_between(&mut c, p(10, 20), p(0, 0));
        let lower = IntersectNode {
            edge1: e1,
            edge2: e2,
            pt: p(5, 15),
        };
        let upper = IntersectNode {
            edge1: e1,
            edge2: e2,
            pt: p(5, 5),
        };
        assert!(c.process1_before2(&lower, &upper));
        assert!(!c.process1_before2(&upper, &lower));

        c.add_intersect_node(e1, e2, p(5, 5));
        c.add_intersect_node(e1, e2, p(5, 15));
        c.add_intersect_node(e1, e2, p(5, 10));
        let ys: Vec<i64> = c.intersect_nodes.iter().map(|n| n.pt.y).collect();
        assert_eq!(ys, vec![15, 10, 5]);
    }

    #[test]
    fn same_level_crossings_order_by_x_for_unrelated_edges() {
        let mut c = Clipper::new();
        let e1 = edge_between(&mut c, p(0, 20), p(10, 0));
        let e2 = edge_between(&mut c, p(10, 20), p(0, 0));
        let e3 = edge_between(&mut c, p(20, 20), p(30, 0));
        let e4 = edge_between(&mut c, p(30, 20), p(20, 0));
        let left = IntersectNode {
            edge1: e1,
            edge2: e2,
            pt: p(3, 5),
        };
        let right = IntersectNode {
            edge1: e3,
            edge2: e4,
            pt: p(25, 5),
        };
        assert!(c.process1_before2(&left, &right));
        assert!(!c.process1_before2(&right, &left));
    }

    #[test]
    fn three_polygon_intersection_tracks_clip_coverage() {
        // one subject, two overlapping clips: the result follows the
        // clip set's combined coverage inside the subject
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 30), PolyType::Subject, true).unwrap();
        c.add_path(&square(10, 10, 30), PolyType::Clip, true).unwrap();
        c.add_path(&square(20, -10, 30), PolyType::Clip, true).unwrap();
        let result = c
            .execute(
                ClipType::Intersection,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(area(&result[0]), 500.0);
        assert_eq!(
            rotate_to_canonical_start(&result[0]),
            vec![p(10, 10), p(10, 30), p(30, 30), p(30, 0), p(20, 0), p(20, 10)]
        );
    }

    #[test]
    fn intersection_ignores_an_uncovered_clip() {
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 10), PolyType::Subject, true).unwrap();
        c.add_path(&square(5, -5, 10), PolyType::Clip, true).unwrap();
        c.add_path(&square(30, 30, 5), PolyType::Clip, true).unwrap();
        let result = c
            .execute(
                ClipType::Intersection,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(area(&result[0]), 25.0);
        assert_eq!(
            rotate_to_canonical_start(&result[0]),
            vec![p(5, 0), p(5, 5), p(10, 5), p(10, 0)]
        );
    }
}
