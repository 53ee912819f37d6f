//! Sweep orchestration: the top-to-bottom scanbeam loop, local-minima
//! insertion with winding assignment, top-of-scanbeam promotion and maxima
//! handling, and the post-sweep fixup passes.

use crate::error::ExecuteError;
use crate::math::predicates::slopes_equal4;
use crate::math::IntPoint;

use super::edge::{is_horizontal, EdgeId};
use super::joins::get_overlap_segment;
use super::{ClipType, Clipper, PolyFillType, PolyType, Protects};

impl Clipper {
    /// Runs the whole sweep and the post-sweep fixups, leaving the finished
    /// rings in the output arena for result building.
    pub(crate) fn execute_internal(&mut self) -> Result<(), ExecuteError> {
        self.reset();
        if self.minima.is_empty() {
            return Ok(());
        }

        let Some(mut bot_y) = self.pop_scanbeam() else {
            return Ok(());
        };
        loop {
            self.insert_local_minima_into_ael(bot_y)?;
            self.horz_joins.clear();
            self.process_horizontals()?;
            let Some(top_y) = self.pop_scanbeam() else {
                break;
            };
            self.process_intersections(top_y)?;
            self.process_edges_at_top(top_y)?;
            bot_y = top_y;
        }

        // tidy each ring before the join pass reads it, orient, resolve
        // deferred joins, then tidy again
        for i in 0..self.out_recs.len() {
            if self.out_recs[i].pts.is_some() {
                self.fixup_out_polygon(i);
            }
        }
        for i in 0..self.out_recs.len() {
            let Some(pts) = self.out_recs[i].pts else {
                continue;
            };
            let area = self.ring_area(i);
            if (self.out_recs[i].is_hole != self.reverse_solution) == (area > 0.0) {
                self.reverse_ring_links(pts);
            }
        }
        self.join_common_edges();
        for i in 0..self.out_recs.len() {
            if self.out_recs[i].pts.is_some() {
                self.fixup_out_polygon(i);
            }
        }
        if self.strictly_simple {
            self.do_simple_polygons();
        }
        self.joins.clear();
        self.horz_joins.clear();
        Ok(())
    }

    /// Moves every local minimum at `bot_y` into the AEL, assigns winding
    /// counts, starts output where the new edges contribute, and records
    /// shared-edge joins.
    fn insert_local_minima_into_ael(&mut self, bot_y: i64) -> Result<(), ExecuteError> {
        while self.current_lm < self.minima.len() && self.minima[self.current_lm].y == bot_y {
            let lb = self.minima[self.current_lm].left_bound;
            let rb = self.minima[self.current_lm].right_bound;

            self.insert_edge_into_ael(lb);
            let lb_top_y = self.edges[lb].top.y;
            self.insert_scanbeam(lb_top_y);
            self.insert_edge_into_ael(rb);

            let delta = self.edges[lb].wind_delta;
            self.edges[rb].wind_delta = -delta;
            self.set_winding_count(lb);
            let (wc, wc2) = (self.edges[lb].wind_cnt, self.edges[lb].wind_cnt2);
            self.edges[rb].wind_cnt = wc;
            self.edges[rb].wind_cnt2 = wc2;

            if is_horizontal(self.edges[rb].dx) {
                // only right bounds can carry a horizontal bottom edge
                self.add_edge_to_sel(rb);
                if let Some(next_lml) = self.edges[rb].next_in_lml {
                    let y = self.edges[next_lml].top.y;
                    self.insert_scanbeam(y);
                }
            } else {
                let y = self.edges[rb].top.y;
                self.insert_scanbeam(y);
            }

            if self.is_contributing(lb) {
                let pt = IntPoint::new(self.edges[lb].curr.x, bot_y);
                self.add_local_min_poly(lb, rb, pt);
            }

            // a new contributing bound collinear with its AEL neighbour
            // yields rings sharing an edge; flag them for joining later
            if self.edges[lb].out_idx.is_some() {
                if let Some(prev) = self.edges[lb].prev_in_ael {
                    if self.edges[prev].out_idx.is_some()
                        && self.edges[prev].curr.x == self.edges[lb].bot.x
                        && self.slopes_equal_edges(lb, prev)
                    {
                        self.add_join(lb, prev, None, None);
                    }
                }
            }
            if self.edges[rb].out_idx.is_some() && is_horizontal(self.edges[rb].dx) {
                for i in 0..self.horz_joins.len() {
                    let hj = self.horz_joins[i];
                    let hj_bot = self.edges[hj.edge].bot;
                    let hj_top = self.edges[hj.edge].top;
                    let rb_bot = self.edges[rb].bot;
                    let rb_top = self.edges[rb].top;
                    if get_overlap_segment(hj_bot, hj_top, rb_bot, rb_top).is_some() {
                        self.add_join(hj.edge, rb, Some(hj.saved_idx), None);
                    }
                }
            }

            if self.edges[lb].next_in_ael != Some(rb) {
                if self.edges[rb].out_idx.is_some() {
                    if let Some(prev) = self.edges[rb].prev_in_ael {
                        if self.edges[prev].out_idx.is_some()
                            && self.slopes_equal_edges(prev, rb)
                        {
                            self.add_join(rb, prev, None, None);
                        }
                    }
                }
                let pt = self.edges[lb].curr;
                let mut e = self.edges[lb].next_in_ael;
                while e != Some(rb) {
                    let Some(edge) = e else {
                        return Err(ExecuteError::GeometricInconsistency(
                            "right bound missing from the active edge list",
                        ));
                    };
                    // winding counts assume the right bound is right of the
                    // in-between edge above the intersection
                    self.intersect_edges(rb, edge, pt, Protects::Neither);
                    e = self.edges[edge].next_in_ael;
                }
            }
            self.current_lm += 1;
        }
        Ok(())
    }

    /// Derives the winding counts of a freshly inserted edge from its AEL
    /// neighbourhood under the edge's own fill rule.
    fn set_winding_count(&mut self, edge: EdgeId) {
        let poly_type = self.edges[edge].poly_type;
        // nearest preceding edge of the same poly type
        let mut prev = self.edges[edge].prev_in_ael;
        while let Some(id) = prev {
            if self.edges[id].poly_type == poly_type {
                break;
            }
            prev = self.edges[id].prev_in_ael;
        }

        let mut scan;
        match prev {
            None => {
                let delta = self.edges[edge].wind_delta;
                self.edges[edge].wind_cnt = delta;
                self.edges[edge].wind_cnt2 = 0;
                scan = self.active_edges; // ready to accumulate wind_cnt2
            }
            Some(p) => {
                if self.is_even_odd_fill_type(edge) {
                    self.edges[edge].wind_cnt = 1;
                    let wc2 = self.edges[p].wind_cnt2;
                    self.edges[edge].wind_cnt2 = wc2;
                } else {
                    let prev_wc = self.edges[p].wind_cnt;
                    let prev_delta = self.edges[p].wind_delta;
                    let delta = self.edges[edge].wind_delta;
                    let wc = if prev_wc * prev_delta < 0 {
                        // the previous edge winds down towards zero
                        if prev_wc.abs() > 1 {
                            if prev_delta * delta < 0 {
                                prev_wc
                            } else {
                                prev_wc + delta
                            }
                        } else {
                            prev_wc + prev_delta + delta
                        }
                    } else if prev_wc.abs() > 1 && prev_delta * delta < 0 {
                        prev_wc
                    } else if prev_wc + delta == 0 {
                        prev_wc
                    } else {
                        prev_wc + delta
                    };
                    self.edges[edge].wind_cnt = wc;
                    let wc2 = self.edges[p].wind_cnt2;
                    self.edges[edge].wind_cnt2 = wc2;
                }
                scan = self.edges[p].next_in_ael;
            }
        }

        // accumulate the opposite poly type's winding up to this edge
        if self.is_even_odd_alt_fill_type(edge) {
            while let Some(id) = scan {
                if id == edge {
                    break;
                }
                let flipped = i32::from(self.edges[edge].wind_cnt2 == 0);
                if self.edges[id].poly_type != poly_type {
                    self.edges[edge].wind_cnt2 = flipped;
                }
                scan = self.edges[id].next_in_ael;
            }
        } else {
            while let Some(id) = scan {
                if id == edge {
                    break;
                }
                if self.edges[id].poly_type != poly_type {
                    let delta = self.edges[id].wind_delta;
                    self.edges[edge].wind_cnt2 += delta;
                }
                scan = self.edges[id].next_in_ael;
            }
        }
    }

    /// Does this edge separate filled from unfilled space for the current
    /// operation and fill rules?
    fn is_contributing(&self, edge: EdgeId) -> bool {
        let (pft, pft2) = self.fill_types_of(edge);
        let e = &self.edges[edge];
        match pft {
            PolyFillType::EvenOdd => {}
            PolyFillType::NonZero => {
                if e.wind_cnt.abs() != 1 {
                    return false;
                }
            }
            PolyFillType::Positive => {
                if e.wind_cnt != 1 {
                    return false;
                }
            }
            PolyFillType::Negative => {
                if e.wind_cnt != -1 {
                    return false;
                }
            }
        }

        let inside_other = match pft2 {
            PolyFillType::EvenOdd | PolyFillType::NonZero => e.wind_cnt2 != 0,
            PolyFillType::Positive => e.wind_cnt2 > 0,
            PolyFillType::Negative => e.wind_cnt2 < 0,
        };
        match self.clip_type {
            Some(ClipType::Intersection) => inside_other,
            Some(ClipType::Union) => !inside_other,
            Some(ClipType::Difference) => {
                if e.poly_type == PolyType::Subject {
                    !inside_other
                } else {
                    inside_other
                }
            }
            Some(ClipType::SymmetricDifference) | None => true,
        }
    }

    /// Handles every edge whose top lies at `top_y`: closes maxima, promotes
    /// intermediate vertices into their continuations, advances the rest,
    /// and runs the horizontal micro-sweep at the new level.
    fn process_edges_at_top(&mut self, top_y: i64) -> Result<(), ExecuteError> {
        let mut e_opt = self.active_edges;
        while let Some(e) = e_opt {
            // maxima first, treating them as bent horizontals; maxima with
            // horizontal partners wait for the horizontal pass
            if self.is_maxima(e, top_y) && !is_horizontal(self.edges[self.maxima_pair(e)].dx) {
                let e_prior = self.edges[e].prev_in_ael;
                self.do_maxima(e, top_y)?;
                e_opt = match e_prior {
                    None => self.active_edges,
                    Some(p) => self.edges[p].next_in_ael,
                };
                continue;
            }

            let promote_horizontal = self.is_intermediate(e, top_y)
                && self.edges[e].next_in_lml.is_some_and(|n| is_horizontal(self.edges[n].dx));
            if promote_horizontal {
                if let Some(out_idx) = self.edges[e].out_idx {
                    let top = self.edges[e].top;
                    self.add_out_pt(e, top);
                    if let Some(next_lml) = self.edges[e].next_in_lml {
                        for i in 0..self.horz_joins.len() {
                            let hj = self.horz_joins[i];
                            let hj_bot = self.edges[hj.edge].bot;
                            let hj_top = self.edges[hj.edge].top;
                            let nl_bot = self.edges[next_lml].bot;
                            let nl_top = self.edges[next_lml].top;
                            if get_overlap_segment(hj_bot, hj_top, nl_bot, nl_top).is_some() {
                                self.add_join(hj.edge, next_lml, Some(hj.saved_idx), Some(out_idx));
                            }
                        }
                        self.add_horz_join(next_lml, out_idx);
                    }
                }
                let promoted = self.update_edge_into_ael(e)?;
                self.add_edge_to_sel(promoted);
                e_opt = self.edges[promoted].next_in_ael;
            } else {
                // just advance to the top of the scanbeam
                let x = self.top_x(e, top_y);
                self.edges[e].curr = IntPoint::new(x, top_y);
                e_opt = self.edges[e].next_in_ael;
            }
        }

        self.process_horizontals()?;

        // promote intermediate vertices into their bound continuations
        let mut e_opt = self.active_edges;
        while let Some(e) = e_opt {
            let mut cur = e;
            if self.is_intermediate(e, top_y) {
                if self.edges[e].out_idx.is_some() {
                    let top = self.edges[e].top;
                    self.add_out_pt(e, top);
                }
                cur = self.update_edge_into_ael(e)?;

                // edges emerging collinear with a neighbour produce rings
                // sharing an edge; flag them for joining
                if self.edges[cur].out_idx.is_some() {
                    let bot = self.edges[cur].bot;
                    let top = self.edges[cur].top;
                    let prev = self.edges[cur].prev_in_ael;
                    let next = self.edges[cur].next_in_ael;
                    if let Some(p) = prev.filter(|&p| {
                        self.edges[p].out_idx.is_some()
                            && self.edges[p].curr.x == bot.x
                            && self.edges[p].curr.y == bot.y
                            && slopes_equal4(
                                bot,
                                top,
                                bot,
                                self.edges[p].top,
                                self.use_full_range,
                            )
                    }) {
                        self.add_out_pt(p, bot);
                        self.add_join(cur, p, None, None);
                    } else if let Some(n) = next.filter(|&n| {
                        self.edges[n].out_idx.is_some()
                            && self.edges[n].curr.y > self.edges[n].top.y
                            && self.edges[n].curr.y < self.edges[n].bot.y
                            && self.edges[n].curr.x == bot.x
                            && self.edges[n].curr.y == bot.y
                            && slopes_equal4(
                                bot,
                                top,
                                bot,
                                self.edges[n].top,
                                self.use_full_range,
                            )
                    }) {
                        self.add_out_pt(n, bot);
                        self.add_join(cur, n, None, None);
                    }
                }
            }
            e_opt = self.edges[cur].next_in_ael;
        }
        Ok(())
    }

    /// Closes a local maximum: intersects the maxima pair with everything
    /// between them, then retires both edges.
    fn do_maxima(&mut self, e: EdgeId, top_y: i64) -> Result<(), ExecuteError> {
        let max_pair = self.maxima_pair(e);
        let x = self.edges[e].top.x;
        let mut next = self.edges[e].next_in_ael;
        while next != Some(max_pair) {
            let Some(n) = next else {
                return Err(ExecuteError::GeometricInconsistency(
                    "maxima pair missing from the active edge list",
                ));
            };
            self.intersect_edges(e, n, IntPoint::new(x, top_y), Protects::Both);
            next = self.edges[n].next_in_ael;
        }
        let e_out = self.edges[e].out_idx;
        let pair_out = self.edges[max_pair].out_idx;
        match (e_out, pair_out) {
            (None, None) => {
                self.delete_from_ael(e);
                self.delete_from_ael(max_pair);
                Ok(())
            }
            (Some(_), Some(_)) => {
                self.intersect_edges(e, max_pair, IntPoint::new(x, top_y), Protects::Neither);
                Ok(())
            }
            _ => Err(ExecuteError::GeometricInconsistency(
                "unbalanced output state at a local maximum",
            )),
        }
    }
}
