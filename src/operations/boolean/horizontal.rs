//! Horizontal edges break the sweep's y-ordering; each one is handled as a
//! micro-sweep in x at the current level.

use crate::error::ExecuteError;
use crate::math::IntPoint;

use super::edge::{is_horizontal, EdgeId};
use super::{Clipper, Direction, Protects};

impl Clipper {
    /// Drains the SEL, processing each queued horizontal in turn.
    pub(crate) fn process_horizontals(&mut self) -> Result<(), ExecuteError> {
        while let Some(horz) = self.sorted_edges {
            self.delete_from_sel(horz);
            self.process_horizontal(horz)?;
        }
        Ok(())
    }

    /// Walks the AEL across a horizontal edge's x-span, intersecting every
    /// edge in range, then either promotes the horizontal's bound
    /// continuation or retires it at its maxima pair.
    fn process_horizontal(&mut self, horz: EdgeId) -> Result<(), ExecuteError> {
        let (horz_left, horz_right, dir) = {
            let e = &self.edges[horz];
            if e.curr.x < e.top.x {
                (e.curr.x, e.top.x, Direction::LeftToRight)
            } else {
                (e.top.x, e.curr.x, Direction::RightToLeft)
            }
        };
        let e_max_pair = if self.edges[horz].next_in_lml.is_some() {
            None
        } else {
            Some(self.maxima_pair(horz))
        };

        let mut e_opt = self.next_in_ael_dir(horz, dir);
        while let Some(e) = e_opt {
            let e_next = self.next_in_ael_dir(e, dir);
            let ecx = self.edges[e].curr.x;
            if ecx >= horz_left && ecx <= horz_right {
                // still in range of the horizontal
                if ecx == self.edges[horz].top.x {
                    if let Some(next_lml) = self.edges[horz].next_in_lml {
                        if self.slopes_equal_edges(e, next_lml) {
                            // shared-edge output polygons need joining later
                            if self.edges[horz].out_idx.is_some()
                                && self.edges[e].out_idx.is_some()
                            {
                                let saved = self.edges[horz].out_idx;
                                self.add_join(next_lml, e, saved, None);
                            }
                            break; // end of the horizontal line
                        } else if self.edges[e].dx < self.edges[next_lml].dx {
                            // past the end of the intermediate horizontal:
                            // more negative slopes follow more positive
                            // slopes above it
                            break;
                        }
                    }
                }

                if Some(e) == e_max_pair {
                    // a maxima horizontal has reached its end
                    let y = self.edges[horz].curr.y;
                    let pt = IntPoint::new(ecx, y);
                    match dir {
                        Direction::LeftToRight => {
                            self.intersect_edges(horz, e, pt, Protects::Neither);
                        }
                        Direction::RightToLeft => {
                            self.intersect_edges(e, horz, pt, Protects::Neither);
                        }
                    }
                    return Ok(());
                } else if is_horizontal(self.edges[e].dx)
                    && !self.is_minima(e)
                    && self.edges[e].curr.x <= self.edges[e].top.x
                {
                    // an overlapping horizontal still on its way out
                    let y = self.edges[horz].curr.y;
                    let pt = IntPoint::new(ecx, y);
                    let top = self.is_top_horz(ecx);
                    match dir {
                        Direction::LeftToRight => self.intersect_edges(
                            horz,
                            e,
                            pt,
                            if top { Protects::Left } else { Protects::Both },
                        ),
                        Direction::RightToLeft => self.intersect_edges(
                            e,
                            horz,
                            pt,
                            if top { Protects::Right } else { Protects::Both },
                        ),
                    }
                } else {
                    let y = self.edges[horz].curr.y;
                    let pt = IntPoint::new(ecx, y);
                    let top = self.is_top_horz(ecx);
                    match dir {
                        Direction::LeftToRight => self.intersect_edges(
                            horz,
                            e,
                            pt,
                            if top { Protects::Left } else { Protects::Both },
                        ),
                        Direction::RightToLeft => self.intersect_edges(
                            e,
                            horz,
                            pt,
                            if top { Protects::Right } else { Protects::Both },
                        ),
                    }
                }
                self.swap_positions_in_ael(horz, e);
            } else if dir == Direction::LeftToRight
                && ecx > horz_right
                && self.edges[horz].next_in_sel.is_none()
            {
                break;
            } else if dir == Direction::RightToLeft
                && ecx < horz_left
                && self.edges[horz].next_in_sel.is_none()
            {
                break;
            }
            e_opt = e_next;
        }

        if self.edges[horz].next_in_lml.is_some() {
            if self.edges[horz].out_idx.is_some() {
                let top = self.edges[horz].top;
                self.add_out_pt(horz, top);
            }
            self.update_edge_into_ael(horz)?;
            Ok(())
        } else {
            let Some(max_pair) = e_max_pair else {
                return Err(ExecuteError::GeometricInconsistency(
                    "horizontal edge without continuation or maxima pair",
                ));
            };
            if self.edges[horz].out_idx.is_some() {
                let pt = IntPoint::new(self.edges[horz].top.x, self.edges[horz].curr.y);
                self.intersect_edges(horz, max_pair, pt, Protects::Both);
            }
            self.delete_from_ael(max_pair);
            self.delete_from_ael(horz);
            Ok(())
        }
    }

    /// No SEL horizontal spans `x`, so the level above is open there.
    fn is_top_horz(&self, x: i64) -> bool {
        let mut e = self.sorted_edges;
        while let Some(id) = e {
            let curr_x = self.edges[id].curr.x;
            let top_x = self.edges[id].top.x;
            if x >= curr_x.min(top_x) && x <= curr_x.max(top_x) {
                return false;
            }
            e = self.edges[id].next_in_sel;
        }
        true
    }

    pub(crate) fn is_minima(&self, e: EdgeId) -> bool {
        let prev = self.edges[e].prev;
        let next = self.edges[e].next;
        self.edges[prev].next_in_lml != Some(e) && self.edges[next].next_in_lml != Some(e)
    }

    pub(crate) fn is_maxima(&self, e: EdgeId, y: i64) -> bool {
        self.edges[e].top.y == y && self.edges[e].next_in_lml.is_none()
    }

    pub(crate) fn is_intermediate(&self, e: EdgeId, y: i64) -> bool {
        self.edges[e].top.y == y && self.edges[e].next_in_lml.is_some()
    }

    /// The other edge of the local maximum `e` terminates at.
    pub(crate) fn maxima_pair(&self, e: EdgeId) -> EdgeId {
        let next = self.edges[e].next;
        let top = self.edges[e].top;
        if !self.is_maxima(next, top.y) || self.edges[next].top.x != top.x {
            self.edges[e].prev
        } else {
            next
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::{ClipType, PolyFillType, PolyType};
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

    #[test]
    fn square_bounds_put_the_horizontal_on_the_right() {
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 100), PolyType::Subject, true).unwrap();
        assert_eq!(c.minima.len(), 1);
        let lm = c.minima[0];
        assert_eq!(lm.y, 100);
        assert!(!is_horizontal(c.edges[lm.left_bound].dx));
        assert!(is_horizontal(c.edges[lm.right_bound].dx));
    }

    #[test]
    fn bound_classification_helpers() {
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 100), PolyType::Subject, true).unwrap();
        let lm = c.minima[0];

        // the left bound is a single edge ending at the ring's top
        assert!(c.is_maxima(lm.left_bound, 0));
        assert!(is_horizontal(c.edges[c.maxima_pair(lm.left_bound)].dx));

        // the right bound starts at the minimum and continues upward
        assert!(c.is_minima(lm.right_bound));
        let continuation = c.edges[lm.right_bound].next_in_lml.unwrap();
        assert!(c.is_intermediate(continuation, 0));
        assert!(!c.is_maxima(continuation, 0));
    }

    #[test]
    fn stacked_rectangles_merge_across_a_shared_horizontal() {
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 10), PolyType::Subject, true).unwrap();
        c.add_path(&square(0, 10, 10), PolyType::Clip, true).unwrap();
        let result = c
            .execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(area(&result[0]), 200.0);
        assert_eq!(
            rotate_to_canonical_start(&result[0]),
            vec![p(0, 0), p(0, 20), p(10, 20), p(10, 0)]
        );
    }
}
