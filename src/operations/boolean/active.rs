//! Mechanics of the active edge list (AEL) and the scratch sorted edge list
//! (SEL): ordered insertion, deletion, neighbour swaps and bound promotion.

use crate::error::ExecuteError;

use super::edge::{is_horizontal, EdgeId};
use super::Clipper;

impl Clipper {
    /// Inserts an edge into the AEL at the position dictated by its current
    /// x, breaking ties by inverse slope.
    pub(crate) fn insert_edge_into_ael(&mut self, edge: EdgeId) {
        self.edges[edge].prev_in_ael = None;
        self.edges[edge].next_in_ael = None;
        let Some(first) = self.active_edges else {
            self.active_edges = Some(edge);
            return;
        };
        if self.e2_inserts_before_e1(first, edge) {
            self.edges[edge].next_in_ael = Some(first);
            self.edges[first].prev_in_ael = Some(edge);
            self.active_edges = Some(edge);
            return;
        }
        let mut e = first;
        loop {
            let next = self.edges[e].next_in_ael;
            match next {
                Some(n) if !self.e2_inserts_before_e1(n, edge) => e = n,
                _ => break,
            }
        }
        let next = self.edges[e].next_in_ael;
        self.edges[edge].next_in_ael = next;
        if let Some(n) = next {
            self.edges[n].prev_in_ael = Some(edge);
        }
        self.edges[edge].prev_in_ael = Some(e);
        self.edges[e].next_in_ael = Some(edge);
    }

    fn e2_inserts_before_e1(&self, e1: EdgeId, e2: EdgeId) -> bool {
        if self.edges[e2].curr.x == self.edges[e1].curr.x {
            self.edges[e2].dx > self.edges[e1].dx
        } else {
            self.edges[e2].curr.x < self.edges[e1].curr.x
        }
    }

    /// Prepends an edge to the SEL (order is irrelevant for horizontal
    /// processing, which is what the SEL is used for here).
    pub(crate) fn add_edge_to_sel(&mut self, edge: EdgeId) {
        match self.sorted_edges {
            None => {
                self.sorted_edges = Some(edge);
                self.edges[edge].prev_in_sel = None;
                self.edges[edge].next_in_sel = None;
            }
            Some(first) => {
                self.edges[edge].next_in_sel = Some(first);
                self.edges[edge].prev_in_sel = None;
                self.edges[first].prev_in_sel = Some(edge);
                self.sorted_edges = Some(edge);
            }
        }
    }

    /// Mirrors the AEL into the SEL, preserving order.
    pub(crate) fn copy_ael_to_sel(&mut self) {
        self.sorted_edges = self.active_edges;
        let mut prev: Option<EdgeId> = None;
        let mut e = self.active_edges;
        while let Some(id) = e {
            self.edges[id].prev_in_sel = prev;
            if let Some(p) = prev {
                self.edges[p].next_in_sel = Some(id);
            }
            self.edges[id].next_in_sel = None;
            prev = Some(id);
            e = self.edges[id].next_in_ael;
        }
    }

    pub(crate) fn swap_positions_in_ael(&mut self, edge1: EdgeId, edge2: EdgeId) {
        if self.edges[edge1].next_in_ael.is_none() && self.edges[edge1].prev_in_ael.is_none() {
            return;
        }
        if self.edges[edge2].next_in_ael.is_none() && self.edges[edge2].prev_in_ael.is_none() {
            return;
        }

        if self.edges[edge1].next_in_ael == Some(edge2) {
            let next = self.edges[edge2].next_in_ael;
            if let Some(n) = next {
                self.edges[n].prev_in_ael = Some(edge1);
            }
            let prev = self.edges[edge1].prev_in_ael;
            if let Some(p) = prev {
                self.edges[p].next_in_ael = Some(edge2);
            }
            self.edges[edge2].prev_in_ael = prev;
            self.edges[edge2].next_in_ael = Some(edge1);
            self.edges[edge1].prev_in_ael = Some(edge2);
            self.edges[edge1].next_in_ael = next;
        } else if self.edges[edge2].next_in_ael == Some(edge1) {
            let next = self.edges[edge1].next_in_ael;
            if let Some(n) = next {
                self.edges[n].prev_in_ael = Some(edge2);
            }
            let prev = self.edges[edge2].prev_in_ael;
            if let Some(p) = prev {
                self.edges[p].next_in_ael = Some(edge1);
            }
            self.edges[edge1].prev_in_ael = prev;
            self.edges[edge1].next_in_ael = Some(edge2);
            self.edges[edge2].prev_in_ael = Some(edge1);
            self.edges[edge2].next_in_ael = next;
        } else {
            let next = self.edges[edge1].next_in_ael;
            let prev = self.edges[edge1].prev_in_ael;
            let next2 = self.edges[edge2].next_in_ael;
            let prev2 = self.edges[edge2].prev_in_ael;
            self.edges[edge1].next_in_ael = next2;
            if let Some(n) = next2 {
                self.edges[n].prev_in_ael = Some(edge1);
            }
            self.edges[edge1].prev_in_ael = prev2;
            if let Some(p) = prev2 {
                self.edges[p].next_in_ael = Some(edge1);
            }
            self.edges[edge2].next_in_ael = next;
            if let Some(n) = next {
                self.edges[n].prev_in_ael = Some(edge2);
            }
            self.edges[edge2].prev_in_ael = prev;
            if let Some(p) = prev {
                self.edges[p].next_in_ael = Some(edge2);
            }
        }

        if self.edges[edge1].prev_in_ael.is_none() {
            self.active_edges = Some(edge1);
        } else if self.edges[edge2].prev_in_ael.is_none() {
            self.active_edges = Some(edge2);
        }
    }

    pub(crate) fn swap_positions_in_sel(&mut self, edge1: EdgeId, edge2: EdgeId) {
        if self.edges[edge1].next_in_sel.is_none() && self.edges[edge1].prev_in_sel.is_none() {
            return;
        }
        if self.edges[edge2].next_in_sel.is_none() && self.edges[edge2].prev_in_sel.is_none() {
            return;
        }

        if self.edges[edge1].next_in_sel == Some(edge2) {
            let next = self.edges[edge2].next_in_sel;
            if let Some(n) = next {
                self.edges[n].prev_in_sel = Some(edge1);
            }
            let prev = self.edges[edge1].prev_in_sel;
            if let Some(p) = prev {
                self.edges[p].next_in_sel = Some(edge2);
            }
            self.edges[edge2].prev_in_sel = prev;
            self.edges[edge2].next_in_sel = Some(edge1);
            self.edges[edge1].prev_in_sel = Some(edge2);
            self.edges[edge1].next_in_sel = next;
        } else if self.edges[edge2].next_in_sel == Some(edge1) {
            let next = self.edges[edge1].next_in_sel;
            if let Some(n) = next {
                self.edges[n].prev_in_sel = Some(edge2);
            }
            let prev = self.edges[edge2].prev_in_sel;
            if let Some(p) = prev {
                self.edges[p].next_in_sel = Some(edge1);
            }
            self.edges[edge1].prev_in_sel = prev;
            self.edges[edge1].next_in_sel = Some(edge2);
            self.edges[edge2].prev_in_sel = Some(edge1);
            self.edges[edge2].next_in_sel = next;
        } else {
            let next = self.edges[edge1].next_in_sel;
            let prev = self.edges[edge1].prev_in_sel;
            let next2 = self.edges[edge2].next_in_sel;
            let prev2 = self.edges[edge2].prev_in_sel;
            self.edges[edge1].next_in_sel = next2;
            if let Some(n) = next2 {
                self.edges[n].prev_in_sel = Some(edge1);
            }
            self.edges[edge1].prev_in_sel = prev2;
            if let Some(p) = prev2 {
                self.edges[p].next_in_sel = Some(edge1);
            }
            self.edges[edge2].next_in_sel = next;
            if let Some(n) = next {
                self.edges[n].prev_in_sel = Some(edge2);
            }
            self.edges[edge2].prev_in_sel = prev;
            if let Some(p) = prev {
                self.edges[p].next_in_sel = Some(edge2);
            }
        }

        if self.edges[edge1].prev_in_sel.is_none() {
            self.sorted_edges = Some(edge1);
        } else if self.edges[edge2].prev_in_sel.is_none() {
            self.sorted_edges = Some(edge2);
        }
    }

    pub(crate) fn delete_from_ael(&mut self, e: EdgeId) {
        let prev = self.edges[e].prev_in_ael;
        let next = self.edges[e].next_in_ael;
        if prev.is_none() && next.is_none() && self.active_edges != Some(e) {
            return; // already deleted
        }
        match prev {
            Some(p) => self.edges[p].next_in_ael = next,
            None => self.active_edges = next,
        }
        if let Some(n) = next {
            self.edges[n].prev_in_ael = prev;
        }
        self.edges[e].next_in_ael = None;
        self.edges[e].prev_in_ael = None;
    }

    pub(crate) fn delete_from_sel(&mut self, e: EdgeId) {
        let prev = self.edges[e].prev_in_sel;
        let next = self.edges[e].next_in_sel;
        if prev.is_none() && next.is_none() && self.sorted_edges != Some(e) {
            return; // already deleted
        }
        match prev {
            Some(p) => self.edges[p].next_in_sel = next,
            None => self.sorted_edges = next,
        }
        if let Some(n) = next {
            self.edges[n].prev_in_sel = prev;
        }
        self.edges[e].next_in_sel = None;
        self.edges[e].prev_in_sel = None;
    }

    /// Replaces an edge that reached its top with its bound continuation,
    /// transferring winding state and AEL position. Returns the
    /// continuation's id.
    pub(crate) fn update_edge_into_ael(&mut self, e: EdgeId) -> Result<EdgeId, ExecuteError> {
        let Some(repl) = self.edges[e].next_in_lml else {
            return Err(ExecuteError::GeometricInconsistency(
                "edge promoted past the top of its bound",
            ));
        };
        let prev = self.edges[e].prev_in_ael;
        let next = self.edges[e].next_in_ael;
        let (out_idx, side, wind_delta, wind_cnt, wind_cnt2) = {
            let old = &self.edges[e];
            (old.out_idx, old.side, old.wind_delta, old.wind_cnt, old.wind_cnt2)
        };
        {
            let new = &mut self.edges[repl];
            new.out_idx = out_idx;
            new.side = side;
            new.wind_delta = wind_delta;
            new.wind_cnt = wind_cnt;
            new.wind_cnt2 = wind_cnt2;
            new.prev_in_ael = prev;
            new.next_in_ael = next;
        }
        match prev {
            Some(p) => self.edges[p].next_in_ael = Some(repl),
            None => self.active_edges = Some(repl),
        }
        if let Some(n) = next {
            self.edges[n].prev_in_ael = Some(repl);
        }
        if !is_horizontal(self.edges[repl].dx) {
            let top_y = self.edges[repl].top.y;
            self.insert_scanbeam(top_y);
        }
        Ok(repl)
    }

    /// Next active edge in the given walking direction.
    pub(crate) fn next_in_ael_dir(&self, e: EdgeId, dir: super::Direction) -> Option<EdgeId> {
        match dir {
            super::Direction::LeftToRight => self.edges[e].next_in_ael,
            super::Direction::RightToLeft => self.edges[e].prev_in_ael,
        }
    }

    pub(crate) fn swap_sides(&mut self, edge1: EdgeId, edge2: EdgeId) {
        let side = self.edges[edge1].side;
        self.edges[edge1].side = self.edges[edge2].side;
        self.edges[edge2].side = side;
    }

    pub(crate) fn swap_poly_indexes(&mut self, edge1: EdgeId, edge2: EdgeId) {
        let out_idx = self.edges[edge1].out_idx;
        self.edges[edge1].out_idx = self.edges[edge2].out_idx;
        self.edges[edge2].out_idx = out_idx;
    }
}
