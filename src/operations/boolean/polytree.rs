//! Tree-shaped solution output: outer rings own their holes, holes own any
//! islands nested inside them.

use std::collections::BTreeMap;

use crate::geometry::{Path, Paths};

use super::Clipper;

/// One ring of a clipping solution, with the rings nested directly inside
/// it as children.
#[derive(Debug, Clone, Default)]
pub struct PolyNode {
    pub contour: Path,
    pub is_hole: bool,
    pub children: Vec<PolyNode>,
}

impl PolyNode {
    /// Total number of nodes in this subtree, excluding `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        self.children.iter().map(|c| 1 + c.count()).sum()
    }
}

/// A clipping solution with hole nesting made explicit.
#[derive(Debug, Clone, Default)]
pub struct PolyTree {
    pub children: Vec<PolyNode>,
}

impl PolyTree {
    /// Total number of rings in the tree.
    #[must_use]
    pub fn total(&self) -> usize {
        self.children.iter().map(|c| 1 + c.count()).sum()
    }

    /// Flattens the tree back into a plain path set, depth first.
    #[must_use]
    pub fn flatten(&self) -> Paths {
        let mut paths = Vec::with_capacity(self.total());
        fn walk(node: &PolyNode, out: &mut Paths) {
            out.push(node.contour.clone());
            for child in &node.children {
                walk(child, out);
            }
        }
        for child in &self.children {
            walk(child, &mut paths);
        }
        paths
    }
}

impl Clipper {
    /// Builds the nested solution from the finished output records.
    pub(crate) fn build_tree(&mut self) -> PolyTree {
        // repair hole linkage so every hole's parent is a surviving outer
        for i in 0..self.out_recs.len() {
            if self.out_recs[i].pts.is_some() && self.out_recs[i].is_hole {
                self.fix_hole_linkage(i);
            }
        }

        // collect surviving rings with their parent references
        let mut slots: BTreeMap<usize, (Path, Option<usize>, bool)> = BTreeMap::new();
        for (i, rec) in self.out_recs.iter().enumerate() {
            let Some(start) = rec.pts else {
                continue;
            };
            if self.ring_point_count(start) < 3 {
                continue;
            }
            let mut contour = Vec::new();
            let mut op = start;
            loop {
                contour.push(self.out_pts[op].pt);
                op = self.out_pts[op].next;
                if op == start {
                    break;
                }
            }
            slots.insert(i, (contour, rec.first_left, rec.is_hole));
        }

        // group children under their parents; rings whose parent did not
        // survive become roots
        let mut children_of: BTreeMap<Option<usize>, Vec<usize>> = BTreeMap::new();
        for (&idx, &(_, parent, _)) in &slots {
            let parent = parent.filter(|p| slots.contains_key(p) && *p != idx);
            children_of.entry(parent).or_default().push(idx);
        }

        fn assemble(
            idx: usize,
            slots: &BTreeMap<usize, (Path, Option<usize>, bool)>,
            children_of: &BTreeMap<Option<usize>, Vec<usize>>,
        ) -> PolyNode {
            let (contour, _, is_hole) = slots[&idx].clone();
            let children = children_of
                .get(&Some(idx))
                .map(|ids| {
                    ids.iter()
                        .map(|&c| assemble(c, slots, children_of))
                        .collect()
                })
                .unwrap_or_default();
            PolyNode {
                contour,
                is_hole,
                children,
            }
        }

        let roots = children_of.get(&None).cloned().unwrap_or_default();
        PolyTree {
            children: roots
                .into_iter()
                .map(|idx| assemble(idx, &slots, &children_of))
                .collect(),
        }
    }

    /// Re-points a hole's parent reference at the surviving record of any
    /// splice chain, collapsing hole-of-hole links onto the nearest outer.
    fn fix_hole_linkage(&mut self, idx: usize) {
        let tmp0 = match self.out_recs[idx].bottom_pt {
            Some(bp) => {
                let owner = self.out_pts[bp].idx;
                self.out_recs[owner].first_left
            }
            None => self.out_recs[idx].first_left,
        };
        // a self-reference would recurse forever below
        if tmp0 == Some(idx) {
            self.out_recs[idx].first_left = None;
            self.out_recs[idx].append_link = None;
            self.out_recs[idx].is_hole = false;
            return;
        }

        let mut parent = tmp0;
        if let Some(t) = parent {
            let mut t2 = t;
            if self.out_recs[t2].append_link.is_some() {
                t2 = self.find_append_link_end(t2);
            }
            if t2 == idx {
                parent = None;
            } else if self.out_recs[t2].is_hole {
                self.fix_hole_linkage(t2);
                parent = self.out_recs[t2].first_left;
            } else {
                parent = Some(t2);
            }
        }
        self.out_recs[idx].first_left = parent;
        if parent.is_none() {
            self.out_recs[idx].is_hole = false;
        }
        self.out_recs[idx].append_link = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::{ClipType, PolyFillType, PolyType};
    use super::*;
    use crate::math::IntPoint;

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
    fn tree_nests_hole_under_outer() {
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 100), PolyType::Subject, true).unwrap();
        c.add_path(&square(25, 25, 50), PolyType::Clip, true).unwrap();
        let tree = c
            .execute_tree(
                ClipType::Difference,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert_eq!(tree.total(), 2);
        assert_eq!(tree.children.len(), 1);
        let outer = &tree.children[0];
        assert!(!outer.is_hole);
        assert_eq!(outer.children.len(), 1);
        assert!(outer.children[0].is_hole);
        assert_eq!(outer.children[0].contour.len(), 4);
    }

    #[test]
    fn tree_island_inside_hole() {
        // ring with a hole, plus a small island centred in the hole
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 100), PolyType::Subject, true).unwrap();
        let mut hole = square(20, 20, 60);
        hole.reverse();
        c.add_path(&hole, PolyType::Subject, true).unwrap();
        c.add_path(&square(40, 40, 20), PolyType::Subject, true).unwrap();
        let tree = c
            .execute_tree(
                ClipType::Union,
                PolyFillType::EvenOdd,
                PolyFillType::EvenOdd,
            )
            .unwrap();
        assert_eq!(tree.total(), 3);
        let outer = &tree.children[0];
        let hole = &outer.children[0];
        assert!(hole.is_hole);
        assert_eq!(hole.children.len(), 1);
        assert!(!hole.children[0].is_hole);
    }

    #[test]
    fn flatten_round_trips_ring_count() {
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 100), PolyType::Subject, true).unwrap();
        c.add_path(&square(25, 25, 50), PolyType::Clip, true).unwrap();
        let tree = c
            .execute_tree(
                ClipType::Difference,
                PolyFillType::NonZero,
                PolyFillType::NonZero,
            )
            .unwrap();
        assert_eq!(tree.flatten().len(), 2);
    }
}
