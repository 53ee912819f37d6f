//! Self-union simplification: removes self-intersections from polygons by
//! running them through the clipping engine once.

use crate::error::Result;
use crate::geometry::{Path, Paths};
use crate::operations::boolean::{ClipType, Clipper, PolyFillType, PolyType};

/// Resolves a polygon's self-intersections under the given fill rule,
/// returning the resulting simple rings.
///
/// # Errors
///
/// Propagates engine failures (degenerate input, unstable geometry).
pub fn simplify_polygon(path: &Path, fill_type: PolyFillType) -> Result<Paths> {
    let mut clipper = Clipper::new();
    clipper.strictly_simple = true;
    clipper.add_path(path, PolyType::Subject, true)?;
    clipper.execute(ClipType::Union, fill_type, fill_type)
}

/// [`simplify_polygon`] over a set of polygons, resolved together.
///
/// # Errors
///
/// Propagates engine failures (degenerate input, unstable geometry).
pub fn simplify_polygons(paths: &Paths, fill_type: PolyFillType) -> Result<Paths> {
    let mut clipper = Clipper::new();
    clipper.strictly_simple = true;
    clipper.add_paths(paths, PolyType::Subject, true)?;
    clipper.execute(ClipType::Union, fill_type, fill_type)
}
