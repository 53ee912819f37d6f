//! scanclip — 2D polygon clipping on integer coordinates.
//!
//! Computes boolean combinations (intersection, union, difference,
//! symmetric difference) of two sets of closed polygons with a single
//! plane sweep. Inputs may be concave, self-intersecting and contain
//! holes; each input set is interpreted under its own winding fill rule.
//! Integer coordinates make results deterministic; callers with
//! floating-point data scale by a power of ten and round.
//!
//! ```
//! use scanclip::{ClipType, Clipper, IntPoint, PolyFillType, PolyType};
//!
//! let subject = vec![
//!     IntPoint::new(0, 0),
//!     IntPoint::new(0, 100),
//!     IntPoint::new(100, 100),
//!     IntPoint::new(100, 0),
//! ];
//! let clip = vec![
//!     IntPoint::new(50, 50),
//!     IntPoint::new(50, 150),
//!     IntPoint::new(150, 150),
//!     IntPoint::new(150, 50),
//! ];
//!
//! let mut clipper = Clipper::new();
//! clipper.add_path(&subject, PolyType::Subject, true)?;
//! clipper.add_path(&clip, PolyType::Clip, true)?;
//! let solution = clipper.execute(
//!     ClipType::Intersection,
//!     PolyFillType::NonZero,
//!     PolyFillType::NonZero,
//! )?;
//! assert_eq!(solution.len(), 1);
//! # Ok::<(), scanclip::ClipError>(())
//! ```

pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{ClipError, ExecuteError, InputError, Result};
pub use geometry::{bounds, reverse_path, reverse_paths, IntRect, Path, Paths};
pub use math::polygon::{area, orientation};
pub use math::predicates::{point_in_polygon, PointLocation};
pub use math::IntPoint;
pub use operations::boolean::{ClipType, Clipper, PolyFillType, PolyNode, PolyTree, PolyType};
pub use operations::clean::{clean_polygon, clean_polygons, DEFAULT_CLEAN_DISTANCE};
pub use operations::minkowski::{minkowski_diff, minkowski_sum};
pub use operations::simplify::{simplify_polygon, simplify_polygons};
