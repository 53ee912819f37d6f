pub mod polygon;
pub mod predicates;

/// Integer point used for all clipping coordinates.
pub type IntPoint = nalgebra::Point2<i64>;

/// Coordinate magnitude above which slope and cross-product tests switch to
/// 128-bit arithmetic (products of coordinate deltas no longer fit in 64 bits).
pub const LO_RANGE: i64 = 0x3FFF_FFFF;

/// Absolute coordinate magnitude limit accepted by the engine.
pub const HI_RANGE: i64 = 0x3FFF_FFFF_FFFF_FFFF;
