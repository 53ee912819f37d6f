pub mod boolean;
pub mod clean;
pub mod minkowski;
pub mod simplify;
