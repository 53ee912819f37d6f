use thiserror::Error;

/// Top-level error type for the scanclip engine.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

/// Errors raised while registering input paths.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("coordinate outside the supported range (|x| and |y| must not exceed 0x3FFFFFFFFFFFFFFF)")]
    RangeExceeded,

    #[error("degenerate path: fewer than three distinct vertices remain after cleanup")]
    DegeneratePath,

    #[error("open paths are not supported")]
    OpenPathsUnsupported,
}

/// Errors raised during a clipping sweep.
///
/// Any of these aborts the sweep; the engine discards its transient state and
/// remains usable (registered paths are kept until [`crate::Clipper::clear`]).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteError {
    #[error("geometric inconsistency: {0}")]
    GeometricInconsistency(&'static str),
}

/// Convenience type alias for results using [`ClipError`].
pub type Result<T> = std::result::Result<T, ClipError>;
