//! Error types for the codec and the route query adapters.
//!
//! Absent data is never an error here: it travels as `Option::None`.

use thiserror::Error;

/// Structural problems with an encoded path or an unsupported codec argument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("encoded path ends mid-value at byte {position}")]
    Truncated { position: usize },

    #[error("invalid character {found:?} at byte {position}")]
    InvalidCharacter { position: usize, found: char },

    #[error("value starting at byte {position} overflows 64 bits")]
    Overflow { position: usize },

    // Values come in (lat, lon) pairs; an odd count leaves one dangling.
    #[error("encoded path holds an odd number of values ({count})")]
    UnpairedValue { count: usize },

    #[error("unsupported precision {0}, expected 5 or 6")]
    UnsupportedPrecision(u32),

    #[error("point {index} is not a valid lon/lat pair and cannot be encoded")]
    UnencodablePoint { index: usize },
}

/// Points that cannot form a [`Path`](crate::geometry::Path).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("a path needs at least two points, got {0}")]
    TooFewPoints(usize),

    #[error("point {index} is not finite")]
    NonFinite { index: usize },
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("unknown travel mode {mode:?}, must be one of {allowed}")]
    UnknownMode { mode: String, allowed: &'static str },

    #[error("coordinate ({x}, {y}) is not a valid lon/lat pair")]
    InvalidCoordinate { x: f64, y: f64 },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
