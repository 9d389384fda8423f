//! Result and Error types for nrefl-events

use crate::coord::Coord;

/// Type alias for Result<T, events::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `nrefl-events` crate
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("unit conversion failed")]
    Units(#[from] nrefl_units::Error),

    #[error("required coordinate \"{0}\" is missing from the event data")]
    MissingCoordinate(Coord),

    #[error("inconsistent length of \"{name}\" (expected {expected}, found {found})")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("inconsistent shape of \"{name}\" (expected {expected:?}, found {found:?})")]
    ShapeMismatch {
        name: String,
        expected: (usize, usize),
        found: (usize, usize),
    },
}
