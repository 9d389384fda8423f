//! Result and Error types for nrefl-units

use crate::unit::{Dimension, Unit};

/// Type alias for Result<T, units::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `nrefl-units` crate
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("expected a quantity of dimension {expected}, found unit \"{found}\"")]
    IncompatibleUnits { expected: Dimension, found: Unit },

    #[error("unknown unit \"{0}\"")]
    UnknownUnit(String),

    #[error("invalid bin edges: {0}")]
    InvalidEdges(#[from] nrefl_utils::Error),

    #[error("{name} must be positive and finite, found {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("at least {minimum} bin edges are required, found {found}")]
    TooFewEdges { minimum: usize, found: usize },
}
