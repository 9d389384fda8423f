//! Result and Error types for nrefl-amor

/// Type alias for Result<T, amor::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `nrefl-amor` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unit check failed")]
    Units(#[from] nrefl_units::Error),

    #[error("failed to read parameter file")]
    FailedToRead(#[from] std::io::Error),

    #[error("failed to parse parameters")]
    FailedSerde(#[from] serde_json::Error),

    #[error("event data operation failed")]
    Events(#[from] nrefl_events::Error),

    #[error("{name} has {found} pixels, expected {expected}")]
    PixelCountMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("no unmasked sample event to estimate the Q resolution from")]
    NoResolution,
}
