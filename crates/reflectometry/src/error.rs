//! Result and Error types for nrefl-reflectometry

/// Type alias for Result<T, reflectometry::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `nrefl-reflectometry` crate
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("event data operation failed")]
    Events(#[from] nrefl_events::Error),

    #[error("unit check failed")]
    Units(#[from] nrefl_units::Error),

    #[error("theta = {theta} rad in pixel (z_index {z_index}, y_index {y_index}) is outside (0, pi/2]")]
    ThetaOutOfRange {
        z_index: u32,
        y_index: u32,
        theta: f64,
    },

    #[error("footprint scale {scale} at theta = {theta} rad in pixel (z_index {z_index}, y_index {y_index}) is outside (0, 1]")]
    DegenerateFootprint {
        z_index: u32,
        y_index: u32,
        theta: f64,
        scale: f64,
    },

    #[error("index limits {lower}..={upper} for {name} are reversed")]
    InvalidLimits {
        name: &'static str,
        lower: u32,
        upper: u32,
    },

    #[error("Q tolerance must be a positive number, found {0}")]
    InvalidTolerance(f64),

    #[error("supermirror correction and reference intensity differ in {coord}")]
    MisalignedCorrection { coord: &'static str },

    #[error("no unmasked sample events to estimate Q from")]
    NoSampleQ,
}
