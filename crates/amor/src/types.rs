//! Amor specific quantities

// nrefl modules
use nrefl_reflectometry::role_scoped;
use nrefl_units::{BinEdges, Quantity, VectorQuantity};

role_scoped!(
    /// Position of the first chopper in the lab frame
    Chopper1Position(VectorQuantity)
);

role_scoped!(
    /// Position of the second chopper in the lab frame
    Chopper2Position(VectorQuantity)
);

role_scoped!(
    /// Lab frame position of every detector pixel, in the order of the event data
    DetectorPosition(Vec<VectorQuantity>)
);

role_scoped!(
    /// Full width at half maximum of the detector position resolution
    DetectorSpatialResolution(Quantity)
);

/// Relative wavelength resolution of every sample pixel, as a standard deviation
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthResolution(pub Vec<f64>);

/// Relative resolution from the projected sample size, for every sample pixel
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSizeResolution(pub Vec<f64>);

/// Relative angular resolution of every sample event, grouped by pixel
///
/// Masked pixels and masked events hold `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct AngularResolution(pub Vec<Vec<f64>>);

/// Standard deviation of `Q` at the centre of every Q bin
#[derive(Debug, Clone, PartialEq)]
pub struct QResolution {
    /// Q bin edges, in 1/angstrom
    pub edges: BinEdges,
    /// Largest relative resolution over all unmasked sample events
    pub relative: f64,
    /// Standard deviation of every bin
    pub values: Vec<f64>,
}
