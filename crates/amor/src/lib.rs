//! Amor reflectometer geometry, parameters and workflow
//!
#![doc = include_str!("../readme.md")]

mod error;
mod geometry;
mod parameters;
mod resolution;
mod types;
mod workflow;

#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::geometry::incident_beam;

#[doc(inline)]
pub use crate::parameters::{AmorParameters, Binning};

#[doc(inline)]
pub use crate::resolution::{
    angular_resolution, sample_size_resolution, sigma_q, wavelength_resolution,
};

#[doc(inline)]
pub use crate::types::{
    AngularResolution, Chopper1Position, Chopper2Position, DetectorPosition,
    DetectorSpatialResolution, QResolution, SampleSizeResolution, WavelengthResolution,
};

#[doc(inline)]
pub use crate::workflow::{amor_workflow, register_amor_providers};
