//! Corrections and normalisation for neutron reflectometry
//!
#![doc = include_str!("../readme.md")]

mod conversions;
mod corrections;
mod error;
mod normalize;
mod supermirror;
mod tools;
mod types;
mod workflow;

#[doc(inline)]
pub use crate::conversions::{add_masks, WAVELENGTH_MASK, Y_INDEX_MASK, Z_INDEX_MASK};

#[doc(inline)]
pub use crate::corrections::{
    calibrate_reference, compute_reference_intensity, footprint_correction, Q_SPREAD,
    TOO_FEW_EVENTS,
};

#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::normalize::{reflectivity_over_q, NO_REFERENCE};

#[doc(inline)]
pub use crate::supermirror::{calibration_factor, supermirror_reflectivity};

#[doc(inline)]
pub use crate::tools::{beam_on_sample, footprint_scale, fwhm_to_std, fwhm_to_std_factor};

#[doc(inline)]
pub use crate::types::{
    for_each_role, Alpha, BeamSize, CriticalEdge, EventData, FootprintCorrectedData,
    IdealReferenceIntensity, IncidentBeam, MValue, MaskedEventData, QBins, QTolerance,
    Reference, ReferenceIntensity, ReflectivityOverQ, Role, RoleVisitor, Sample, SamplePosition,
    SampleSize, SupermirrorReflectivityCorrection, WavelengthBins, YIndexLimits, ZIndexLimits,
};

#[doc(inline)]
pub use crate::workflow::{
    applied_corrections, register_providers, FOOTPRINT_CORRECTION, SUPERMIRROR_CALIBRATION,
};
