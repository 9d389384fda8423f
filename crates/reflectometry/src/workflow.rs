//! Provider registration

// standard library
use std::any::Any;

// external crates
use log::debug;

// nrefl modules
use nrefl_workflow::Pipeline;

// internal modules
use crate::conversions::add_masks;
use crate::corrections::{calibrate_reference, compute_reference_intensity, footprint_correction};
use crate::normalize::reflectivity_over_q;
use crate::supermirror::calibration_factor;
use crate::types::{for_each_role, Role, RoleVisitor};

/// Label of the footprint correction providers
pub const FOOTPRINT_CORRECTION: &str = "footprint correction";

/// Label of the supermirror calibration provider
pub const SUPERMIRROR_CALIBRATION: &str = "supermirror calibration";

struct RoleProviders<'a>(&'a mut Pipeline);

impl RoleVisitor for RoleProviders<'_> {
    fn visit<R: Role>(&mut self) {
        self.0.add_provider(add_masks::<R>);
        self.0
            .add_provider(footprint_correction::<R>)
            .label(FOOTPRINT_CORRECTION);
    }
}

/// Register every provider of this crate, the role generic ones for both roles
///
/// Parameters such as bin edges, limits and beam sizes still have to be
/// inserted before anything can be computed.
pub fn register_providers(pipeline: &mut Pipeline) {
    for_each_role(&mut RoleProviders(pipeline));
    pipeline.add_provider(compute_reference_intensity);
    pipeline
        .add_provider(calibration_factor)
        .label(SUPERMIRROR_CALIBRATION);
    pipeline.add_provider(calibrate_reference);
    pipeline.add_provider(reflectivity_over_q);
    debug!("Registered reflectometry providers");
}

/// Corrections applied when computing `T`, in the order they are applied
///
/// A correction applied to both runs is listed once.
pub fn applied_corrections<T: Any>(pipeline: &Pipeline) -> nrefl_workflow::Result<Vec<String>> {
    let mut corrections = Vec::new();
    for label in pipeline.labels::<T>()? {
        if !corrections.contains(&label) {
            corrections.push(label);
        }
    }
    Ok(corrections)
}
