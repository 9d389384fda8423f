//! The assembled Amor workflow

// external crates
use log::info;

// nrefl modules
use nrefl_reflectometry::{for_each_role, register_providers, Role, RoleVisitor};
use nrefl_workflow::Pipeline;

// internal modules
use crate::error::Result;
use crate::geometry::incident_beam;
use crate::parameters::AmorParameters;
use crate::resolution::{angular_resolution, sample_size_resolution, sigma_q, wavelength_resolution};

struct AmorProviders<'a>(&'a mut Pipeline);

impl RoleVisitor for AmorProviders<'_> {
    fn visit<R: Role>(&mut self) {
        self.0.add_provider(incident_beam::<R>);
    }
}

/// Register the Amor providers on top of the common reflectometry ones
///
/// The Q resolution of the sample additionally needs a `DetectorPosition`
/// for every sample pixel.
pub fn register_amor_providers(pipeline: &mut Pipeline) {
    register_providers(pipeline);
    for_each_role(&mut AmorProviders(pipeline));
    pipeline.add_provider(wavelength_resolution);
    pipeline.add_provider(sample_size_resolution);
    pipeline.add_provider(angular_resolution);
    pipeline.add_provider(sigma_q);
}

/// Pipeline with every provider registered and the parameters inserted
///
/// Only the `EventData` of the sample and reference runs is missing.
///
/// ```rust
/// # use nrefl_amor::*;
/// # use nrefl_reflectometry::{IncidentBeam, Sample};
/// # use nrefl_units::Unit;
/// let pipeline = amor_workflow(&AmorParameters::default()).unwrap();
///
/// let beam = pipeline.compute::<IncidentBeam<Sample>>().unwrap();
/// assert_eq!(beam.unit, Unit::Metre);
/// assert_eq!(beam.value.z, 15.0);
/// ```
pub fn amor_workflow(parameters: &AmorParameters) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new();
    register_amor_providers(&mut pipeline);
    parameters.apply(&mut pipeline)?;
    info!("Assembled the Amor workflow");
    Ok(pipeline)
}
