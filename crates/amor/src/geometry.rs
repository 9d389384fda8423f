//! Beamline geometry

// external crates
use log::debug;

// nrefl modules
use nrefl_reflectometry::{IncidentBeam, Role, SamplePosition};

// internal modules
use crate::error::Result;
use crate::types::{Chopper1Position, Chopper2Position};

/// Vector from the centre of the chopper pair to the sample
///
/// The result is expressed in the unit of the sample position. All three
/// positions must be lengths.
///
/// ```rust
/// # use nrefl_amor::*;
/// # use nrefl_reflectometry::{SamplePosition, Sample};
/// # use nrefl_units::{Unit, VectorQuantity};
/// let beam = incident_beam::<Sample>(
///     &Chopper1Position::new(VectorQuantity::new(0.0, 0.0, -15.5, Unit::Metre)),
///     &Chopper2Position::new(VectorQuantity::new(0.0, 0.0, -14.5, Unit::Metre)),
///     &SamplePosition::new(VectorQuantity::new(0.0, 0.0, 0.0, Unit::Millimetre)),
/// )
/// .unwrap();
///
/// assert_eq!(beam.unit, Unit::Millimetre);
/// assert!((beam.value.z - 15000.0).abs() < 1e-9);
/// ```
pub fn incident_beam<R: Role>(
    chopper1: &Chopper1Position<R>,
    chopper2: &Chopper2Position<R>,
    sample: &SamplePosition<R>,
) -> Result<IncidentBeam<R>> {
    sample.require_length()?;
    chopper1.require_length()?;
    chopper2.require_length()?;

    let chopper_midpoint = chopper1.to(sample.unit)?.midpoint(chopper2)?;
    let beam = sample.checked_sub(&chopper_midpoint)?;

    debug!("Incident beam of the {} run is {beam}", R::NAME);
    Ok(IncidentBeam::new(beam))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrefl_reflectometry::Reference;
    use nrefl_units::{Error as UnitsError, Unit, VectorQuantity};

    fn position(z: f64, unit: Unit) -> VectorQuantity {
        VectorQuantity::new(0.0, 0.0, z, unit)
    }

    #[test]
    fn sample_relative_to_chopper_midpoint() {
        let beam = incident_beam::<Reference>(
            &Chopper1Position::new(position(0.0, Unit::Metre)),
            &Chopper2Position::new(position(2.0, Unit::Metre)),
            &SamplePosition::new(position(5.0, Unit::Metre)),
        )
        .unwrap();
        assert_eq!(beam.into_inner(), position(4.0, Unit::Metre));
    }

    #[test]
    fn chopper_units_are_converted() {
        let beam = incident_beam::<Reference>(
            &Chopper1Position::new(position(0.0, Unit::Millimetre)),
            &Chopper2Position::new(position(2000.0, Unit::Millimetre)),
            &SamplePosition::new(position(5.0, Unit::Metre)),
        )
        .unwrap();
        assert_eq!(beam.unit, Unit::Metre);
        assert!((beam.value.z - 4.0).abs() < 1e-12);
    }

    #[test]
    fn positions_must_be_lengths() {
        let result = incident_beam::<Reference>(
            &Chopper1Position::new(position(0.0, Unit::Degree)),
            &Chopper2Position::new(position(2.0, Unit::Metre)),
            &SamplePosition::new(position(5.0, Unit::Metre)),
        );
        assert!(matches!(
            result,
            Err(crate::Error::Units(UnitsError::IncompatibleUnits { .. }))
        ));
    }
}
