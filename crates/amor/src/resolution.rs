//! Q resolution of the sample run
//!
//! Three independent contributions, each a relative standard deviation, are
//! added in quadrature: the wavelength spread from the chopper opening, the
//! sample size projected onto the detector, and the angular spread from the
//! detector position resolution. See section 4.3.3 of the Amor instrument
//! paper (doi: 10.1016/j.nima.2016.03.007).

// external crates
use log::debug;

// nrefl modules
use nrefl_events::Coord;
use nrefl_reflectometry::{fwhm_to_std, MaskedEventData, QBins, Sample, SampleSize};
use nrefl_units::{Dimension, Unit};

// internal modules
use crate::error::{Error, Result};
use crate::types::{
    AngularResolution, Chopper1Position, Chopper2Position, DetectorPosition,
    DetectorSpatialResolution, QResolution, SampleSizeResolution, WavelengthResolution,
};

/// Wavelength contribution of every pixel
///
/// The chopper spacing over the distance from the chopper midpoint to the
/// pixel, converted from a full width to a standard deviation.
///
/// ```rust
/// # use nrefl_amor::*;
/// # use nrefl_reflectometry::fwhm_to_std;
/// # use nrefl_units::{Unit, VectorQuantity};
/// let resolution = wavelength_resolution(
///     &Chopper1Position::new(VectorQuantity::new(0.0, 0.0, -15.5, Unit::Metre)),
///     &Chopper2Position::new(VectorQuantity::new(0.0, 0.0, -14.5, Unit::Metre)),
///     &DetectorPosition::new(vec![VectorQuantity::new(0.0, 0.0, 5.0, Unit::Metre)]),
/// )
/// .unwrap();
/// assert!((resolution.0[0] - fwhm_to_std(1.0 / 20.0)).abs() < 1e-15);
/// ```
pub fn wavelength_resolution(
    chopper1: &Chopper1Position<Sample>,
    chopper2: &Chopper2Position<Sample>,
    pixels: &DetectorPosition<Sample>,
) -> Result<WavelengthResolution> {
    let chopper1 = chopper1.to(Unit::Metre)?;
    let chopper2 = chopper2.to(Unit::Metre)?;
    let spacing = chopper2.value.z - chopper1.value.z;
    let midpoint = chopper1.midpoint(&chopper2)?.value.z;

    let resolution = pixel_z(pixels)?
        .into_iter()
        .map(|z| fwhm_to_std(spacing / (z - midpoint)))
        .collect();
    Ok(WavelengthResolution(resolution))
}

/// Sample size contribution of every pixel
pub fn sample_size_resolution(
    pixels: &DetectorPosition<Sample>,
    sample_size: &SampleSize<Sample>,
) -> Result<SampleSizeResolution> {
    let size = sample_size.value_in(Unit::Metre)?;
    let resolution = pixel_z(pixels)?
        .into_iter()
        .map(|z| fwhm_to_std(size / z))
        .collect();
    Ok(SampleSizeResolution(resolution))
}

/// Angular contribution of every sample event
///
/// The angle one resolution element subtends at the pixel, as a standard
/// deviation relative to the `theta` of the event. Positions must be given
/// for every pixel of the data.
pub fn angular_resolution(
    data: &MaskedEventData<Sample>,
    pixels: &DetectorPosition<Sample>,
    spatial_resolution: &DetectorSpatialResolution<Sample>,
) -> Result<AngularResolution> {
    spatial_resolution.require_positive("detector spatial resolution", Dimension::Length)?;
    let width = spatial_resolution.value_in(Unit::Metre)?;

    let z = pixel_z(pixels)?;
    if z.len() != data.len() {
        return Err(Error::PixelCountMismatch {
            name: "detector position",
            expected: data.len(),
            found: z.len(),
        });
    }

    let mut resolution = Vec::with_capacity(data.len());
    for (i, (pixel, z)) in data.pixels().iter().zip(z).enumerate() {
        let events = &pixel.events;
        if data.is_masked(i) || events.is_empty() {
            resolution.push(vec![f64::NAN; events.len()]);
            continue;
        }
        let spread = fwhm_to_std((width / z).atan());
        let theta = events.coord(Coord::Theta)?;
        let pixel_resolution = theta
            .iter()
            .enumerate()
            .map(|(j, theta)| {
                if events.is_masked(j) {
                    f64::NAN
                } else {
                    spread / theta
                }
            })
            .collect();
        resolution.push(pixel_resolution);
    }
    Ok(AngularResolution(resolution))
}

/// Combined Q resolution over the Q bins
///
/// The contributions are added in quadrature for every unmasked event, and
/// the largest relative resolution is scaled by the centre of every Q bin.
pub fn sigma_q(
    angular: &AngularResolution,
    wavelength: &WavelengthResolution,
    sample_size: &SampleSizeResolution,
    q_bins: &QBins,
) -> Result<QResolution> {
    let n = angular.0.len();
    for (name, found) in [
        ("wavelength resolution", wavelength.0.len()),
        ("sample size resolution", sample_size.0.len()),
    ] {
        if found != n {
            return Err(Error::PixelCountMismatch {
                name,
                expected: n,
                found,
            });
        }
    }

    let relative = angular
        .0
        .iter()
        .zip(&wavelength.0)
        .zip(&sample_size.0)
        .flat_map(|((events, w), s)| {
            events
                .iter()
                .map(move |a| (a * a + w * w + s * s).sqrt())
        })
        .filter(|r| r.is_finite())
        .fold(None, |max: Option<f64>, r| Some(max.map_or(r, |m| m.max(r))))
        .ok_or(Error::NoResolution)?;

    let edges = q_bins.to(Coord::Q.unit())?;
    let values = edges.midpoints().iter().map(|q| relative * q).collect();

    debug!("Relative Q resolution {relative:.4}");
    Ok(QResolution {
        edges,
        relative,
        values,
    })
}

/// Pixel `z` in metres
fn pixel_z(pixels: &DetectorPosition<Sample>) -> Result<Vec<f64>> {
    Ok(pixels
        .iter()
        .map(|p| p.to(Unit::Metre).map(|p| p.value.z))
        .collect::<nrefl_units::Result<Vec<f64>>>()?)
}
