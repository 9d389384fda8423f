//! Footprint correction and the reference intensity

// external crates
use log::{debug, warn};

// nrefl modules
use nrefl_events::{Coord, EventList};
use nrefl_units::Dimension;

// internal modules
use crate::conversions::Z_INDEX_MASK;
use crate::error::{Error, Result};
use crate::tools::footprint_scale;
use crate::types::{
    BeamSize, FootprintCorrectedData, IdealReferenceIntensity, MaskedEventData, QTolerance,
    Reference, ReferenceIntensity, Role, SampleSize, SupermirrorReflectivityCorrection,
    WavelengthBins,
};

/// Cell mask for reference cells holding less than one count
pub const TOO_FEW_EVENTS: &str = "too_few_events";

/// Cell mask for reference cells whose `Q` spread exceeds the [QTolerance]
pub const Q_SPREAD: &str = "q_spread";

/// Divide every event weight by the fraction of the beam hitting the sample
///
/// For an event at angle `theta` the beam covers `beam_size / sin(theta)` of
/// the surface, and the fraction on the sample is
/// `erf(fwhm_to_std(sample_size / (beam_size / sin(theta))))`. Variances are
/// divided by the square of the fraction.
///
/// Every event with `0 < theta <= pi/2` is corrected, masked or not, so that
/// masked cells still hold corrected values. An unmasked event outside that
/// range is [Error::ThetaOutOfRange]. Masked events outside it, or any event
/// of a masked pixel, are passed through unchanged with a warning. A fraction
/// so small that the corrected weight or variance is no longer finite
/// (grazing angles) is reported as [Error::DegenerateFootprint].
///
/// ```rust
/// # use nrefl_events::{Coord, DetectorData, EventList, Pixel};
/// # use nrefl_reflectometry::*;
/// # use nrefl_units::{Quantity, Unit};
/// let events = EventList::from_counts(vec![1.0])
///     .with_coord(Coord::Theta, vec![std::f64::consts::FRAC_PI_2])
///     .unwrap();
/// let data = MaskedEventData::<Sample>::new(DetectorData::new(vec![Pixel::new(0, 0, events)]));
///
/// let corrected = footprint_correction(
///     &data,
///     &BeamSize::new(Quantity::new(2.0, Unit::Millimetre)),
///     &SampleSize::new(Quantity::new(0.01, Unit::Metre)),
/// )
/// .unwrap();
///
/// let expected = 1.0 / libm::erf(fwhm_to_std(5.0));
/// assert!((corrected.pixels()[0].events.weights()[0] - expected).abs() < 1e-12);
/// ```
pub fn footprint_correction<R: Role>(
    data: &MaskedEventData<R>,
    beam_size: &BeamSize<R>,
    sample_size: &SampleSize<R>,
) -> Result<FootprintCorrectedData<R>> {
    beam_size.require_positive("beam size", Dimension::Length)?;
    sample_size.require_positive("sample size", Dimension::Length)?;

    let beam = beam_size.value;
    let sample = sample_size.value_in(beam_size.unit)?;

    let corrected = data.try_map_events(|pixel, pixel_masked| -> Result<EventList> {
        let events = &pixel.events;
        if events.is_empty() {
            return Ok(events.clone());
        }

        let theta = events.coord(Coord::Theta)?;
        let mut skipped = 0;
        let scales = theta
            .iter()
            .enumerate()
            .map(|(i, theta)| {
                if !valid_theta(*theta) {
                    if pixel_masked || events.is_masked(i) {
                        skipped += 1;
                        return Ok(1.0);
                    }
                    return Err(Error::ThetaOutOfRange {
                        z_index: pixel.z_index,
                        y_index: pixel.y_index,
                        theta: *theta,
                    });
                }
                let scale = footprint_scale(beam, sample, *theta);
                if !usable_scale(scale) {
                    return Err(Error::DegenerateFootprint {
                        z_index: pixel.z_index,
                        y_index: pixel.y_index,
                        theta: *theta,
                        scale,
                    });
                }
                Ok(scale)
            })
            .collect::<Result<Vec<f64>>>()?;

        if skipped > 0 {
            warn!(
                "Ignoring {skipped} masked events with invalid theta in pixel (z_index {}, y_index {})",
                pixel.z_index, pixel.y_index
            );
        }
        Ok(events.divide_weights(&scales)?)
    })?;

    debug!("Footprint corrected {} pixels of the {} run", corrected.len(), R::NAME);
    Ok(FootprintCorrectedData::new(corrected))
}

/// Weights are divided by the scale and variances by its square
fn usable_scale(scale: f64) -> bool {
    scale > 0.0 && scale <= 1.0 && (1.0 / scale).is_finite() && (1.0 / (scale * scale)).is_finite()
}

fn valid_theta(theta: f64) -> bool {
    theta > 0.0 && theta <= std::f64::consts::FRAC_PI_2
}

/// Histogram the reference run over (`z_index`, wavelength)
///
/// 1. all pixels sharing a `z_index` are joined, a `z_index_range` mask
///    flags whole rows and pixels masked otherwise are left out
/// 2. events are binned by wavelength and summed per cell
/// 3. cells holding less than one count are masked [TOO_FEW_EVENTS]
/// 4. every cell gets the mean `Q` of its events
///
/// The `Q` of a cell is an approximation, events in one cell do not all share
/// the same `Q`. With a [QTolerance] set, cells whose relative `Q` spread
/// exceeds it are also masked [Q_SPREAD]. Cells without events have a `NaN`
/// `Q` and are always masked [TOO_FEW_EVENTS].
///
/// Only reference data is accepted:
///
/// ```compile_fail
/// # use nrefl_events::DetectorData;
/// # use nrefl_reflectometry::*;
/// # use nrefl_units::{BinEdges, Unit};
/// let sample = FootprintCorrectedData::<Sample>::new(DetectorData::default());
/// let bins = WavelengthBins(BinEdges::new(vec![1.0, 2.0], Unit::Angstrom).unwrap());
/// compute_reference_intensity(&sample, &bins, &QTolerance(None));
/// ```
pub fn compute_reference_intensity(
    data: &FootprintCorrectedData<Reference>,
    wavelength_bins: &WavelengthBins,
    tolerance: &QTolerance,
) -> Result<ReferenceIntensity> {
    if let Some(t) = tolerance.0 {
        if !(t > 0.0 && t.is_finite()) {
            return Err(Error::InvalidTolerance(t));
        }
    }

    let grid = data
        .concat_by_z_index(&[Z_INDEX_MASK])?
        .bin_wavelength(wavelength_bins)?;
    let mut hist = grid.hist()?;

    let too_few = hist.values().mapv(|v| v < 1.0);
    let n_too_few = too_few.iter().filter(|m| **m).count();
    if n_too_few > 0 {
        warn!(
            "{} of {} reference cells hold less than one count",
            n_too_few,
            too_few.len()
        );
    }
    hist.insert_mask(TOO_FEW_EVENTS, too_few)?;

    if let Some(t) = tolerance.0 {
        let spread = grid.relative_spread(Coord::Q)?;
        hist.insert_mask(Q_SPREAD, spread.mapv(|s| s > t))?;
    }

    hist.insert_coord(Coord::Q, grid.mean(Coord::Q)?)?;

    let (rows, bins) = hist.shape();
    debug!("Reference intensity over {rows} z_index rows and {bins} wavelength bins");
    Ok(ReferenceIntensity(hist))
}

/// Remove the supermirror reflectivity from the reference intensity
///
/// The correction already holds the inverse reflectivity, so this is a single
/// multiplication per cell, or per wavelength bin for a one row correction.
/// The correction must have been made for the same wavelength edges, in any
/// length unit, and for the same `z_index` rows when it has them. Masks and
/// coordinates are unchanged.
///
/// ```rust
/// # use ndarray::array;
/// # use nrefl_events::Histogram;
/// # use nrefl_reflectometry::*;
/// # use nrefl_units::{BinEdges, Unit};
/// let edges = BinEdges::new(vec![2.0, 3.0, 4.0], Unit::Angstrom).unwrap();
/// let hist = Histogram::new(vec![0], edges.clone(), array![[10.0, 20.0]], array![[10.0, 20.0]])
///     .unwrap();
///
/// let ideal = calibrate_reference(
///     &ReferenceIntensity(hist),
///     &SupermirrorReflectivityCorrection::per_wavelength(edges, vec![1.0, 1.5]),
/// )
/// .unwrap();
/// assert_eq!(ideal.values(), &array![[10.0, 30.0]]);
/// ```
pub fn calibrate_reference(
    intensity: &ReferenceIntensity,
    correction: &SupermirrorReflectivityCorrection,
) -> Result<IdealReferenceIntensity> {
    correction.unit().require(Dimension::Dimensionless)?;

    let edges = correction.edges().to(intensity.edges().unit())?;
    if !same_edges(edges.values(), intensity.edges().values()) {
        return Err(Error::MisalignedCorrection {
            coord: "wavelength",
        });
    }
    if let Some(z_index) = correction.z_index() {
        if z_index != intensity.z_index() {
            return Err(Error::MisalignedCorrection { coord: "z_index" });
        }
    }

    let calibrated = intensity.scale(correction.factors())?;
    Ok(IdealReferenceIntensity(calibrated))
}

/// Edge values equal up to rounding from a unit conversion
fn same_edges(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= 1e-12 * x.abs().max(y.abs()))
}
