//! Small numerical helpers

// nrefl modules
use nrefl_units::Quantity;

/// Ratio of a Gaussian's full width at half maximum to its standard deviation
///
/// Equal to `2 * sqrt(2 * ln(2))`.
pub fn fwhm_to_std_factor() -> f64 {
    2.0 * (2.0 * std::f64::consts::LN_2).sqrt()
}

/// Convert a full width at half maximum to a standard deviation
///
/// ```rust
/// # use nrefl_reflectometry::fwhm_to_std;
/// assert!((fwhm_to_std(2.354820045) - 1.0).abs() < 1e-9);
/// ```
pub fn fwhm_to_std(fwhm: f64) -> f64 {
    fwhm / fwhm_to_std_factor()
}

/// Length of the beam footprint along the sample surface
///
/// A beam of width `beam_size` arriving at `theta` to the surface spreads over
/// `beam_size / sin(theta)`. The unit is kept from `beam_size`.
///
/// ```rust
/// # use nrefl_reflectometry::beam_on_sample;
/// # use nrefl_units::{Quantity, Unit};
/// let beam = Quantity::new(2.0, Unit::Millimetre);
/// let footprint = beam_on_sample(beam, std::f64::consts::FRAC_PI_6);
/// assert!((footprint.value - 4.0).abs() < 1e-12);
/// assert_eq!(footprint.unit, Unit::Millimetre);
/// ```
pub fn beam_on_sample(beam_size: Quantity, theta: f64) -> Quantity {
    beam_size / theta.sin()
}

/// Fraction of the beam that lands on the sample
///
/// Both sizes must be expressed in the same unit. The result lies in [0, 1],
/// reaching 0 only when the footprint grows without bound.
///
/// ```rust
/// # use nrefl_reflectometry::{footprint_scale, fwhm_to_std};
/// let at_normal = footprint_scale(2.0, 10.0, std::f64::consts::FRAC_PI_2);
/// assert_eq!(at_normal, libm::erf(fwhm_to_std(5.0)));
/// ```
pub fn footprint_scale(beam_size: f64, sample_size: f64, theta: f64) -> f64 {
    let size_of_beam_on_sample = beam_size / theta.sin();
    libm::erf(fwhm_to_std(sample_size / size_of_beam_on_sample))
}
