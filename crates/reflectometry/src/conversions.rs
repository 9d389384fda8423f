//! Region of interest masks

// external crates
use log::debug;

// nrefl modules
use nrefl_events::{Coord, EventList};

// internal modules
use crate::error::{Error, Result};
use crate::types::{
    EventData, MaskedEventData, Role, WavelengthBins, YIndexLimits, ZIndexLimits,
};

/// Pixel mask for `y_index` outside [YIndexLimits]
pub const Y_INDEX_MASK: &str = "y_index_range";

/// Pixel mask for `z_index` outside [ZIndexLimits]
pub const Z_INDEX_MASK: &str = "z_index_range";

/// Event mask for wavelengths outside the [WavelengthBins]
pub const WAVELENGTH_MASK: &str = "wavelength";

/// Mask everything outside the region of interest
///
/// Pixels outside the inclusive index limits are masked with
/// [Y_INDEX_MASK] and [Z_INDEX_MASK], events outside the wavelength bins with
/// [WAVELENGTH_MASK]. Nothing is removed.
///
/// ```rust
/// # use nrefl_events::{Coord, DetectorData, EventList, Pixel};
/// # use nrefl_reflectometry::*;
/// # use nrefl_units::{BinEdges, Unit};
/// let events = EventList::from_counts(vec![1.0, 1.0])
///     .with_coord(Coord::Wavelength, vec![3.0, 20.0])
///     .unwrap();
/// let data = EventData::<Sample>::new(DetectorData::new(vec![
///     Pixel::new(5, 1, events.clone()),
///     Pixel::new(5, 9, events),
/// ]));
///
/// let masked = add_masks(
///     &data,
///     &YIndexLimits { lower: 0, upper: 4 },
///     &ZIndexLimits { lower: 0, upper: 10 },
///     &WavelengthBins(BinEdges::new(vec![2.0, 12.0], Unit::Angstrom).unwrap()),
/// )
/// .unwrap();
///
/// assert_eq!(masked.masks().get("y_index_range"), Some(&[false, true][..]));
/// assert_eq!(
///     masked.pixels()[0].events.masks().get("wavelength"),
///     Some(&[false, true][..])
/// );
/// // only the in-range event of the in-range pixel is left
/// assert_eq!(masked.total_weight(), 1.0);
/// ```
pub fn add_masks<R: Role>(
    data: &EventData<R>,
    y_limits: &YIndexLimits,
    z_limits: &ZIndexLimits,
    wavelength_bins: &WavelengthBins,
) -> Result<MaskedEventData<R>> {
    check_limits("y_index", y_limits.lower, y_limits.upper)?;
    check_limits("z_index", z_limits.lower, z_limits.upper)?;

    let edges = wavelength_bins.to(Coord::Wavelength.unit())?;
    let (lower, upper) = (edges.lower(), edges.upper());

    let mut masked = data.try_map_events(|pixel, _| -> Result<EventList> {
        if pixel.events.is_empty() {
            return Ok(pixel.events.clone());
        }
        let wavelength = pixel.events.coord(Coord::Wavelength)?;
        let outside = wavelength
            .iter()
            .map(|l| !(*l >= lower && *l < upper))
            .collect();
        Ok(pixel.events.clone().with_mask(WAVELENGTH_MASK, outside)?)
    })?;

    masked.mask_pixels_where(Y_INDEX_MASK, |p| {
        p.y_index < y_limits.lower || p.y_index > y_limits.upper
    })?;
    masked.mask_pixels_where(Z_INDEX_MASK, |p| {
        p.z_index < z_limits.lower || p.z_index > z_limits.upper
    })?;

    debug!(
        "Masked {} run: {} of {} pixels outside the region of interest",
        R::NAME,
        (0..masked.len()).filter(|i| masked.is_masked(*i)).count(),
        masked.len()
    );
    Ok(MaskedEventData::new(masked))
}

fn check_limits(name: &'static str, lower: u32, upper: u32) -> Result<()> {
    if lower > upper {
        return Err(Error::InvalidLimits { name, lower, upper });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Reference;
    use nrefl_events::{DetectorData, Pixel};
    use nrefl_units::{BinEdges, Unit};

    fn bins() -> WavelengthBins {
        WavelengthBins(BinEdges::new(vec![2.0, 12.0], Unit::Angstrom).unwrap())
    }

    #[test]
    fn limits_are_inclusive() {
        let pixels = (0..5)
            .map(|z| {
                let events = EventList::from_counts(vec![1.0])
                    .with_coord(Coord::Wavelength, vec![5.0])
                    .unwrap();
                Pixel::new(z, 0, events)
            })
            .collect();
        let data = EventData::<Reference>::new(DetectorData::new(pixels));

        let masked = add_masks(
            &data,
            &YIndexLimits { lower: 0, upper: 0 },
            &ZIndexLimits { lower: 1, upper: 3 },
            &bins(),
        )
        .unwrap();

        assert_eq!(
            masked.masks().get(Z_INDEX_MASK),
            Some(&[true, false, false, false, true][..])
        );
        assert_eq!(masked.masks().get(Y_INDEX_MASK), Some(&[false; 5][..]));
    }

    #[test]
    fn upper_wavelength_edge_is_excluded() {
        let events = EventList::from_counts(vec![1.0, 1.0, 1.0])
            .with_coord(Coord::Wavelength, vec![2.0, 11.999, 12.0])
            .unwrap();
        let data = EventData::<Reference>::new(DetectorData::new(vec![Pixel::new(0, 0, events)]));

        let masked = add_masks(
            &data,
            &YIndexLimits { lower: 0, upper: 10 },
            &ZIndexLimits { lower: 0, upper: 10 },
            &bins(),
        )
        .unwrap();

        assert_eq!(
            masked.pixels()[0].events.masks().get(WAVELENGTH_MASK),
            Some(&[false, false, true][..])
        );
    }

    #[test]
    fn reversed_limits() {
        let data = EventData::<Reference>::new(DetectorData::default());
        let result = add_masks(
            &data,
            &YIndexLimits { lower: 4, upper: 1 },
            &ZIndexLimits { lower: 0, upper: 10 },
            &bins(),
        );
        assert_eq!(
            result,
            Err(Error::InvalidLimits {
                name: "y_index",
                lower: 4,
                upper: 1
            })
        );
    }
}
