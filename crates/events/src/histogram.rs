// standard library
use std::collections::BTreeMap;

// external crates
use ndarray::Array2;

// nrefl modules
use nrefl_units::BinEdges;

// internal modules
use crate::coord::Coord;
use crate::error::{Error, Result};

/// Summed weights over (`z_index`, wavelength)
///
/// Values and variances are in counts. Named boolean masks and [Coord]
/// coordinates may be attached to every cell, and all arrays always share the
/// shape (`z_index` rows, wavelength bins).
///
/// ```rust
/// # use nrefl_events::{Coord, Histogram};
/// # use nrefl_units::{BinEdges, Unit};
/// # use ndarray::array;
/// let edges = BinEdges::new(vec![1.0, 2.0, 3.0], Unit::Angstrom).unwrap();
/// let mut hist = Histogram::new(
///     vec![10],
///     edges,
///     array![[0.5, 7.0]],
///     array![[0.5, 7.0]],
/// )
/// .unwrap();
///
/// let low = hist.values().map(|v| *v < 1.0);
/// hist.insert_mask("low", low).unwrap();
/// assert!(hist.is_masked(0, 0));
/// assert!(!hist.is_masked(0, 1));
///
/// // every attached array must match the shape
/// assert!(hist.insert_coord(Coord::Q, array![[0.1]]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    z_index: Vec<u32>,
    edges: BinEdges,
    values: Array2<f64>,
    variances: Array2<f64>,
    masks: BTreeMap<String, Array2<bool>>,
    coords: BTreeMap<Coord, Array2<f64>>,
}

impl Histogram {
    /// New histogram without masks or coordinates
    pub fn new(
        z_index: Vec<u32>,
        edges: BinEdges,
        values: Array2<f64>,
        variances: Array2<f64>,
    ) -> Result<Self> {
        let expected = (z_index.len(), edges.n_bins());
        check_shape("values", expected, values.dim())?;
        check_shape("variances", expected, variances.dim())?;
        Ok(Self {
            z_index,
            edges,
            values,
            variances,
            masks: BTreeMap::new(),
            coords: BTreeMap::new(),
        })
    }

    /// The `z_index` of every row
    pub fn z_index(&self) -> &[u32] {
        &self.z_index
    }

    /// Wavelength bin edges
    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    /// (`z_index` rows, wavelength bins)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Summed weights
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Summed variances
    pub fn variances(&self) -> &Array2<f64> {
        &self.variances
    }

    /// Add or replace a named mask
    pub fn insert_mask(&mut self, name: impl Into<String>, mask: Array2<bool>) -> Result<()> {
        let name = name.into();
        check_shape(&name, self.shape(), mask.dim())?;
        self.masks.insert(name, mask);
        Ok(())
    }

    /// Add or replace a coordinate
    pub fn insert_coord(&mut self, coord: Coord, values: Array2<f64>) -> Result<()> {
        check_shape(coord.name(), self.shape(), values.dim())?;
        self.coords.insert(coord, values);
        Ok(())
    }

    /// Mask by name
    pub fn mask(&self, name: &str) -> Option<&Array2<bool>> {
        self.masks.get(name)
    }

    /// All masks, by name
    pub fn masks(&self) -> &BTreeMap<String, Array2<bool>> {
        &self.masks
    }

    /// Coordinate values of every cell
    pub fn coord(&self, coord: Coord) -> Result<&Array2<f64>> {
        self.coords
            .get(&coord)
            .ok_or(Error::MissingCoordinate(coord))
    }

    /// Whether cell (`row`, `bin`) is masked by any mask
    pub fn is_masked(&self, row: usize, bin: usize) -> bool {
        self.masks.values().any(|m| m[[row, bin]])
    }

    /// Logical OR of all masks
    pub fn combined_mask(&self) -> Array2<bool> {
        Array2::from_shape_fn(self.shape(), |(i, j)| self.is_masked(i, j))
    }

    /// New histogram with values multiplied by `factors`
    ///
    /// Variances are multiplied by the square of the factor. `factors` may
    /// either match the shape or be a single row broadcast over every
    /// `z_index`. Masks and coordinates are carried over untouched.
    ///
    /// ```rust
    /// # use nrefl_events::Histogram;
    /// # use nrefl_units::{BinEdges, Unit};
    /// # use ndarray::array;
    /// let edges = BinEdges::new(vec![1.0, 2.0, 3.0], Unit::Angstrom).unwrap();
    /// let hist = Histogram::new(
    ///     vec![0, 1],
    ///     edges,
    ///     array![[1.0, 2.0], [3.0, 4.0]],
    ///     array![[1.0, 1.0], [1.0, 1.0]],
    /// )
    /// .unwrap();
    ///
    /// let scaled = hist.scale(&array![[2.0, 0.5]]).unwrap();
    /// assert_eq!(scaled.values(), &array![[2.0, 1.0], [6.0, 2.0]]);
    /// assert_eq!(scaled.variances(), &array![[4.0, 0.25], [4.0, 0.25]]);
    /// ```
    pub fn scale(&self, factors: &Array2<f64>) -> Result<Histogram> {
        let shape = self.shape();
        let factors = factors.broadcast(shape).ok_or(Error::ShapeMismatch {
            name: "scale factors".to_string(),
            expected: shape,
            found: factors.dim(),
        })?;

        Ok(Self {
            z_index: self.z_index.clone(),
            edges: self.edges.clone(),
            values: &self.values * &factors,
            variances: &self.variances * &factors.mapv(|f| f * f),
            masks: self.masks.clone(),
            coords: self.coords.clone(),
        })
    }
}

fn check_shape(name: &str, expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            name: name.to_string(),
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use nrefl_units::Unit;

    fn histogram() -> Histogram {
        let edges = BinEdges::new(vec![1.0, 2.0, 3.0], Unit::Angstrom).unwrap();
        Histogram::new(
            vec![0, 1],
            edges,
            array![[1.0, 2.0], [3.0, 4.0]],
            array![[1.0, 2.0], [3.0, 4.0]],
        )
        .unwrap()
    }

    #[test]
    fn wrong_value_shape() {
        let edges = BinEdges::new(vec![1.0, 2.0], Unit::Angstrom).unwrap();
        let result = Histogram::new(vec![0], edges, array![[1.0, 2.0]], array![[1.0]]);
        assert_eq!(
            result,
            Err(Error::ShapeMismatch {
                name: "values".to_string(),
                expected: (1, 1),
                found: (1, 2)
            })
        );
    }

    #[test]
    fn scale_rejects_bad_shape() {
        let result = histogram().scale(&array![[1.0, 1.0, 1.0]]);
        assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn scale_keeps_masks() {
        let mut hist = histogram();
        hist.insert_mask("m", array![[true, false], [false, false]])
            .unwrap();
        let scaled = hist.scale(&array![[2.0, 2.0], [2.0, 2.0]]).unwrap();
        assert_eq!(scaled.mask("m"), hist.mask("m"));
        assert_eq!(scaled.combined_mask(), array![[true, false], [false, false]]);
    }

    #[test]
    fn missing_coordinate() {
        assert_eq!(
            histogram().coord(Coord::Q),
            Err(Error::MissingCoordinate(Coord::Q))
        );
    }
}
