// external crates
use serde::{Deserialize, Serialize};

// nrefl modules
use nrefl_utils::SliceExt;

// internal modules
use crate::error::{Error, Result};
use crate::unit::Unit;

/// Strictly increasing histogram bin edges with a [Unit]
///
/// Bins are half-open, `[low, high)`, including the last one, so `n + 1`
/// edges define `n` bins. Construction always validates the edges, so any
/// [BinEdges] in hand is usable for binning.
///
/// ```rust
/// # use nrefl_units::{BinEdges, Unit};
/// let edges = BinEdges::new(vec![2.0, 4.0, 8.0], Unit::Angstrom).unwrap();
/// assert_eq!(edges.n_bins(), 2);
/// assert_eq!(edges.find(5.0), Some(1));
/// assert_eq!(edges.find(8.0), None);
///
/// // edges must increase
/// assert!(BinEdges::new(vec![2.0, 2.0], Unit::Angstrom).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEdges")]
pub struct BinEdges {
    values: Vec<f64>,
    unit: Unit,
}

/// Unchecked form used to validate deserialised edges
#[derive(Deserialize)]
struct RawEdges {
    values: Vec<f64>,
    unit: Unit,
}

impl TryFrom<RawEdges> for BinEdges {
    type Error = Error;

    fn try_from(raw: RawEdges) -> Result<Self> {
        Self::new(raw.values, raw.unit)
    }
}

impl BinEdges {
    /// Validated bin edges from explicit values
    pub fn new(values: Vec<f64>, unit: Unit) -> Result<Self> {
        values.check_edges()?;
        Ok(Self { values, unit })
    }

    /// `num` evenly spaced edges from `start` to `stop` inclusive
    ///
    /// ```rust
    /// # use nrefl_units::{BinEdges, Unit};
    /// let edges = BinEdges::linspace(0.0, 1.0, 5, Unit::Dimensionless).unwrap();
    /// assert_eq!(edges.values(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    /// ```
    pub fn linspace(start: f64, stop: f64, num: usize, unit: Unit) -> Result<Self> {
        if num < 2 {
            return Err(Error::TooFewEdges {
                minimum: 2,
                found: num,
            });
        }
        let step = (stop - start) / (num - 1) as f64;
        let mut values = (0..num)
            .map(|i| start + step * i as f64)
            .collect::<Vec<f64>>();
        // avoid rounding drift on the final edge
        values[num - 1] = stop;
        Self::new(values, unit)
    }

    /// `num` logarithmically spaced edges from `start` to `stop` inclusive
    ///
    /// Both ends must be positive.
    ///
    /// ```rust
    /// # use nrefl_units::{BinEdges, Unit};
    /// let edges = BinEdges::geomspace(1.0, 100.0, 3, Unit::Angstrom).unwrap();
    /// assert!((edges.values()[1] - 10.0).abs() < 1e-12);
    /// assert!(BinEdges::geomspace(0.0, 100.0, 3, Unit::Angstrom).is_err());
    /// ```
    pub fn geomspace(start: f64, stop: f64, num: usize, unit: Unit) -> Result<Self> {
        if !(start > 0.0 && start.is_finite()) {
            return Err(Error::NotPositive {
                name: "geomspace start",
                value: start,
            });
        }
        if !(stop > 0.0 && stop.is_finite()) {
            return Err(Error::NotPositive {
                name: "geomspace stop",
                value: stop,
            });
        }
        let log_edges = Self::linspace(start.ln(), stop.ln(), num, Unit::Dimensionless)?;
        let mut values = log_edges
            .values
            .iter()
            .map(|v| v.exp())
            .collect::<Vec<f64>>();
        values[0] = start;
        values[num - 1] = stop;
        Self::new(values, unit)
    }

    /// Edge values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Unit of the edges
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Number of bins, one fewer than the number of edges
    pub fn n_bins(&self) -> usize {
        self.values.len() - 1
    }

    /// Lowest edge
    pub fn lower(&self) -> f64 {
        self.values[0]
    }

    /// Highest edge
    pub fn upper(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Bin index containing `value`, if any
    pub fn find(&self, value: f64) -> Option<usize> {
        self.values.find_bin(value)
    }

    /// Whether `value` falls within `[lower, upper)`
    pub fn contains(&self, value: f64) -> bool {
        self.find(value).is_some()
    }

    /// Centre of every bin
    pub fn midpoints(&self) -> Vec<f64> {
        self.values.midpoints()
    }

    /// Convert the edges to another unit of the same dimension
    ///
    /// All supported units are related by a positive factor, so the edges stay
    /// strictly increasing.
    pub fn to(&self, unit: Unit) -> Result<BinEdges> {
        let factor = self.unit.factor_to(unit)?;
        if factor == 1.0 {
            return Ok(Self {
                values: self.values.clone(),
                unit,
            });
        }
        Self::new(self.values.iter().map(|v| v * factor).collect(), unit)
    }
}
