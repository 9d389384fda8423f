// external crates
use serde::{Deserialize, Serialize};

// internal modules
use crate::error::{Error, Result};
use crate::unit::{Dimension, Unit};

/// Scalar value with a [Unit]
///
/// Scalar parameters of the reduction (beam size, sample size, supermirror
/// critical edge, ...) are all quantities. Arithmetic that could mix
/// dimensions goes through checked methods returning [Result].
///
/// ```rust
/// # use nrefl_units::{Quantity, Unit};
/// let beam = Quantity::new(2.0, Unit::Millimetre);
/// let sample = Quantity::new(0.01, Unit::Metre);
///
/// // dimensionless ratio of two lengths
/// assert!((sample.ratio(&beam).unwrap() - 5.0).abs() < 1e-12);
///
/// // a length cannot be expressed in radians
/// assert!(beam.to(Unit::Radian).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Numerical value
    pub value: f64,
    /// Unit of `value`
    pub unit: Unit,
}

impl Quantity {
    /// New quantity from a value and unit
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Shorthand for a pure number
    pub const fn dimensionless(value: f64) -> Self {
        Self::new(value, Unit::Dimensionless)
    }

    /// Dimension of the quantity
    pub const fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    /// Convert to another unit of the same dimension
    ///
    /// ```rust
    /// # use nrefl_units::{Quantity, Unit};
    /// let length = Quantity::new(15.5, Unit::Metre).to(Unit::Millimetre).unwrap();
    /// assert_eq!(length.unit, Unit::Millimetre);
    /// assert!((length.value - 15500.0).abs() < 1e-9);
    /// ```
    pub fn to(&self, unit: Unit) -> Result<Quantity> {
        Ok(Self::new(self.value_in(unit)?, unit))
    }

    /// Numerical value expressed in `unit`
    pub fn value_in(&self, unit: Unit) -> Result<f64> {
        Ok(self.value * self.unit.factor_to(unit)?)
    }

    /// Dimensionless ratio `self / other`
    ///
    /// Both quantities must share a dimension, the units themselves may differ.
    pub fn ratio(&self, other: &Quantity) -> Result<f64> {
        Ok(self.value / other.value_in(self.unit)?)
    }

    /// Check the dimension and that the value is a positive, finite number
    ///
    /// Physical sizes are validated with this before being used as divisors.
    ///
    /// ```rust
    /// # use nrefl_units::{Dimension, Quantity, Unit};
    /// let size = Quantity::new(10.0, Unit::Millimetre);
    /// assert!(size.require_positive("sample size", Dimension::Length).is_ok());
    ///
    /// let size = Quantity::new(-1.0, Unit::Millimetre);
    /// assert!(size.require_positive("sample size", Dimension::Length).is_err());
    /// ```
    pub fn require_positive(&self, name: &'static str, dimension: Dimension) -> Result<()> {
        self.unit.require(dimension)?;
        if self.value.is_finite() && self.value > 0.0 {
            Ok(())
        } else {
            Err(Error::NotPositive {
                name,
                value: self.value,
            })
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

impl std::ops::Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.value * rhs, self.unit)
    }
}

impl std::ops::Div<f64> for Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.value / rhs, self.unit)
    }
}
