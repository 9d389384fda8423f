// external crates
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// internal modules
use crate::error::Result;
use crate::quantity::Quantity;
use crate::unit::{Dimension, Unit};

/// Three-vector with a [Unit]
///
/// Used for positions of beamline components and the incident beam. All
/// vectors are expected to be expressed in the same lab frame, with `z` along
/// the nominal beam direction.
///
/// ```rust
/// # use nrefl_units::{Unit, VectorQuantity};
/// let a = VectorQuantity::new(0.0, 0.0, 1.0, Unit::Metre);
/// let b = VectorQuantity::new(0.0, 0.0, 500.0, Unit::Millimetre);
///
/// let diff = a.checked_sub(&b).unwrap();
/// assert_eq!(diff.unit, Unit::Metre);
/// assert!((diff.value.z - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorQuantity {
    /// Vector components
    pub value: Vector3<f64>,
    /// Unit of all components
    pub unit: Unit,
}

impl VectorQuantity {
    /// New vector from components
    pub fn new(x: f64, y: f64, z: f64, unit: Unit) -> Self {
        Self {
            value: Vector3::new(x, y, z),
            unit,
        }
    }

    /// Wrap an existing nalgebra vector
    pub fn from_vector(value: Vector3<f64>, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Convert every component to another unit of the same dimension
    pub fn to(&self, unit: Unit) -> Result<VectorQuantity> {
        let factor = self.unit.factor_to(unit)?;
        Ok(Self::from_vector(self.value * factor, unit))
    }

    /// Check this is a length, i.e. a position or displacement
    pub fn require_length(&self) -> Result<()> {
        self.unit.require(Dimension::Length)
    }

    /// `self - other`, expressed in the unit of `self`
    pub fn checked_sub(&self, other: &VectorQuantity) -> Result<VectorQuantity> {
        let other = other.to(self.unit)?;
        Ok(Self::from_vector(self.value - other.value, self.unit))
    }

    /// `self + other`, expressed in the unit of `self`
    pub fn checked_add(&self, other: &VectorQuantity) -> Result<VectorQuantity> {
        let other = other.to(self.unit)?;
        Ok(Self::from_vector(self.value + other.value, self.unit))
    }

    /// Point half way between `self` and `other`, in the unit of `self`
    ///
    /// ```rust
    /// # use nrefl_units::{Unit, VectorQuantity};
    /// let a = VectorQuantity::new(0.0, 0.0, 0.0, Unit::Metre);
    /// let b = VectorQuantity::new(0.0, 0.0, 2.0, Unit::Metre);
    /// assert_eq!(a.midpoint(&b).unwrap(), VectorQuantity::new(0.0, 0.0, 1.0, Unit::Metre));
    /// ```
    pub fn midpoint(&self, other: &VectorQuantity) -> Result<VectorQuantity> {
        let sum = self.checked_add(other)?;
        Ok(Self::from_vector(sum.value * 0.5, self.unit))
    }

    /// Euclidean length of the vector
    pub fn norm(&self) -> Quantity {
        Quantity::new(self.value.norm(), self.unit)
    }
}

impl std::fmt::Display for VectorQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}) {}",
            self.value.x, self.value.y, self.value.z, self.unit
        )
    }
}
