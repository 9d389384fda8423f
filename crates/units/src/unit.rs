// standard library
use std::str::FromStr;

// external crates
use serde::{Deserialize, Serialize};

// internal modules
use crate::error::{Error, Result};

/// Physical dimension shared by a family of units
///
/// Units may only be converted into one another when they share a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Pure numbers, ratios, scale factors
    Dimensionless,
    /// Detector counts
    Counts,
    /// Lengths and wavelengths
    Length,
    /// Momentum transfer
    InverseLength,
    /// Scattering and rotation angles
    Angle,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Dimensionless => "dimensionless",
            Self::Counts => "counts",
            Self::Length => "length",
            Self::InverseLength => "inverse length",
            Self::Angle => "angle",
        };
        write!(f, "{name}")
    }
}

/// Units used throughout the reduction
///
/// Only units needed by the reduction exist. Every variant knows its [Dimension] and the
/// scale factor to the base unit of that dimension (metre, inverse metre,
/// radian).
///
/// Symbols are used for parsing and (de)serialisation:
///
/// | Variant           | Symbol            |
/// | ----------------- | ----------------- |
/// | `Dimensionless`   | `"dimensionless"` |
/// | `Counts`          | `"counts"`        |
/// | `Metre`           | `"m"`             |
/// | `Millimetre`      | `"mm"`            |
/// | `Angstrom`        | `"angstrom"`      |
/// | `InverseAngstrom` | `"1/angstrom"`    |
/// | `Radian`          | `"rad"`           |
/// | `Degree`          | `"deg"`           |
///
/// ```rust
/// # use nrefl_units::Unit;
/// let unit: Unit = "mm".parse().unwrap();
/// assert_eq!(unit, Unit::Millimetre);
/// assert_eq!(Unit::Millimetre.factor_to(Unit::Metre).unwrap(), 1e-3);
///
/// // lengths cannot become angles
/// assert!(Unit::Millimetre.factor_to(Unit::Radian).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Pure number
    #[serde(rename = "dimensionless")]
    Dimensionless,
    /// Neutron counts
    #[serde(rename = "counts")]
    Counts,
    /// Metre
    #[serde(rename = "m")]
    Metre,
    /// Millimetre
    #[serde(rename = "mm")]
    Millimetre,
    /// Angstrom (1e-10 m)
    #[serde(rename = "angstrom")]
    Angstrom,
    /// Inverse angstrom
    #[serde(rename = "1/angstrom")]
    InverseAngstrom,
    /// Radian
    #[serde(rename = "rad")]
    Radian,
    /// Degree
    #[serde(rename = "deg")]
    Degree,
}

impl Unit {
    /// The physical dimension of the unit
    pub const fn dimension(&self) -> Dimension {
        match self {
            Self::Dimensionless => Dimension::Dimensionless,
            Self::Counts => Dimension::Counts,
            Self::Metre | Self::Millimetre | Self::Angstrom => Dimension::Length,
            Self::InverseAngstrom => Dimension::InverseLength,
            Self::Radian | Self::Degree => Dimension::Angle,
        }
    }

    /// Short symbol, also used for serialisation
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Dimensionless => "dimensionless",
            Self::Counts => "counts",
            Self::Metre => "m",
            Self::Millimetre => "mm",
            Self::Angstrom => "angstrom",
            Self::InverseAngstrom => "1/angstrom",
            Self::Radian => "rad",
            Self::Degree => "deg",
        }
    }

    /// Multiplier to the base unit of the dimension
    fn scale(&self) -> f64 {
        match self {
            Self::Dimensionless | Self::Counts | Self::Metre | Self::Radian => 1.0,
            Self::Millimetre => 1e-3,
            Self::Angstrom => 1e-10,
            Self::InverseAngstrom => 1e10,
            Self::Degree => std::f64::consts::PI / 180.0,
        }
    }

    /// Factor converting values in `self` into values in `target`
    ///
    /// Fails with [Error::IncompatibleUnits] if the dimensions differ.
    pub fn factor_to(&self, target: Unit) -> Result<f64> {
        self.require(target.dimension())?;
        if *self == target {
            return Ok(1.0);
        }
        Ok(self.scale() / target.scale())
    }

    /// Check the unit has the expected dimension
    ///
    /// ```rust
    /// # use nrefl_units::{Dimension, Unit};
    /// assert!(Unit::Angstrom.require(Dimension::Length).is_ok());
    /// assert!(Unit::Counts.require(Dimension::Dimensionless).is_err());
    /// ```
    pub fn require(&self, expected: Dimension) -> Result<()> {
        if self.dimension() == expected {
            Ok(())
        } else {
            Err(Error::IncompatibleUnits {
                expected,
                found: *self,
            })
        }
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let unit = match s.trim() {
            "" | "dimensionless" | "one" => Self::Dimensionless,
            "counts" | "count" => Self::Counts,
            "m" | "metre" | "meter" => Self::Metre,
            "mm" | "millimetre" | "millimeter" => Self::Millimetre,
            "angstrom" | "Å" | "AA" => Self::Angstrom,
            "1/angstrom" | "1/Å" | "Å^-1" | "1/AA" => Self::InverseAngstrom,
            "rad" | "radian" => Self::Radian,
            "deg" | "degree" | "°" => Self::Degree,
            other => return Err(Error::UnknownUnit(other.to_string())),
        };
        Ok(unit)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Unit::Dimensionless)] // case 1
    #[case(Unit::Counts)] // case 2
    #[case(Unit::Metre)] // case 3
    #[case(Unit::Millimetre)] // case 4
    #[case(Unit::Angstrom)] // case 5
    #[case(Unit::InverseAngstrom)] // case 6
    #[case(Unit::Radian)] // case 7
    #[case(Unit::Degree)] // case 8
    fn symbols_parse_back(#[case] unit: Unit) {
        assert_eq!(unit.symbol().parse::<Unit>(), Ok(unit));
    }

    #[rstest]
    #[case(" metre ", Unit::Metre)] // case 1
    #[case("millimeter", Unit::Millimetre)] // case 2
    #[case("Å", Unit::Angstrom)] // case 3
    #[case("1/AA", Unit::InverseAngstrom)] // case 4
    #[case("°", Unit::Degree)] // case 5
    #[case("", Unit::Dimensionless)] // case 6
    fn aliases(#[case] symbol: &str, #[case] unit: Unit) {
        assert_eq!(symbol.parse::<Unit>(), Ok(unit));
    }

    #[rstest]
    fn unknown_symbol() {
        assert_eq!(
            "furlong".parse::<Unit>(),
            Err(Error::UnknownUnit("furlong".to_string()))
        );
    }

    #[rstest]
    #[case(Unit::Millimetre, Unit::Metre, 1e-3)] // case 1
    #[case(Unit::Metre, Unit::Millimetre, 1e3)] // case 2
    #[case(Unit::Angstrom, Unit::Metre, 1e-10)] // case 3
    #[case(Unit::InverseAngstrom, Unit::InverseAngstrom, 1.0)] // case 4
    #[case(Unit::Degree, Unit::Radian, std::f64::consts::PI / 180.0)] // case 5
    fn factors(#[case] from: Unit, #[case] to: Unit, #[case] expected: f64) {
        let factor = from.factor_to(to).unwrap();
        assert!((factor - expected).abs() <= 1e-15 * expected);
    }

    #[rstest]
    #[case(Unit::InverseAngstrom, Unit::Angstrom)] // case 1
    #[case(Unit::Counts, Unit::Dimensionless)] // case 2
    #[case(Unit::Degree, Unit::Metre)] // case 3
    fn incompatible(#[case] from: Unit, #[case] to: Unit) {
        assert_eq!(
            from.factor_to(to),
            Err(Error::IncompatibleUnits {
                expected: to.dimension(),
                found: from
            })
        );
    }
}
